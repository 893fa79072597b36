//! Enricher configuration.
//!
//! Values come from defaults, a TOML document, or the builder-style setters.

use serde::{Deserialize, Serialize};

use crate::error::{FacetusError, Result};
use crate::types::RelationshipKind;

/// The host's default indexing interval, used as the relationship page size.
pub const DEFAULT_PAGE_SIZE: usize = 10_000;

/// Settings shared by the relationship fetcher and the document enricher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnricherConfig {
    /// Maximum number of peers requested per relationship page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// The relationship kind gathered into `relationshipIds`.
    #[serde(default)]
    pub relationship_kind: RelationshipKind,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            relationship_kind: RelationshipKind::default(),
        }
    }
}

impl EnricherConfig {
    /// Parses and validates a TOML document.
    ///
    /// ```
    /// use facetus::config::EnricherConfig;
    ///
    /// let config = EnricherConfig::from_toml_str("page_size = 50").unwrap();
    /// assert_eq!(config.page_size, 50);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| FacetusError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the page size.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the relationship kind.
    pub fn relationship_kind(mut self, kind: RelationshipKind) -> Self {
        self.relationship_kind = kind;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(FacetusError::config("page_size must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_host_interval() {
        let config = EnricherConfig::default();
        assert_eq!(config.page_size, 10_000);
        assert_eq!(config.relationship_kind, RelationshipKind::BI_CONNECTION);
    }

    #[test]
    fn parses_partial_toml() {
        let config = EnricherConfig::from_toml_str("relationship_kind = 8").unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.relationship_kind, RelationshipKind(8));
    }

    #[test]
    fn rejects_zero_page_size() {
        let err = EnricherConfig::from_toml_str("page_size = 0").unwrap_err();
        assert!(matches!(err, FacetusError::Config { .. }));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(EnricherConfig::from_toml_str("page_size = \"many\"").is_err());
    }
}
