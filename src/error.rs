//! Error types for facetus.
//!
//! Collaborators report failures as boxed errors; the core wraps them in
//! [`FacetusError::UpstreamUnavailable`] and never retries.

use std::fmt;

/// Boxed error returned by collaborator implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The collaborator a failed call was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
  TitleLookup,
  RelationshipStore,
}

impl fmt::Display for Collaborator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Collaborator::TitleLookup => f.write_str("title lookup"),
      Collaborator::RelationshipStore => f.write_str("relationship store"),
    }
  }
}

/// Top-level error type for all facetus operations.
#[derive(Debug, thiserror::Error)]
pub enum FacetusError {
  /// A collaborator call failed. The current operation produced no output.
  #[error("{collaborator} unavailable: {source}")]
  UpstreamUnavailable {
    collaborator: Collaborator,
    #[source]
    source: BoxError,
  },

  /// The caller raised the cancel flag while the operation was running.
  #[error("operation cancelled")]
  Cancelled,

  /// Configuration loading or validation error.
  #[error("config error: {message}")]
  Config { message: String },

  /// The query parameter bag could not be resolved.
  #[error("invalid query params: {message}")]
  InvalidParams { message: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = FacetusError> = std::result::Result<T, E>;

impl FacetusError {
  /// Wraps a collaborator failure.
  pub fn upstream(collaborator: Collaborator, source: impl Into<BoxError>) -> Self {
    Self::UpstreamUnavailable {
      collaborator,
      source: source.into(),
    }
  }

  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config {
      message: msg.into(),
    }
  }

  pub fn invalid_params(msg: impl Into<String>) -> Self {
    Self::InvalidParams {
      message: msg.into(),
    }
  }

  /// Returns `true` for [`FacetusError::UpstreamUnavailable`].
  pub fn is_upstream(&self) -> bool {
    matches!(self, Self::UpstreamUnavailable { .. })
  }
}
