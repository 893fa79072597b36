//! The document enricher: derived facets at index time, matching constraints
//! at search time.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::config::EnricherConfig;
use crate::context::CancelFlag;
use crate::error::{Collaborator, FacetusError, Result};
use crate::extension::IndexerHook;
use crate::fetcher::RelationshipFetcher;
use crate::filter::{BooleanQuery, QueryConstraint};
use crate::params::{is_present_text, QueryParams};
use crate::store::{RelationshipStore, TitleLookup};
use crate::types::{
  EnrichedFields, FacetValue, RelationshipKind, SubjectId, CATEGORY_TITLES, GROUP_IDS,
  RELATIONSHIP_IDS,
};

/// Composes category titles and relationship peers into a subject's search
/// document, and produces the query constraints that target those facets.
///
/// Create a `DocumentEnricher` with [`DocumentEnricher::builder`].
///
/// # Examples
///
/// ```rust
/// use facetus::prelude::*;
/// use std::sync::Arc;
///
/// let mut store = InMemStore::new();
/// store.add_subject(1, "Ada");
/// store.add_subject(2, "Grace");
/// store.add_category("Compilers", &[1]);
/// store.connect(1, 2, RelationshipKind::BI_CONNECTION);
/// let store = Arc::new(store);
///
/// let enricher = DocumentEnricher::builder()
///   .titles(store.clone())
///   .relationships(store)
///   .build()
///   .unwrap();
///
/// let fields = enricher.enrich(1).unwrap();
/// assert_eq!(fields.category_titles(), vec!["compilers"]);
/// assert_eq!(fields.relationship_ids(), &[2]);
/// ```
pub struct DocumentEnricher {
  titles: Arc<dyn TitleLookup>,
  fetcher: RelationshipFetcher,
  relationship_kind: RelationshipKind,
}

impl DocumentEnricher {
  /// Creates a new `DocumentEnricherBuilder`.
  pub fn builder() -> DocumentEnricherBuilder {
    DocumentEnricherBuilder::new()
  }

  /// Creates an enricher from collaborators and a validated config.
  pub fn new(
    titles: Arc<dyn TitleLookup>,
    relationships: Arc<dyn RelationshipStore>,
    config: EnricherConfig,
  ) -> Result<Self> {
    config.validate()?;
    Ok(Self {
      titles,
      fetcher: RelationshipFetcher::new(relationships, config.page_size)?,
      relationship_kind: config.relationship_kind,
    })
  }

  /// The relationship kind gathered into `relationshipIds`.
  pub fn relationship_kind(&self) -> RelationshipKind {
    self.relationship_kind
  }

  /// Builds the derived facets for `subject`.
  ///
  /// `categoryTitles` holds the lowercased titles in lookup order and
  /// `relationshipIds` the peers of the configured kind. Both keys are always
  /// present, empty when there is nothing to report. The first collaborator
  /// failure aborts the call.
  pub fn enrich(&self, subject: SubjectId) -> Result<EnrichedFields> {
    self.enrich_cancellable(subject, &CancelFlag::new())
  }

  /// Like [`enrich`](Self::enrich), abandoning the call once `cancel` is raised.
  #[instrument(level = "debug", skip(self, cancel))]
  pub fn enrich_cancellable(&self, subject: SubjectId, cancel: &CancelFlag) -> Result<EnrichedFields> {
    let titles: Vec<String> = self
      .titles
      .category_titles(subject)
      .map_err(|e| FacetusError::upstream(Collaborator::TitleLookup, e))?
      .into_iter()
      .map(|entry| entry.title.to_lowercase())
      .collect();

    let peers = self
      .fetcher
      .fetch_all_cancellable(subject, self.relationship_kind, cancel)?;

    debug!(titles = titles.len(), peers = peers.len(), "subject enriched");

    let mut fields = EnrichedFields::new();
    fields.insert(CATEGORY_TITLES, FacetValue::Keywords(titles));
    fields.insert(RELATIONSHIP_IDS, FacetValue::Ids(peers));
    Ok(fields)
  }

  /// Translates search-context parameters into required terms.
  ///
  /// Emits, in order: a like-term on `categoryTitles`, a term on
  /// `relationshipIds`, then one term per group on `groupIds`. Several groups
  /// are ANDed: a document has to belong to all of them.
  pub fn build_query_filters(&self, params: &QueryParams) -> Vec<QueryConstraint> {
    let mut constraints = Vec::new();

    if let Some(title) = params.category_titles.as_deref().filter(|t| is_present_text(t)) {
      constraints.push(QueryConstraint::required(CATEGORY_TITLES, title).like());
    }

    if let Some(id) = params.relationship {
      constraints.push(QueryConstraint::required(RELATIONSHIP_IDS, id));
    }

    for group in params.group_ids.terms() {
      constraints.push(QueryConstraint::required(GROUP_IDS, *group));
    }

    constraints
  }

  /// Matches free-text keywords against the category title facet.
  ///
  /// The keywords are passed through unchanged; only index-time values are
  /// lowercased.
  pub fn build_search_term(&self, keywords: &str) -> Option<QueryConstraint> {
    is_present_text(keywords).then(|| QueryConstraint::should(CATEGORY_TITLES, keywords).like())
  }
}

impl IndexerHook for DocumentEnricher {
  fn post_process_document(&self, subject: SubjectId, fields: &mut EnrichedFields) -> Result<()> {
    for (name, value) in self.enrich(subject)?.iter() {
      fields.insert(name, value.clone());
    }
    Ok(())
  }

  fn post_process_context_query(&self, params: &QueryParams, query: &mut BooleanQuery) {
    query.extend(self.build_query_filters(params));
  }

  fn post_process_search_query(&self, keywords: &str, query: &mut BooleanQuery) {
    if let Some(term) = self.build_search_term(keywords) {
      query.add(term);
    }
  }
}

/// A builder for creating `DocumentEnricher` instances.
#[derive(Default)]
pub struct DocumentEnricherBuilder {
  titles: Option<Arc<dyn TitleLookup>>,
  relationships: Option<Arc<dyn RelationshipStore>>,
  config: EnricherConfig,
}

impl DocumentEnricherBuilder {
  /// Creates a new, empty builder with the default config.
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the category title lookup.
  pub fn titles(mut self, titles: Arc<dyn TitleLookup>) -> Self {
    self.titles = Some(titles);
    self
  }

  /// Sets the relationship store.
  pub fn relationships(mut self, relationships: Arc<dyn RelationshipStore>) -> Self {
    self.relationships = Some(relationships);
    self
  }

  /// Replaces the whole config.
  pub fn config(mut self, config: EnricherConfig) -> Self {
    self.config = config;
    self
  }

  pub fn page_size(mut self, page_size: usize) -> Self {
    self.config.page_size = page_size;
    self
  }

  pub fn relationship_kind(mut self, kind: RelationshipKind) -> Self {
    self.config.relationship_kind = kind;
    self
  }

  /// Builds the enricher.
  ///
  /// Fails with [`FacetusError::Config`] when a collaborator is missing or the
  /// config is invalid.
  pub fn build(self) -> Result<DocumentEnricher> {
    let titles = self
      .titles
      .ok_or_else(|| FacetusError::config("a title lookup is required"))?;
    let relationships = self
      .relationships
      .ok_or_else(|| FacetusError::config("a relationship store is required"))?;
    DocumentEnricher::new(titles, relationships, self.config)
  }
}
