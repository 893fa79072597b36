//! Runs a chain of indexer hooks the way the host's indexing framework does.

use crate::error::Result;
use crate::extension::IndexerHook;
use crate::filter::BooleanQuery;
use crate::params::QueryParams;
use crate::types::{EnrichedFields, SubjectId};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls registered hooks at each extension point, in registration order.
///
/// Create an `IndexingPipeline` using the [`IndexingPipelineBuilder`].
///
/// # Examples
///
/// ```rust
/// use facetus::prelude::*;
/// use std::sync::Arc;
///
/// let mut store = InMemStore::new();
/// store.add_category("Alpha Project", &[1]);
/// let store = Arc::new(store);
///
/// let enricher = DocumentEnricher::builder()
///   .titles(store.clone())
///   .relationships(store)
///   .build()
///   .unwrap();
///
/// let pipeline = IndexingPipeline::builder()
///   .with(Box::new(enricher))
///   .build();
///
/// let document = pipeline.build_document(1).unwrap();
/// let query = pipeline.search_query("alpha");
/// assert!(query.matches(&document));
/// ```
pub struct IndexingPipeline {
  hooks: Vec<Box<dyn IndexerHook>>,
}

impl IndexingPipeline {
  /// Creates a new `IndexingPipelineBuilder`.
  pub fn builder() -> IndexingPipelineBuilder {
    IndexingPipelineBuilder::new()
  }

  /// Number of registered hooks.
  pub fn len(&self) -> usize {
    self.hooks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.hooks.is_empty()
  }

  /// Builds the derived fields of one subject's document.
  ///
  /// Every hook sees the fields produced by the hooks before it. The first
  /// failing hook aborts the document and nothing is returned.
  pub fn build_document(&self, subject: SubjectId) -> Result<EnrichedFields> {
    let mut fields = EnrichedFields::new();
    for hook in &self.hooks {
      hook.post_process_document(subject, &mut fields)?;
    }
    Ok(fields)
  }

  /// Builds documents for many subjects.
  ///
  /// Subjects are independent: one failure does not affect the others.
  /// Results are returned in input order, in parallel when the `parallel`
  /// feature is enabled.
  pub fn build_documents(&self, subjects: &[SubjectId]) -> Vec<(SubjectId, Result<EnrichedFields>)> {
    #[cfg(feature = "parallel")]
    let iter = subjects.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = subjects.iter();

    iter
      .map(|subject| (*subject, self.build_document(*subject)))
      .collect()
  }

  /// Builds the context query for a set of search parameters.
  pub fn context_query(&self, params: &QueryParams) -> BooleanQuery {
    let mut query = BooleanQuery::new();
    for hook in &self.hooks {
      hook.post_process_context_query(params, &mut query);
    }
    query
  }

  /// Builds the keyword query for a search.
  pub fn search_query(&self, keywords: &str) -> BooleanQuery {
    let mut query = BooleanQuery::new();
    for hook in &self.hooks {
      hook.post_process_search_query(keywords, &mut query);
    }
    query
  }
}

/// A builder for creating `IndexingPipeline` instances.
#[derive(Default)]
pub struct IndexingPipelineBuilder {
  hooks: Vec<Box<dyn IndexerHook>>,
}

impl IndexingPipelineBuilder {
  /// Creates a new, empty `IndexingPipelineBuilder`.
  pub fn new() -> Self {
    Self { hooks: Vec::new() }
  }

  /// Adds a hook. Hooks run in the order they are added.
  pub fn with(mut self, hook: Box<dyn IndexerHook>) -> Self {
    self.hooks.push(hook);
    self
  }

  /// Builds the `IndexingPipeline`.
  pub fn build(self) -> IndexingPipeline {
    IndexingPipeline { hooks: self.hooks }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::FacetusError;
  use crate::types::FacetValue;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  struct Stamp(&'static str);

  impl IndexerHook for Stamp {
    fn post_process_document(&self, _subject: SubjectId, fields: &mut EnrichedFields) -> Result<()> {
      fields.insert(self.0, FacetValue::Keyword(self.0.to_string()));
      Ok(())
    }

    fn post_process_search_query(&self, keywords: &str, query: &mut BooleanQuery) {
      query.add_term(self.0, keywords, false);
    }
  }

  struct Fail;

  impl IndexerHook for Fail {
    fn post_process_document(&self, _subject: SubjectId, _fields: &mut EnrichedFields) -> Result<()> {
      Err(FacetusError::Cancelled)
    }
  }

  struct Counter(Arc<AtomicUsize>);

  impl IndexerHook for Counter {
    fn post_process_document(&self, _subject: SubjectId, _fields: &mut EnrichedFields) -> Result<()> {
      self.0.fetch_add(1, Ordering::SeqCst);
      Ok(())
    }
  }

  #[test]
  fn hooks_run_in_registration_order() {
    let pipeline = IndexingPipeline::builder()
      .with(Box::new(Stamp("first")))
      .with(Box::new(Stamp("second")))
      .build();

    let fields = pipeline.build_document(1).unwrap();
    let names: Vec<&str> = fields.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["first", "second"]);

    let query = pipeline.search_query("x");
    assert_eq!(query.len(), 2);
    assert!(pipeline.context_query(&QueryParams::default()).is_empty());
  }

  #[test]
  fn first_failure_stops_the_document() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipeline = IndexingPipeline::builder()
      .with(Box::new(Fail))
      .with(Box::new(Counter(calls.clone())))
      .build();

    assert!(pipeline.build_document(1).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn batch_keeps_input_order() {
    let pipeline = IndexingPipeline::builder()
      .with(Box::new(Stamp("only")))
      .build();

    let results = pipeline.build_documents(&[3, 1, 2]);
    let ids: Vec<SubjectId> = results.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert!(results.iter().all(|(_, r)| r.is_ok()));
  }
}
