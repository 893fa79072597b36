//! Defines the hook system the indexing pipeline calls into.

use crate::error::Result;
use crate::filter::BooleanQuery;
use crate::params::QueryParams;
use crate::types::{EnrichedFields, SubjectId};

/// A trait for hooks attached to a host's user indexer.
///
/// Each method corresponds to one fixed extension point of the host's
/// indexing framework. All of them default to doing nothing, so a hook only
/// implements the points it cares about.
///
/// # Examples
///
/// A hook that stamps every document with a constant facet:
///
/// ```rust
/// use facetus::prelude::*;
///
/// struct TenantHook;
///
/// impl IndexerHook for TenantHook {
///     fn post_process_document(&self, _subject: SubjectId, fields: &mut EnrichedFields) -> Result<()> {
///         fields.insert("tenant", FacetValue::Keyword("acme".into()));
///         Ok(())
///     }
/// }
/// ```
pub trait IndexerHook: Send + Sync {
  /// Called after the host built a subject's document.
  ///
  /// An error aborts the document; the host indexes nothing for the subject.
  fn post_process_document(&self, _subject: SubjectId, _fields: &mut EnrichedFields) -> Result<()> {
    Ok(())
  }

  /// Called while the host assembles the context (filter) query of a search.
  fn post_process_context_query(&self, _params: &QueryParams, _query: &mut BooleanQuery) {}

  /// Called while the host assembles the keyword part of a search.
  fn post_process_search_query(&self, _keywords: &str, _query: &mut BooleanQuery) {}
}
