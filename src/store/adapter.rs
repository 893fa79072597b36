//! Collaborator traits the enricher reads derived facets through.

use crate::error::BoxError;
use crate::types::{CategoryEntry, PeerRecord, RelationshipKind, SortKey, SubjectId};

/// Looks up the categories (projects) a subject belongs to.
///
/// The `Send` and `Sync` bounds are required so an enricher can be shared
/// across indexing threads.
pub trait TitleLookup: Send + Sync {
  /// Returns the subject's category memberships in the host's order.
  ///
  /// A subject with no memberships yields an empty list, not an error.
  fn category_titles(&self, subject: SubjectId) -> Result<Vec<CategoryEntry>, BoxError>;
}

/// Read access to the host's relationship store.
pub trait RelationshipStore: Send + Sync {
  /// Counts the peers related to `subject` by `kind`.
  fn count(&self, subject: SubjectId, kind: RelationshipKind) -> Result<usize, BoxError>;

  /// Returns one page of peers related to `subject` by `kind`.
  ///
  /// # Arguments
  ///
  /// * `offset` - Index of the first peer in the sorted sequence.
  /// * `limit` - Maximum number of peers to return.
  /// * `sort` - Ordering applied before the page is cut.
  ///
  /// An offset past the end yields an empty page.
  fn page(
    &self,
    subject: SubjectId,
    kind: RelationshipKind,
    offset: usize,
    limit: usize,
    sort: SortKey,
  ) -> Result<Vec<PeerRecord>, BoxError>;
}
