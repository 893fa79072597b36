//! Paginated retrieval of every peer related to a subject.

use std::sync::Arc;

use tracing::{debug, instrument, trace, warn};

use crate::context::CancelFlag;
use crate::error::{Collaborator, FacetusError, Result};
use crate::store::RelationshipStore;
use crate::types::{RelationshipKind, SortKey, SubjectId};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Hides the relationship store's page-size limit behind a single call.
///
/// Pages are always requested by display name ascending, so consecutive pages
/// neither skip nor repeat peers while the store is stable.
pub struct RelationshipFetcher {
  store: Arc<dyn RelationshipStore>,
  page_size: usize,
}

impl RelationshipFetcher {
  /// Creates a fetcher over `store`.
  ///
  /// Fails with [`FacetusError::Config`] when `page_size` is zero.
  pub fn new(store: Arc<dyn RelationshipStore>, page_size: usize) -> Result<Self> {
    if page_size == 0 {
      return Err(FacetusError::config("page_size must be positive"));
    }
    Ok(Self { store, page_size })
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }

  /// Number of page requests issued for a relationship count.
  ///
  /// The loop is inclusive: `count / page_size + 1` pages, so an exact
  /// multiple of the page size and a zero count both cost one extra, empty
  /// request.
  pub fn page_requests(&self, count: usize) -> usize {
    count / self.page_size + 1
  }

  /// Fetches the IDs of every peer related to `subject` by `kind`.
  ///
  /// Peers come back in page order. The subject's own ID is never included.
  pub fn fetch_all(&self, subject: SubjectId, kind: RelationshipKind) -> Result<Vec<SubjectId>> {
    self.fetch_all_cancellable(subject, kind, &CancelFlag::new())
  }

  /// Like [`fetch_all`](Self::fetch_all), abandoning the fetch once `cancel`
  /// is raised.
  #[instrument(level = "debug", skip(self, cancel))]
  pub fn fetch_all_cancellable(
    &self,
    subject: SubjectId,
    kind: RelationshipKind,
    cancel: &CancelFlag,
  ) -> Result<Vec<SubjectId>> {
    if cancel.is_cancelled() {
      return Err(FacetusError::Cancelled);
    }

    let count = self
      .store
      .count(subject, kind)
      .map_err(|e| FacetusError::upstream(Collaborator::RelationshipStore, e))?;
    let pages = count / self.page_size;

    debug!(count, pages = pages + 1, page_size = self.page_size, "fetching relationships");

    #[cfg(feature = "parallel")]
    let peers: Vec<SubjectId> = (0..=pages)
      .into_par_iter()
      .map(|index| self.fetch_page(subject, kind, index, cancel))
      .collect::<Result<Vec<_>>>()?
      .into_iter()
      .flatten()
      .collect();

    #[cfg(not(feature = "parallel"))]
    let peers: Vec<SubjectId> = {
      let mut peers = Vec::new();
      for index in 0..=pages {
        peers.extend(self.fetch_page(subject, kind, index, cancel)?);
      }
      peers
    };

    debug!(fetched = peers.len(), "relationships fetched");
    Ok(peers)
  }

  fn fetch_page(
    &self,
    subject: SubjectId,
    kind: RelationshipKind,
    index: usize,
    cancel: &CancelFlag,
  ) -> Result<Vec<SubjectId>> {
    if cancel.is_cancelled() {
      return Err(FacetusError::Cancelled);
    }

    let offset = index * self.page_size;
    let records = self
      .store
      .page(subject, kind, offset, self.page_size, SortKey::DisplayNameAsc)
      .map_err(|e| FacetusError::upstream(Collaborator::RelationshipStore, e))?;

    trace!(index, offset, rows = records.len(), "page received");

    Ok(
      records
        .into_iter()
        .filter_map(|record| {
          if record.peer_id == subject {
            warn!(subject, "store returned a self relationship, skipping");
            None
          } else {
            Some(record.peer_id)
          }
        })
        .collect(),
    )
  }
}
