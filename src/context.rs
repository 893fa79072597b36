//! Cancellation shared between a caller and an in-flight enrichment.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable flag a caller raises to abandon an in-flight fetch.
///
/// The fetcher checks the flag before every page request. A raised flag
/// discards everything gathered so far; no partial facet is ever returned.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
  cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
  /// Creates a flag that is not raised.
  pub fn new() -> Self {
    Self::default()
  }

  /// Raises the flag. Every clone observes it.
  pub fn cancel(&self) {
    self.cancelled.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::SeqCst)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clones_share_state() {
    let flag = CancelFlag::new();
    let other = flag.clone();
    assert!(!other.is_cancelled());
    flag.cancel();
    assert!(other.is_cancelled());
  }
}
