//! Facetus - relationship and category facets for user search documents.
//!
//! Facetus plugs into a host's user indexer. At index time it adds two derived
//! facets to each user document: the lowercased titles of the categories the
//! user belongs to, and the IDs of every user with a bidirectional connection
//! to them. At search time it turns the same facets into query constraints.

pub mod config;
pub mod context;
pub mod enricher;
pub mod error;
pub mod extension;
pub mod fetcher;
pub mod filter;
pub mod params;
pub mod pipeline;
pub mod store;
pub mod types;

pub mod prelude {
  //! Convenient re-exports for common types and traits.

  pub use crate::config::*;
  pub use crate::context::*;
  pub use crate::enricher::*;
  pub use crate::error::*;
  pub use crate::extension::*;
  pub use crate::fetcher::*;
  pub use crate::filter::*;
  pub use crate::params::*;
  pub use crate::pipeline::*;
  pub use crate::store::*;
  pub use crate::types::*;
}
