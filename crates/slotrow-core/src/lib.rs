//! Shared types for the slotrow workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary used by the storage and sequence layers: error types,
//! row configuration, and growth metrics.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod metrics;

pub use config::{ConfigError, RowConfig};
pub use error::{AllocError, StoreError};
pub use metrics::RowMetrics;
