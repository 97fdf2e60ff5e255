//! # In-memory Connector
//!
//! Native connector backed by process memory, for tests and local
//! development of provisioning flows.
//!
//! ## Features
//!
//! - Configurable object classes (defaults: `__ACCOUNT__` and `__GROUP__`)
//! - Create, update and delete, hidden when configured read-only
//! - Live synchronization over a sequential change log
//! - Runtime control of reachability and latency
//!
//! ## Example
//!
//! ```ignore
//! use provisio_connector::prelude::*;
//! use provisio_connector_memory::{MemoryConfig, MemoryConnector};
//!
//! let native = Arc::new(MemoryConnector::new(MemoryConfig::default())?);
//! let instance = ConnectorInstance::new(
//!     native.clone(),
//!     ResourceConfig::new("Sandbox", "http://example.com/resource/sandbox"),
//!     Arc::new(CanonicalVocabulary::standard()),
//! )?;
//!
//! native.set_reachable(false).await;
//! assert!(!instance.test().await.is_success());
//! ```

pub mod config;
pub mod connector;

// Re-exports
pub use config::MemoryConfig;
pub use connector::MemoryConnector;
