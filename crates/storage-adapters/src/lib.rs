//! # storage-adapters
//!
//! Repository implementations. The production document store is external to
//! this workspace; `MemoryStore` stands in for it in single-node deployments
//! and in tests.

#[cfg(feature = "db-memory")]
mod memory;

#[cfg(feature = "db-memory")]
pub use memory::MemoryStore;
