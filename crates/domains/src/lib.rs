//! bloglist/crates/domains/src/lib.rs
//!
//! The central domain types and port definitions for the blog list service.
//! Nothing in this crate performs I/O; adapters implement the ports.

pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
