//! # api-adapters
//!
//! The HTTP surface of the blog list. Everything except the DTOs is behind
//! the `web-axum` feature.

pub mod dto;

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;
#[cfg(feature = "web-axum")]
pub mod routes;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use error::ApiError;
#[cfg(feature = "web-axum")]
pub use routes::{app, router};
#[cfg(feature = "web-axum")]
pub use state::AppState;
