//! bloglist/crates/services/src/lib.rs
//!
//! Business rules of the blog list: the identity pipeline and ownership gate,
//! blog and user orchestration, and the aggregation engine.

pub mod blog_service;
pub mod identity;
pub mod stats;
pub mod user_service;

pub use blog_service::{BlogService, OwnedBlog};
pub use identity::{IdentityResolver, RequestContext};
pub use stats::{AuthorBlogs, AuthorLikes, BlogStats};
pub use user_service::{Registration, Session, UserService, UserWithBlogs};
