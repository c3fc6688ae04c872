//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the binary.
//! Repository calls are the only suspension points; the credential and token
//! services are synchronous and CPU-bound.

use async_trait::async_trait;

use crate::error::{CredentialError, Result, TokenError};
use crate::models::{Blog, BlogId, CredentialHash, IdentityClaims, NewBlog, NewUser, User, UserId};

/// Persistence contract for blogs.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// All blogs in creation order.
    async fn find_all(&self) -> Result<Vec<Blog>>;

    async fn find_by_id(&self, id: BlogId) -> Result<Option<Blog>>;

    /// Stores the blog under `owner`, assigns its id and appends that id to
    /// the owner's back-reference list.
    async fn create(&self, blog: NewBlog, owner: UserId) -> Result<Blog>;

    /// Returns `false` when nothing was stored under `id`.
    async fn delete_by_id(&self, id: BlogId) -> Result<bool>;

    /// Overwrites the like count. Not a read-modify-write increment.
    async fn update_likes(&self, id: BlogId, likes: u64) -> Result<Option<Blog>>;
}

/// Persistence contract for users.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users in registration order.
    async fn find_all_users(&self) -> Result<Vec<User>>;

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Enforces [`crate::models::validate_username`] and username uniqueness,
    /// failing with [`crate::DomainError::Validation`] otherwise.
    async fn create_user(&self, user: NewUser) -> Result<User>;
}

/// Slow salted one-way password hashing.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> std::result::Result<CredentialHash, CredentialError>;

    /// Never fails on mismatch; an unparsable hash also yields `false`.
    fn verify(&self, password: &str, hash: &CredentialHash) -> bool;
}

/// Issues and verifies stateless signed identity tokens.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, user_id: UserId, username: &str) -> std::result::Result<String, TokenError>;

    /// An empty token is [`TokenError::Missing`].
    fn verify(&self, token: &str) -> std::result::Result<IdentityClaims, TokenError>;
}
