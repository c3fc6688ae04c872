//! State shared across all axum handlers.

use std::sync::Arc;

use domains::{BlogRepository, CredentialHasher, TokenService, UserRepository};
use services::{BlogService, IdentityResolver, UserService};

#[derive(Clone)]
pub struct AppState {
    pub blogs: BlogService,
    pub users: UserService,
    pub identity: IdentityResolver,
}

impl AppState {
    pub fn new(
        blog_repo: Arc<dyn BlogRepository>,
        user_repo: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            blogs: BlogService::new(blog_repo.clone(), user_repo.clone()),
            users: UserService::new(user_repo.clone(), blog_repo, hasher, tokens.clone()),
            identity: IdentityResolver::new(tokens, user_repo),
        }
    }
}
