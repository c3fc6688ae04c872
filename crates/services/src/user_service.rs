//! # UserService
//!
//! Registration, login and user listing.

use std::collections::HashMap;
use std::sync::Arc;

use domains::{
    Blog, BlogId, BlogRepository, CredentialError, CredentialHash, CredentialHasher, DomainError,
    NewUser, Result, TokenService, User, UserRepository,
};

/// Well-formed Argon2id PHC string with the default cost parameters that no
/// password matches. Verified against when the username is unknown.
const UNKNOWN_USER_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$aGVsbG93b3JsZA$0123456789abcdef0123456789abcdef";

/// Raw registration input; every field may be absent.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// A successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// A user joined with the blogs it owns, in creation order.
#[derive(Debug, Clone)]
pub struct UserWithBlogs {
    pub user: User,
    pub blogs: Vec<Blog>,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    blogs: Arc<dyn BlogRepository>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenService>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        blogs: Arc<dyn BlogRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            blogs,
            hasher,
            tokens,
        }
    }

    /// Password rules are checked before username rules; username length and
    /// uniqueness are enforced by the repository.
    pub async fn register(&self, input: Registration) -> Result<User> {
        let password = input.password.ok_or(CredentialError::Missing)?;
        let password_hash = self.hasher.hash(&password)?;
        let username = input
            .username
            .ok_or_else(|| DomainError::Validation("`username` is required".into()))?;

        let user = self
            .users
            .create_user(NewUser {
                username,
                name: input.name,
                password_hash,
            })
            .await?;
        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Unknown usernames and wrong passwords fail identically, and both run
    /// exactly one hash verification.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let user = self.users.find_user_by_username(username).await?;
        let verified = match &user {
            Some(user) => self.hasher.verify(password, &user.password_hash),
            None => {
                self.hasher
                    .verify(password, &CredentialHash::new(UNKNOWN_USER_HASH));
                false
            }
        };
        let user = match user {
            Some(user) if verified => user,
            _ => {
                tracing::warn!(username, "login rejected");
                return Err(DomainError::Authentication(
                    "invalid username or password".into(),
                ));
            }
        };

        let token = self.tokens.issue(user.id, &user.username)?;
        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(Session { token, user })
    }

    pub async fn list(&self) -> Result<Vec<UserWithBlogs>> {
        let users = self.users.find_all_users().await?;
        let mut blogs: HashMap<BlogId, Blog> = self
            .blogs
            .find_all()
            .await?
            .into_iter()
            .map(|blog| (blog.id, blog))
            .collect();

        Ok(users
            .into_iter()
            .map(|user| {
                let owned = user.blogs.iter().filter_map(|id| blogs.remove(id)).collect();
                UserWithBlogs { user, blogs: owned }
            })
            .collect())
    }
}
