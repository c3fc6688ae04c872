//! # Domain Models
//!
//! These structs represent the core entities of the blog list.
//! Identifiers are UUID v4, assigned by the repository on creation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, Result};

/// Usernames shorter than this are rejected by every user repository.
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Passwords shorter than this are rejected by the credential service.
pub const MIN_PASSWORD_LENGTH: usize = 3;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Fresh random identifier. Only repositories should call this.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(raw: &str) -> Result<Self> {
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| DomainError::MalformedIdentifier(raw.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Repository key of a [`Blog`].
    BlogId
);
define_id!(
    /// Repository key of a [`User`].
    UserId
);

/// A salted one-way hash of a password, in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(..)")
    }
}

/// A registered account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub name: Option<String>,
    /// Computed once at registration and never mutated.
    #[serde(skip_serializing)]
    pub password_hash: CredentialHash,
    /// Back-references to owned blogs, in creation order.
    pub blogs: Vec<BlogId>,
}

/// Input for [`crate::ports::UserRepository::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: Option<String>,
    pub password_hash: CredentialHash,
}

/// Checks the username rules every user repository must enforce.
/// Uniqueness is checked by the repository itself.
/// Surrounding whitespace does not count towards the length.
pub fn validate_username(username: &str) -> Result<()> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation("`username` is required".into()));
    }
    if trimmed.chars().count() < MIN_USERNAME_LENGTH {
        return Err(DomainError::Validation(format!(
            "`username` (`{username}`) is shorter than the minimum allowed length ({MIN_USERNAME_LENGTH})"
        )));
    }
    Ok(())
}

/// A shared entry owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blog {
    pub id: BlogId,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
    pub owner: UserId,
}

/// A validated blog that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlog {
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
}

impl NewBlog {
    /// Validates raw input. `title` and `url` must be present and non-blank,
    /// an absent `likes` becomes 0 and a blank author is treated as absent.
    pub fn new(
        title: Option<String>,
        author: Option<String>,
        url: Option<String>,
        likes: Option<u64>,
    ) -> Result<Self> {
        let title = required("title", title)?;
        let url = required("url", url)?;
        let author = author.filter(|a| !a.trim().is_empty());

        Ok(Self {
            title,
            author,
            url,
            likes: likes.unwrap_or(0),
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DomainError::Validation(format!("`{field}` is required"))),
    }
}

/// The verified content of an identity token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub user_id: UserId,
    pub username: String,
    pub issued_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_blog_defaults_likes_to_zero() {
        let blog = NewBlog::new(
            Some("Type wars".into()),
            Some("Robert C. Martin".into()),
            Some("http://blog.cleancoder.com/".into()),
            None,
        )
        .unwrap();
        assert_eq!(blog.likes, 0);
    }

    #[test]
    fn new_blog_requires_title_and_url() {
        let missing_title = NewBlog::new(None, None, Some("http://x".into()), Some(1));
        assert_eq!(
            missing_title.unwrap_err(),
            DomainError::Validation("`title` is required".into())
        );

        let blank_url = NewBlog::new(Some("T".into()), None, Some("  ".into()), None);
        assert_eq!(
            blank_url.unwrap_err(),
            DomainError::Validation("`url` is required".into())
        );
    }

    #[test]
    fn ids_reject_malformed_input() {
        let err = "5a422aa71b54a676234d17f".parse::<BlogId>().unwrap_err();
        assert!(matches!(err, DomainError::MalformedIdentifier(_)));

        let id = BlogId::generate();
        assert_eq!(id.to_string().parse::<BlogId>().unwrap(), id);
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("root").is_ok());
        assert_eq!(
            validate_username("ab").unwrap_err().to_string(),
            "`username` (`ab`) is shorter than the minimum allowed length (3)"
        );
        assert_eq!(
            validate_username("").unwrap_err().to_string(),
            "`username` is required"
        );
    }

    #[test]
    fn padded_username_is_measured_without_whitespace() {
        assert!(matches!(
            validate_username(" ab"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            validate_username("ab  "),
            Err(DomainError::Validation(_))
        ));
        assert!(validate_username(" abc ").is_ok());
    }

    #[test]
    fn user_serialization_omits_the_hash() {
        let user = User {
            id: UserId::generate(),
            username: "root".into(),
            name: None,
            password_hash: CredentialHash::new("$argon2id$v=19$secret"),
            blogs: vec![],
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
    }
}
