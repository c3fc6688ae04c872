//! JSON request and response bodies.
//!
//! Request fields are all optional so that a missing field is reported by
//! domain validation with a readable message instead of a decode error.

use domains::{Blog, BlogId, User, UserId};
use serde::{Deserialize, Serialize};
use services::{AuthorBlogs, AuthorLikes, BlogStats, OwnedBlog, Session, UserWithBlogs};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateLikesRequest {
    pub likes: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: UserId,
    pub username: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogResponse {
    pub id: BlogId,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
    /// `None` when the owner no longer exists.
    pub user: Option<OwnerSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogSummary {
    pub id: BlogId,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub name: Option<String>,
    pub blogs: Vec<BlogSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: Option<String>,
    pub id: UserId,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total_likes: u64,
    pub favorite: Option<BlogSummary>,
    pub most_blogs: Option<AuthorBlogs>,
    pub most_likes: Option<AuthorLikes>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&User> for OwnerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }
}

impl From<OwnedBlog> for BlogResponse {
    fn from(OwnedBlog { blog, owner }: OwnedBlog) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            user: owner.as_ref().map(OwnerSummary::from),
        }
    }
}

impl From<Blog> for BlogSummary {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
        }
    }
}

impl From<UserWithBlogs> for UserResponse {
    fn from(UserWithBlogs { user, blogs }: UserWithBlogs) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            blogs: blogs.into_iter().map(BlogSummary::from).collect(),
        }
    }
}

/// A freshly registered user owns no blogs yet.
impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserWithBlogs {
            user,
            blogs: Vec::new(),
        }
        .into()
    }
}

impl From<Session> for LoginResponse {
    fn from(Session { token, user }: Session) -> Self {
        Self {
            token,
            username: user.username,
            name: user.name,
            id: user.id,
        }
    }
}

impl From<BlogStats> for StatsResponse {
    fn from(stats: BlogStats) -> Self {
        Self {
            total_likes: stats.total_likes,
            favorite: stats.favorite.map(BlogSummary::from),
            most_blogs: stats.most_blogs,
            most_likes: stats.most_likes,
        }
    }
}
