//! # BlogService
//!
//! Coordinates blog reads and writes between the identity gate and the
//! repositories. Creation and deletion consult the [`RequestContext`];
//! like updates do not, by policy.

use std::collections::HashMap;
use std::sync::Arc;

use domains::{Blog, BlogId, BlogRepository, DomainError, NewBlog, Result, User, UserId, UserRepository};

use crate::identity::{require_identity, require_owner, RequestContext};
use crate::stats::{self, BlogStats};

/// A blog together with its owner, when the owner still exists.
#[derive(Debug, Clone)]
pub struct OwnedBlog {
    pub blog: Blog,
    pub owner: Option<User>,
}

#[derive(Clone)]
pub struct BlogService {
    blogs: Arc<dyn BlogRepository>,
    users: Arc<dyn UserRepository>,
}

impl BlogService {
    pub fn new(blogs: Arc<dyn BlogRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { blogs, users }
    }

    /// All blogs in creation order, each joined with its owner.
    pub async fn list(&self) -> Result<Vec<OwnedBlog>> {
        let blogs = self.blogs.find_all().await?;
        let mut owners: HashMap<UserId, Option<User>> = HashMap::new();
        let mut listed = Vec::with_capacity(blogs.len());

        for blog in blogs {
            let owner = match owners.get(&blog.owner) {
                Some(cached) => cached.clone(),
                None => {
                    let found = self.users.find_user_by_id(blog.owner).await?;
                    owners.insert(blog.owner, found.clone());
                    found
                }
            };
            listed.push(OwnedBlog { blog, owner });
        }
        Ok(listed)
    }

    pub async fn get(&self, id: BlogId) -> Result<OwnedBlog> {
        let blog = self.find(id).await?;
        let owner = self.users.find_user_by_id(blog.owner).await?;
        Ok(OwnedBlog { blog, owner })
    }

    /// Requires a resolved identity, which becomes the blog's owner.
    pub async fn create(&self, ctx: &RequestContext, draft: NewBlog) -> Result<OwnedBlog> {
        let owner = require_identity(ctx)?;
        let blog = self.blogs.create(draft, owner.id).await?;
        tracing::info!(blog_id = %blog.id, owner = %owner.username, "blog created");

        Ok(OwnedBlog {
            blog,
            owner: Some(owner.clone()),
        })
    }

    /// Only the blog's owner may delete it.
    pub async fn delete(&self, ctx: &RequestContext, id: BlogId) -> Result<()> {
        require_identity(ctx)?;
        let blog = self.find(id).await?;
        let user = require_owner(ctx, &blog)?;

        if !self.blogs.delete_by_id(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(blog_id = %id, owner = %user.username, "blog deleted");
        Ok(())
    }

    /// Overwrites the like count. Any caller may do this, identified or not.
    pub async fn update_likes(&self, id: BlogId, likes: u64) -> Result<OwnedBlog> {
        let blog = self
            .blogs
            .update_likes(id, likes)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::debug!(blog_id = %id, likes, "likes updated");

        let owner = self.users.find_user_by_id(blog.owner).await?;
        Ok(OwnedBlog { blog, owner })
    }

    /// Aggregates over the whole collection.
    pub async fn stats(&self) -> Result<BlogStats> {
        let blogs = self.blogs.find_all().await?;
        Ok(stats::summarize(&blogs))
    }

    async fn find(&self, id: BlogId) -> Result<Blog> {
        self.blogs.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }
}

fn not_found(id: BlogId) -> DomainError {
    DomainError::NotFound {
        entity: "blog",
        id: id.to_string(),
    }
}
