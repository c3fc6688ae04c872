//! # Aggregation Engine
//!
//! Pure functions over an already-fetched slice of blogs. Nothing here does
//! I/O or mutates its input, and results depend only on the slice's contents
//! and order.
//!
//! Tie-breaks always favour the earliest candidate: a later blog or author
//! group replaces the current best only when strictly greater.
//!
//! Like sums saturate at `u64::MAX` instead of overflowing.

use domains::{Blog, DomainError, Result};
use serde::Serialize;

/// Author with the most blogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorBlogs {
    pub author: Option<String>,
    pub count: usize,
}

/// Author whose blogs collected the most likes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorLikes {
    pub author: Option<String>,
    pub likes: u64,
}

/// Every statistic at once. Optional entries are `None` for an empty slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogStats {
    pub total_likes: u64,
    pub favorite: Option<Blog>,
    pub most_blogs: Option<AuthorBlogs>,
    pub most_likes: Option<AuthorLikes>,
}

pub fn total_likes(blogs: &[Blog]) -> u64 {
    blogs
        .iter()
        .fold(0, |total: u64, blog| total.saturating_add(blog.likes))
}

pub fn favorite_blog(blogs: &[Blog]) -> Result<&Blog> {
    let (first, rest) = blogs
        .split_first()
        .ok_or(DomainError::EmptyInput("favorite blog"))?;

    Ok(rest
        .iter()
        .fold(first, |best, blog| if blog.likes > best.likes { blog } else { best }))
}

pub fn most_blogs(blogs: &[Blog]) -> Result<AuthorBlogs> {
    let (author, count) = top_group(group_by_author(blogs, |_| 1))
        .ok_or(DomainError::EmptyInput("most blogs"))?;
    Ok(AuthorBlogs {
        author: author.map(str::to_owned),
        count: usize::try_from(count).unwrap_or(usize::MAX),
    })
}

pub fn most_likes(blogs: &[Blog]) -> Result<AuthorLikes> {
    let (author, likes) = top_group(group_by_author(blogs, |blog| blog.likes))
        .ok_or(DomainError::EmptyInput("most likes"))?;
    Ok(AuthorLikes {
        author: author.map(str::to_owned),
        likes,
    })
}

/// Computes every statistic, checking for emptiness first so that
/// [`DomainError::EmptyInput`] cannot escape.
pub fn summarize(blogs: &[Blog]) -> BlogStats {
    BlogStats {
        total_likes: total_likes(blogs),
        favorite: favorite_blog(blogs).ok().cloned(),
        most_blogs: most_blogs(blogs).ok(),
        most_likes: most_likes(blogs).ok(),
    }
}

/// Groups by exact (case-sensitive) author, keeping first-appearance order.
fn group_by_author(blogs: &[Blog], weight: impl Fn(&Blog) -> u64) -> Vec<(Option<&str>, u64)> {
    let mut groups: Vec<(Option<&str>, u64)> = Vec::new();
    for blog in blogs {
        let author = blog.author.as_deref();
        match groups.iter_mut().find(|(key, _)| *key == author) {
            Some((_, total)) => *total = total.saturating_add(weight(blog)),
            None => groups.push((author, weight(blog))),
        }
    }
    groups
}

fn top_group(groups: Vec<(Option<&str>, u64)>) -> Option<(Option<&str>, u64)> {
    groups.into_iter().fold(None, |best, group| match best {
        Some(current) if group.1 <= current.1 => Some(current),
        _ => Some(group),
    })
}
