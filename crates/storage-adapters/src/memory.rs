//! # MemoryStore
//!
//! A concurrent in-process document store implementing both repository
//! ports. Identifiers are random UUIDs; listing order is insertion order,
//! tracked with a monotonic sequence number since `DashMap` iteration is
//! unordered.
//!
//! Lock order is always users before blogs, and no shard lock is held across
//! an `.await`.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{
    validate_username, Blog, BlogId, BlogRepository, DomainError, NewBlog, NewUser, Result, User,
    UserId, UserRepository,
};

#[derive(Debug, Clone)]
struct Slot<T> {
    seq: u64,
    value: T,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    next_seq: AtomicU64,
    blogs: DashMap<BlogId, Slot<Blog>>,
    users: DashMap<UserId, Slot<User>>,
    usernames: DashMap<String, UserId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blog_count(&self) -> usize {
        self.blogs.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }
}

fn ordered<K, T: Clone>(map: &DashMap<K, Slot<T>>) -> Vec<T>
where
    K: Eq + std::hash::Hash,
{
    let mut slots: Vec<Slot<T>> = map.iter().map(|entry| entry.value().clone()).collect();
    slots.sort_by_key(|slot| slot.seq);
    slots.into_iter().map(|slot| slot.value).collect()
}

#[async_trait]
impl BlogRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Blog>> {
        Ok(ordered(&self.blogs))
    }

    async fn find_by_id(&self, id: BlogId) -> Result<Option<Blog>> {
        Ok(self.blogs.get(&id).map(|slot| slot.value.clone()))
    }

    async fn create(&self, draft: NewBlog, owner: UserId) -> Result<Blog> {
        let mut owner_slot = self.users.get_mut(&owner).ok_or_else(|| DomainError::NotFound {
            entity: "user",
            id: owner.to_string(),
        })?;

        let blog = Blog {
            id: BlogId::generate(),
            title: draft.title,
            author: draft.author,
            url: draft.url,
            likes: draft.likes,
            owner,
        };
        self.blogs.insert(
            blog.id,
            Slot {
                seq: self.seq(),
                value: blog.clone(),
            },
        );
        owner_slot.value.blogs.push(blog.id);

        tracing::trace!(blog_id = %blog.id, "blog stored");
        Ok(blog)
    }

    async fn delete_by_id(&self, id: BlogId) -> Result<bool> {
        let Some((_, removed)) = self.blogs.remove(&id) else {
            return Ok(false);
        };
        if let Some(mut owner) = self.users.get_mut(&removed.value.owner) {
            owner.value.blogs.retain(|owned| *owned != id);
        }
        Ok(true)
    }

    async fn update_likes(&self, id: BlogId, likes: u64) -> Result<Option<Blog>> {
        Ok(self.blogs.get_mut(&id).map(|mut slot| {
            slot.value.likes = likes;
            slot.value.clone()
        }))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_all_users(&self) -> Result<Vec<User>> {
        Ok(ordered(&self.users))
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|slot| slot.value.clone()))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let Some(id) = self.usernames.get(username).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        self.find_user_by_id(id).await
    }

    async fn create_user(&self, new: NewUser) -> Result<User> {
        validate_username(&new.username)?;

        match self.usernames.entry(new.username.clone()) {
            Entry::Occupied(_) => Err(DomainError::Validation(
                "expected `username` to be unique".into(),
            )),
            Entry::Vacant(vacant) => {
                let user = User {
                    id: UserId::generate(),
                    username: new.username,
                    name: new.name,
                    password_hash: new.password_hash,
                    blogs: Vec::new(),
                };
                self.users.insert(
                    user.id,
                    Slot {
                        seq: self.seq(),
                        value: user.clone(),
                    },
                );
                vacant.insert(user.id);
                Ok(user)
            }
        }
    }
}
