//! Test harness driving the real router against an in-memory store.
//!
//! Requests go through `tower::ServiceExt::oneshot`, so no socket is bound.

use std::sync::Arc;

use api_adapters::{router, AppState};
use auth_adapters::{Argon2CredentialHasher, JwtTokenService};
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use domains::{Blog, BlogRepository, CredentialHasher, NewBlog, NewUser, User, UserId, UserRepository};
use serde_json::Value;
use storage_adapters::MemoryStore;
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// `(title, author, url, likes)` of the blogs every test starts with.
pub const INITIAL_BLOGS: [(&str, &str, &str, u64); 6] = [
    ("React patterns", "Michael Chan", "https://reactpatterns.com/", 7),
    (
        "Go To Statement Considered Harmful",
        "Edsger W. Dijkstra",
        "http://www.u.arizona.edu/~rubinson/copyright_violations/Go_To_Considered_Harmful.html",
        5,
    ),
    (
        "Canonical string reduction",
        "Edsger W. Dijkstra",
        "http://www.cs.utexas.edu/~EWD/transcriptions/EWD08xx/EWD808.html",
        12,
    ),
    (
        "First class tests",
        "Robert C. Martin",
        "http://blog.cleancoder.com/uncle-bob/2017/05/05/TestDefinitions.htmll",
        10,
    ),
    (
        "TDD harms architecture",
        "Robert C. Martin",
        "http://blog.cleancoder.com/uncle-bob/2017/03/03/TDD-Harms-Architecture.html",
        0,
    ),
    (
        "Type wars",
        "Robert C. Martin",
        "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html",
        2,
    ),
];

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn is_json(&self) -> bool {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"))
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub tokens: Arc<JwtTokenService>,
    hasher: Arc<Argon2CredentialHasher>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let tokens = Arc::new(JwtTokenService::new(TEST_SECRET, None));
        let hasher = Arc::new(
            Argon2CredentialHasher::with_params(256, 1, 1).expect("valid argon2 params"),
        );

        let blog_repo: Arc<dyn BlogRepository> = store.clone();
        let user_repo: Arc<dyn UserRepository> = store.clone();
        let state = AppState::new(blog_repo, user_repo, hasher.clone(), tokens.clone());

        Self {
            store,
            tokens,
            hasher,
            router: router(state),
        }
    }

    /// The `root`/`sekret` user owning [`INITIAL_BLOGS`].
    pub async fn seeded() -> (Self, User) {
        let app = Self::new();
        let root = app.create_user("root", "sekret").await;
        app.seed_blogs(root.id).await;
        (app, root)
    }

    pub async fn create_user(&self, username: &str, password: &str) -> User {
        let password_hash = self.hasher.hash(password).expect("hashable password");
        self.store
            .create_user(NewUser {
                username: username.into(),
                name: None,
                password_hash,
            })
            .await
            .expect("seed user")
    }

    pub async fn seed_blogs(&self, owner: UserId) -> Vec<Blog> {
        let mut stored = Vec::new();
        for (title, author, url, likes) in INITIAL_BLOGS {
            let draft = NewBlog::new(
                Some(title.into()),
                Some(author.into()),
                Some(url.into()),
                Some(likes),
            )
            .expect("valid seed blog");
            stored.push(self.store.create(draft, owner).await.expect("seed blog"));
        }
        stored
    }

    /// Logs in through the API and returns the bare token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post(
                "/api/login",
                None,
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.body["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible router");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, None, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Body of `GET /api/blogs` as an array.
    pub async fn blogs(&self) -> Vec<Value> {
        let response = self.get("/api/blogs").await;
        response.body.as_array().cloned().unwrap_or_default()
    }

    /// Body of `GET /api/users` as an array.
    pub async fn users(&self) -> Vec<Value> {
        let response = self.get("/api/users").await;
        response.body.as_array().cloned().unwrap_or_default()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
