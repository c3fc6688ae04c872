//! Route table for the blog list API.

use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{blogs, login, unknown_endpoint, users};
use crate::middleware::extract_token;
use crate::state::AppState;

/// The bare router. Token extraction runs on every route, including the
/// fallback; resolution runs only in handlers that take `Identified`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/blogs", get(blogs::list).post(blogs::create))
        .route("/api/blogs/stats", get(blogs::stats))
        .route(
            "/api/blogs/{id}",
            get(blogs::show)
                .put(blogs::update_likes)
                .delete(blogs::remove),
        )
        .route("/api/users", get(users::list).post(users::register))
        .route("/api/login", post(login::login))
        .fallback(unknown_endpoint)
        .layer(from_fn(extract_token))
        .with_state(state)
}

/// The router with request tracing and a permissive CORS policy.
pub fn app(state: AppState) -> Router {
    router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::header::AUTHORIZATION;
    use axum::http::{Request, StatusCode};
    use domains::{
        DomainError, MockBlogRepository, MockCredentialHasher, MockTokenService,
        MockUserRepository,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::dto::ErrorBody;

    /// Unconfigured mocks panic when called, so each test only sets up the
    /// collaborators its request may reach.
    fn state(blogs: MockBlogRepository, tokens: MockTokenService) -> AppState {
        AppState::new(
            Arc::new(blogs),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockCredentialHasher::new()),
            Arc::new(tokens),
        )
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, ErrorBody) {
        let response = router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn repository_failures_are_opaque_server_errors() {
        let mut blogs = MockBlogRepository::new();
        blogs
            .expect_find_all()
            .returning(|| Err(DomainError::Repository("connection reset".into())));

        let request = Request::get("/api/blogs").body(Body::empty()).unwrap();
        let (status, body) = send(state(blogs, MockTokenService::new()), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "internal server error");
    }

    #[tokio::test]
    async fn anonymous_delete_never_reaches_the_repository() {
        let mut blogs = MockBlogRepository::new();
        blogs.expect_find_by_id().never();
        blogs.expect_delete_by_id().never();

        let request = Request::delete("/api/blogs/not-an-id")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(state(blogs, MockTokenService::new()), request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "token missing");
    }

    #[tokio::test]
    async fn foreign_auth_scheme_is_treated_as_anonymous() {
        let mut tokens = MockTokenService::new();
        tokens.expect_verify().never();

        let request = Request::post("/api/blogs")
            .header(AUTHORIZATION, "Basic cm9vdDpzZWtyZXQ=")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"title":"t","url":"u"}"#))
            .unwrap();
        let (status, body) = send(state(MockBlogRepository::new(), tokens), request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "token missing");
    }
}
