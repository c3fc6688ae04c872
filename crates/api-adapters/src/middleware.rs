//! Identity plumbing for axum.
//!
//! [`extract_token`] runs on every request and stores an anonymous
//! [`RequestContext`] in the request extensions. Handlers that need an
//! identity take the [`Identified`] extractor, which runs the resolution step
//! and rejects the request with a 401 before the handler body runs.

use axum::extract::{FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use services::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
}

pub async fn extract_token(mut req: Request, next: Next) -> Response {
    let ctx = RequestContext::from_authorization(authorization(req.headers()));
    req.extensions_mut().insert(ctx);
    next.run(req).await
}

/// A request context that went through resolution.
pub struct Identified(pub RequestContext);

impl FromRequestParts<AppState> for Identified {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(|| RequestContext::from_authorization(authorization(&parts.headers)));

        let ctx = state.identity.resolve(ctx).await?;
        Ok(Self(ctx))
    }
}
