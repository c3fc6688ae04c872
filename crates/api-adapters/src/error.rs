//! # ApiError
//!
//! Translates the closed domain taxonomy into HTTP responses with a
//! `{"error": "<message>"}` body.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::DomainError;
use thiserror::Error;

use crate::dto::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The body was not JSON of the expected shape.
    #[error("{0}")]
    BadRequest(String),

    #[error("unknown endpoint")]
    UnknownEndpoint,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Domain(err) => match err {
                DomainError::Validation(_) | DomainError::MalformedIdentifier(_) => {
                    StatusCode::BAD_REQUEST
                }
                DomainError::Authentication(_) => StatusCode::UNAUTHORIZED,
                DomainError::Authorization(_) => StatusCode::FORBIDDEN,
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::EmptyInput(_)
                | DomainError::Repository(_)
                | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnknownEndpoint => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
            self.to_string()
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        let cases = [
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::MalformedIdentifier("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Authentication("x".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Authorization("x".into()), StatusCode::FORBIDDEN),
            (
                DomainError::NotFound {
                    entity: "blog",
                    id: "x".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (DomainError::EmptyInput("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::Repository("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[tokio::test]
    async fn server_errors_hide_their_cause() {
        let response = ApiError::from(DomainError::Repository("connection refused".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "internal server error");
    }

    #[tokio::test]
    async fn malformed_ids_report_a_fixed_message() {
        let response =
            ApiError::from(DomainError::MalformedIdentifier("123".into())).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "malformatted id");
    }
}
