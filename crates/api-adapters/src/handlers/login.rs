//! `/api/login` handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use domains::DomainError;

use crate::dto::{LoginRequest, LoginResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(body) = body?;
    let (Some(username), Some(password)) = (body.username, body.password) else {
        return Err(DomainError::Validation("username and password are required".into()).into());
    };

    let session = state.users.login(&username, &password).await?;
    Ok(Json(session.into()))
}
