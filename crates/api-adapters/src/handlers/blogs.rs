//! `/api/blogs` handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{BlogId, DomainError, NewBlog};
use services::identity::require_identity;

use crate::dto::{BlogResponse, CreateBlogRequest, StatsResponse, UpdateLikesRequest};
use crate::error::ApiError;
use crate::middleware::Identified;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<BlogResponse>>, ApiError> {
    let blogs = state.blogs.list().await?;
    Ok(Json(blogs.into_iter().map(BlogResponse::from).collect()))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>, ApiError> {
    let id: BlogId = id.parse()?;
    Ok(Json(state.blogs.get(id).await?.into()))
}

pub async fn create(
    State(state): State<AppState>,
    Identified(ctx): Identified,
    body: Result<Json<CreateBlogRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BlogResponse>), ApiError> {
    // Anonymous callers get a 401 even when their body is also invalid.
    require_identity(&ctx)?;

    let Json(body) = body?;
    let draft = NewBlog::new(body.title, body.author, body.url, body.likes)?;
    let created = state.blogs.create(&ctx, draft).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn remove(
    State(state): State<AppState>,
    Identified(ctx): Identified,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    // Same precedence as `create`: 401 before any input check.
    require_identity(&ctx)?;
    let id: BlogId = id.parse()?;
    state.blogs.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// No identity is required here.
pub async fn update_likes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateLikesRequest>, JsonRejection>,
) -> Result<Json<BlogResponse>, ApiError> {
    let id: BlogId = id.parse()?;
    let Json(body) = body?;
    let likes = body
        .likes
        .ok_or_else(|| DomainError::Validation("`likes` is required".into()))?;

    Ok(Json(state.blogs.update_likes(id, likes).await?.into()))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    Ok(Json(state.blogs.stats().await?.into()))
}
