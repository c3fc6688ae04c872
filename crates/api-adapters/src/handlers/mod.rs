pub mod blogs;
pub mod login;
pub mod users;

use crate::error::ApiError;

pub async fn unknown_endpoint() -> ApiError {
    ApiError::UnknownEndpoint
}
