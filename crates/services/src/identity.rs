//! # Identity
//!
//! Per-request identity handling, in two ordered steps:
//!
//! 1. **Extraction** ([`RequestContext::from_authorization`]) reads the
//!    `Authorization` header. A missing header or a foreign scheme yields an
//!    anonymous context; that is not an error.
//! 2. **Resolution** ([`IdentityResolver::resolve`]) verifies a carried token
//!    and attaches the owning [`User`]. Only routes that need an identity run
//!    this step; a failure short-circuits the request with a 401.
//!
//! Each step consumes a context and returns a new one, so a context is never
//! mutated after it has been built. The ownership gate lives at the bottom of
//! this module and is called by the mutating blog operations.

use std::sync::Arc;

use domains::{Blog, DomainError, Result, TokenError, TokenService, User, UserRepository};

/// The scheme marker expected in front of a token.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Identity state carried alongside one request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: Option<String>,
    user: Option<User>,
}

impl RequestContext {
    /// Extraction step. Anything but `Bearer <token>` leaves the token absent.
    pub fn from_authorization(header: Option<&str>) -> Self {
        let token = header
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned);

        Self { token, user: None }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn with_user(self, user: User) -> Self {
        Self {
            user: Some(user),
            ..self
        }
    }
}

/// Resolution step: token → verified claims → stored user.
#[derive(Clone)]
pub struct IdentityResolver {
    tokens: Arc<dyn TokenService>,
    users: Arc<dyn UserRepository>,
}

impl IdentityResolver {
    pub fn new(tokens: Arc<dyn TokenService>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }

    /// Returns the context unchanged when it carries no token. A token that
    /// fails verification, or whose user no longer exists, is rejected.
    pub async fn resolve(&self, ctx: RequestContext) -> Result<RequestContext> {
        let Some(token) = ctx.token() else {
            return Ok(ctx);
        };

        let claims = self.tokens.verify(token).map_err(|err| {
            tracing::warn!(error = %err, "token rejected");
            DomainError::from(err)
        })?;

        match self.users.find_user_by_id(claims.user_id).await? {
            Some(user) => {
                tracing::debug!(user_id = %user.id, username = %user.username, "identity resolved");
                Ok(ctx.with_user(user))
            }
            None => {
                tracing::warn!(user_id = %claims.user_id, "token refers to an unknown user");
                Err(TokenError::Invalid.into())
            }
        }
    }
}

/// Gate for creating a blog: a resolved identity must be present.
pub fn require_identity(ctx: &RequestContext) -> Result<&User> {
    ctx.user().ok_or_else(|| {
        let reason = if ctx.token().is_some() {
            TokenError::Invalid
        } else {
            TokenError::Missing
        };
        DomainError::from(reason)
    })
}

/// Gate for deleting a blog: the resolved identity must own it.
pub fn require_owner<'a>(ctx: &'a RequestContext, blog: &Blog) -> Result<&'a User> {
    let user = require_identity(ctx)?;
    if user.id != blog.owner {
        tracing::warn!(user_id = %user.id, blog_id = %blog.id, "ownership check failed");
        return Err(DomainError::Authorization(
            "only the creator can delete a blog".into(),
        ));
    }
    Ok(user)
}
