use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::error::AppError;

/// The authenticated principal. Extracting it rejects the request before the
/// handler body runs when the token is missing or does not verify.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

/// Accepts `Bearer <token>` as well as a bare token.
pub fn bearer_token(header: &str) -> &str {
    let header = header.trim();
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .unwrap_or(header)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                warn!("authorization header not provided");
                AppError::Authentication
            })?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(bearer_token(header)).map_err(|e| {
            warn!(error = %e, "jwt verification failed");
            AppError::InvalidToken
        })?;

        Ok(AuthUser(claims.sub))
    }
}
