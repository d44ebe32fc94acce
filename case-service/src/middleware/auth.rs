use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::services::TokenClaims;
use crate::startup::AppState;

/// Shared bearer guard. Verified claims land in the request extensions
/// for handlers that care about the caller identity.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Token requerido".to_string()))?;

    let claims = state.jwt.verify(token)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extractor for the claims `require_bearer` stored.
pub struct AuthUser(pub TokenClaims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts.extensions.get::<TokenClaims>().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "token claims missing from request extensions"
            ))
        })?;
        Ok(AuthUser(claims.clone()))
    }
}
