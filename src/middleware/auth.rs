use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use std::convert::Infallible;

use crate::{
    AppState,
    error::AppError,
    utils::{Claims, verify_token},
};

fn bearer_claims(headers: &HeaderMap, state: &AppState) -> Result<Claims, AppError> {
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::Unauthorized)?;

    verify_token(bearer.token(), &state.config).map_err(|e| {
        tracing::warn!("Rejected bearer token: {}", e);
        AppError::Unauthorized
    })
}

/// Requires a valid bearer token and exposes its [`Claims`] as a request
/// extension.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = bearer_claims(request.headers(), &state)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Claims of the caller on public routes, `None` for anonymous or invalid
/// tokens.
pub struct MaybeClaims(pub Option<Claims>);

impl FromRequestParts<AppState> for MaybeClaims {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(MaybeClaims(Some(claims.clone())));
        }
        Ok(MaybeClaims(bearer_claims(&parts.headers, state).ok()))
    }
}
