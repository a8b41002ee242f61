//! Bearer-token guard for customer routes.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::TOKEN_TYPE_BEARER;
use crate::errors::{AppError, AppResult};

/// Customer identified by a valid access token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

/// Token from `Authorization: Bearer <token>`; the scheme is case-insensitive
fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let (scheme, token) = value.split_once(' ').ok_or(AppError::Unauthorized)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case(TOKEN_TYPE_BEARER) || token.is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(token)
}

/// Rejects the request with 401 unless it carries a valid token, then makes
/// the caller available to handlers as `Extension<CurrentUser>`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = state.auth_service.verify_token(bearer_token(request.headers())?)?;

    tracing::debug!(user_id = %claims.sub, path = %request.uri().path(), "Authenticated request");
    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(request).await)
}
