use std::sync::atomic::Ordering;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use chirpy_auth::{TokenKind, bearer_token};

use crate::auth::AppState;
use crate::error::ApiError;

/// The user an access token was issued to. Inserted into request
/// extensions by [`require_auth`].
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: u64,
}

pub(crate) fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// Validate the access token in the Authorization header.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(authorization(req.headers()))?;

    let id = state
        .tokens
        .validate(token, TokenKind::Access)
        .inspect_err(|e| debug!("Rejected access token: {}", e))?;

    req.extensions_mut().insert(AuthUser { id });
    Ok(next.run(req).await)
}

/// Count requests to the static file server.
pub async fn count_hits(State(state): State<AppState>, req: Request, next: Next) -> Response {
    state.fileserver_hits.fetch_add(1, Ordering::Relaxed);
    next.run(req).await
}
