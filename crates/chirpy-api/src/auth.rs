use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{debug, info};

use chirpy_auth::{TokenError, TokenKind, TokenPair, TokenService, bearer_token, verify_password};
use chirpy_db::{Database, User};
use chirpy_types::api::{CredentialsRequest, LoginResponse, RefreshResponse};

use crate::error::ApiError;
use crate::middleware::authorization;
use crate::users::user_response;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenService,
    /// Shared secret the payment provider sends with its webhooks.
    pub polka_key: String,
    pub fileserver_hits: AtomicUsize,
}

impl AppStateInner {
    pub fn new(db: Database, tokens: TokenService, polka_key: String) -> Self {
        Self {
            db,
            tokens,
            polka_key,
            fileserver_hits: AtomicUsize::new(0),
        }
    }
}

/// Run blocking store / hashing work off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(state.as_ref())).await?
}

pub struct Session {
    pub user: User,
    pub tokens: TokenPair,
}

/// Check an email/password pair and issue a fresh access + refresh token.
///
/// An unknown email and a wrong password fail the same way, and no token
/// is issued in either case.
pub fn authenticate(state: &AppStateInner, email: &str, password: &str) -> Result<Session, ApiError> {
    let user = state
        .db
        .get_user_by_email(email)?
        .ok_or(ApiError::InvalidCredentials)?;

    verify_password(password, &user.password_hash)?;

    let tokens = state.tokens.issue_pair(user.id)?;
    Ok(Session { user, tokens })
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session = blocking(&state, move |s| authenticate(s, &req.email, &req.password))
        .await
        .inspect_err(|e| debug!("Login rejected: {}", e))?;

    info!("User {} logged in", session.user.id);
    Ok(Json(LoginResponse {
        user: user_response(&session.user),
        token: session.tokens.access,
        refresh_token: session.tokens.refresh,
    }))
}

/// Exchange a refresh token (bearer) for a new access token.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, ApiError> {
    let token = bearer_token(authorization(&headers))?.to_string();

    let access = blocking(&state, move |s| {
        if s.db.is_token_revoked(&token)? {
            return Err(ApiError::Revoked);
        }
        Ok(s.tokens.refresh(&token)?)
    })
    .await?;

    Ok(Json(RefreshResponse { token: access }))
}

/// Revoke the refresh token presented as bearer.
pub async fn revoke(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = bearer_token(authorization(&headers))?.to_string();

    let user_id = blocking(&state, move |s| {
        let user_id = s
            .tokens
            .validate(&token, TokenKind::Refresh)
            .map_err(|_| TokenError::InvalidRefreshToken)?;
        s.db.revoke_token(&token)?;
        Ok(user_id)
    })
    .await?;

    info!("Revoked a refresh token of user {}", user_id);
    Ok(StatusCode::NO_CONTENT)
}
