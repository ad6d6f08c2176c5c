use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{info, warn};

use chirpy_auth::api_key;
use chirpy_types::api::{USER_UPGRADED_EVENT, WebhookRequest};

use crate::auth::{AppState, blocking};
use crate::error::ApiError;
use crate::middleware::authorization;

/// Payment provider webhook. Only `user.upgraded` does anything; every
/// other event is acknowledged and ignored.
///
/// The body is decoded only after the API key checks out, so callers
/// without the key always get 401.
pub async fn polka_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let key = api_key(authorization(&headers)).map_err(|_| ApiError::InvalidApiKey)?;
    if key != state.polka_key {
        warn!("Webhook with wrong API key");
        return Err(ApiError::InvalidApiKey);
    }

    let req: WebhookRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid webhook payload: {}", e)))?;

    if req.event != USER_UPGRADED_EVENT {
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = req.data.user_id;
    blocking(&state, move |s| Ok(s.db.upgrade_user(user_id)?)).await?;

    info!("User {} upgraded", user_id);
    Ok(StatusCode::NO_CONTENT)
}
