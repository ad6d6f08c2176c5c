use axum::{Extension, Json, extract::State, http::StatusCode};
use tracing::info;

use chirpy_auth::hash_password;
use chirpy_db::User;
use chirpy_types::api::{CredentialsRequest, UserResponse};

use crate::auth::{AppState, blocking};
use crate::error::ApiError;
use crate::middleware::AuthUser;

pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email.clone(),
        is_chirpy_red: user.is_upgraded,
    }
}

fn require_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::BadRequest("password must not be empty".to_string()));
    }
    Ok(())
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    require_password(&req.password)?;

    let user = blocking(&state, move |s| {
        let hash = hash_password(&req.password)?;
        Ok(s.db.create_user(&req.email, &hash)?)
    })
    .await?;

    info!("Created user {}", user.id);
    Ok((StatusCode::CREATED, Json(user_response(&user))))
}

/// Change the caller's own email and password.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    require_password(&req.password)?;

    let user = blocking(&state, move |s| {
        let hash = hash_password(&req.password)?;
        Ok(s.db.update_user(auth.id, &req.email, &hash)?)
    })
    .await?;

    Ok(Json(user_response(&user)))
}
