use axum::{
    Json,
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use chirpy_auth::{PasswordError, TokenError};
use chirpy_db::DbError;

/// Everything a handler can fail with. The core crates stay free of HTTP;
/// status codes are decided here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("incorrect email or password")]
    InvalidCredentials,

    #[error("refresh token has been revoked")]
    Revoked,

    #[error("invalid API key")]
    InvalidApiKey,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::Mismatch => Self::InvalidCredentials,
            PasswordError::Hashing(msg) => Self::Hashing(msg),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        Self::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::BadRequest(e.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Revoked | Self::InvalidApiKey => {
                StatusCode::UNAUTHORIZED
            }
            Self::Token(TokenError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Token(_) => StatusCode::UNAUTHORIZED,
            Self::Db(e) => match e {
                DbError::Validation(_) => StatusCode::BAD_REQUEST,
                DbError::NotFound(_) => StatusCode::NOT_FOUND,
                DbError::Forbidden(_) => StatusCode::FORBIDDEN,
                DbError::Conflict | DbError::AlreadyRevoked => StatusCode::CONFLICT,
                DbError::Read(_)
                | DbError::Write(_)
                | DbError::Corrupt(_)
                | DbError::Encode(_)
                | DbError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Hashing(_) | Self::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!("Responding with {}: {}", status, self);
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        assert_eq!(ApiError::from(DbError::NotFound("chirp")).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(DbError::Forbidden("no")).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::from(DbError::Conflict).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::from(DbError::AlreadyRevoked).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(DbError::Validation("bad".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::from(DbError::Poisoned).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_errors_map_to_statuses() {
        assert_eq!(ApiError::from(PasswordError::Mismatch).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(PasswordError::Hashing("oom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::from(TokenError::Expired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(TokenError::MissingToken).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(TokenError::Signing("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
