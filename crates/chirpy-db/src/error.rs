use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("email already registered")]
    Conflict,

    #[error("token already revoked")]
    AlreadyRevoked,

    #[error("failed to read database file: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write database file: {0}")]
    Write(#[source] io::Error),

    #[error("database file is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("failed to encode database: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("database lock poisoned")]
    Poisoned,
}
