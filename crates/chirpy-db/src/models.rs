//! Records persisted in the JSON document.
//! Distinct from chirpy-types API models to keep the storage layer independent.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: u64,
    pub author_id: u64,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    #[serde(default)]
    pub is_upgraded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedToken {
    pub token: String,
    pub revoked_at: DateTime<Utc>,
}

/// The whole database. Collections missing from an older document load as
/// empty, so a chirps-only file still opens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub chirps: BTreeMap<u64, Chirp>,
    #[serde(default)]
    pub users: BTreeMap<u64, User>,
    #[serde(default)]
    pub revoked_tokens: BTreeMap<String, RevokedToken>,
}
