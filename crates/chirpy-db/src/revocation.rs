//! Ledger of refresh tokens that must no longer be honored.
//!
//! Tokens are keyed by their full string. Entries are never removed.

use chrono::Utc;

use crate::models::RevokedToken;
use crate::{Database, DbError, Result};

impl Database {
    pub fn revoke_token(&self, token: &str) -> Result<()> {
        if token.is_empty() {
            return Err(DbError::Validation("token must not be empty".to_string()));
        }

        self.with_snapshot_mut(|snapshot| {
            if snapshot.revoked_tokens.contains_key(token) {
                return Err(DbError::AlreadyRevoked);
            }
            snapshot.revoked_tokens.insert(
                token.to_string(),
                RevokedToken {
                    token: token.to_string(),
                    revoked_at: Utc::now(),
                },
            );
            Ok(())
        })
    }

    pub fn is_token_revoked(&self, token: &str) -> Result<bool> {
        self.with_snapshot(|snapshot| Ok(snapshot.revoked_tokens.contains_key(token)))
    }
}
