use std::collections::BTreeMap;

use crate::models::{Chirp, User};
use crate::{Database, DbError, Result};

/// Longest chirp body accepted, in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

impl Database {
    // -- Chirps --

    pub fn create_chirp(&self, author_id: u64, body: &str) -> Result<Chirp> {
        require_id(author_id, "author id")?;
        if body.chars().count() > MAX_CHIRP_LENGTH {
            return Err(DbError::Validation(format!(
                "chirp is longer than {} characters",
                MAX_CHIRP_LENGTH
            )));
        }

        self.with_snapshot_mut(|snapshot| {
            let chirp = Chirp {
                id: next_id(&snapshot.chirps),
                author_id,
                body: body.to_string(),
            };
            snapshot.chirps.insert(chirp.id, chirp.clone());
            Ok(chirp)
        })
    }

    /// All chirps in ascending id order, optionally only one author's.
    pub fn list_chirps(&self, author_id: Option<u64>) -> Result<Vec<Chirp>> {
        self.with_snapshot(|snapshot| {
            // BTreeMap iterates in key order.
            Ok(snapshot
                .chirps
                .values()
                .filter(|chirp| author_id.is_none_or(|id| chirp.author_id == id))
                .cloned()
                .collect())
        })
    }

    pub fn get_chirp(&self, id: u64) -> Result<Chirp> {
        require_id(id, "chirp id")?;
        self.with_snapshot(|snapshot| {
            snapshot
                .chirps
                .get(&id)
                .cloned()
                .ok_or(DbError::NotFound("chirp"))
        })
    }

    /// Delete a chirp on behalf of `requester_id`, who must be its author.
    pub fn delete_chirp(&self, id: u64, requester_id: u64) -> Result<()> {
        require_id(id, "chirp id")?;
        self.with_snapshot_mut(|snapshot| {
            match snapshot.chirps.get(&id) {
                None => return Err(DbError::NotFound("chirp")),
                Some(chirp) if chirp.author_id != requester_id => {
                    return Err(DbError::Forbidden("chirp belongs to another user"));
                }
                Some(_) => {}
            }
            snapshot.chirps.remove(&id);
            Ok(())
        })
    }

    // -- Users --

    pub fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        require_email(email)?;
        self.with_snapshot_mut(|snapshot| {
            if snapshot.users.values().any(|u| u.email == email) {
                return Err(DbError::Conflict);
            }

            let user = User {
                id: next_id(&snapshot.users),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                is_upgraded: false,
            };
            snapshot.users.insert(user.id, user.clone());
            Ok(user)
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.with_snapshot(|snapshot| {
            Ok(snapshot.users.values().find(|u| u.email == email).cloned())
        })
    }

    pub fn get_user(&self, id: u64) -> Result<Option<User>> {
        self.with_snapshot(|snapshot| Ok(snapshot.users.get(&id).cloned()))
    }

    /// Replace a user's email and password hash. The new email must not
    /// belong to anyone else.
    pub fn update_user(&self, id: u64, email: &str, password_hash: &str) -> Result<User> {
        require_id(id, "user id")?;
        require_email(email)?;
        self.with_snapshot_mut(|snapshot| {
            if snapshot.users.values().any(|u| u.email == email && u.id != id) {
                return Err(DbError::Conflict);
            }

            let user = snapshot
                .users
                .get_mut(&id)
                .ok_or(DbError::NotFound("user"))?;
            user.email = email.to_string();
            user.password_hash = password_hash.to_string();
            Ok(user.clone())
        })
    }

    /// Mark a user as upgraded (paid tier). Idempotent.
    pub fn upgrade_user(&self, id: u64) -> Result<User> {
        require_id(id, "user id")?;
        self.with_snapshot_mut(|snapshot| {
            let user = snapshot
                .users
                .get_mut(&id)
                .ok_or(DbError::NotFound("user"))?;
            user.is_upgraded = true;
            Ok(user.clone())
        })
    }
}

/// One past the largest id in use, so ids freed by deletion are never
/// handed to a new record while a higher id still exists.
fn next_id<V>(records: &BTreeMap<u64, V>) -> u64 {
    records.keys().next_back().map_or(1, |max| max + 1)
}

fn require_id(id: u64, what: &str) -> Result<()> {
    if id == 0 {
        return Err(DbError::Validation(format!("{} must be positive", what)));
    }
    Ok(())
}

fn require_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(DbError::Validation("email must not be empty".to_string()));
    }
    Ok(())
}
