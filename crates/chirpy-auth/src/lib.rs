//! Chirpy authentication primitives.
//!
//! - `password`: Argon2id hashing and verification of user passwords.
//! - `token`: HS256 JWTs tagged by purpose (access vs refresh).
//! - `header`: pulling credentials out of `Authorization` header values.
//!
//! Everything here is stateless apart from the signing key held by
//! [`token::TokenService`], so it is safe to share across threads freely.
//! Revocation is tracked by the store, not here.

pub mod header;
pub mod password;
pub mod token;

pub use header::{api_key, bearer_token};
pub use password::{PasswordError, hash_password, verify_password};
pub use token::{ACCESS_TOKEN_TTL, REFRESH_TOKEN_TTL, TokenError, TokenKind, TokenPair, TokenService};
