use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lifetime of access tokens handed out at login and on refresh.
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Lifetime of refresh tokens handed out at login.
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("no bearer token supplied")]
    MissingToken,

    #[error("token is malformed or its signature is invalid")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("token was issued for a different purpose")]
    WrongPurpose,

    #[error("refresh token is invalid")]
    InvalidRefreshToken,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// What a token may be used for. Carried in the `iss` claim so an access
/// token can never be replayed as a refresh token or the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn issuer(self) -> &'static str {
        match self {
            Self::Access => "chirpy-access",
            Self::Refresh => "chirpy-refresh",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Claims {
    /// User id, stringified as JWT subjects are strings.
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique per issue, so two tokens minted in the same second differ.
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Issues and validates signed tokens with a process-wide HMAC secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token is dead the second after `exp`.
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, user_id: u64, kind: TokenKind, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(user_id, kind, Utc::now(), ttl)
    }

    /// Access + refresh token for a fresh login.
    pub fn issue_pair(&self, user_id: u64) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.issue(user_id, TokenKind::Access, ACCESS_TOKEN_TTL)?,
            refresh: self.issue(user_id, TokenKind::Refresh, REFRESH_TOKEN_TTL)?,
        })
    }

    fn issue_at(
        &self,
        user_id: u64,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| TokenError::Signing(e.to_string()))?;
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing("expiry out of range".to_string()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            iss: kind.issuer().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, expiry and purpose, returning the subject user id.
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<u64, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        if data.claims.iss != expected.issuer() {
            return Err(TokenError::WrongPurpose);
        }

        match data.claims.sub.parse::<u64>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(TokenError::Malformed),
        }
    }

    /// Mint a new access token from a refresh token.
    ///
    /// Revocation is not checked here; the caller must consult the store's
    /// revocation ledger first.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, TokenError> {
        let user_id = self
            .validate(refresh_token, TokenKind::Refresh)
            .map_err(|_| TokenError::InvalidRefreshToken)?;

        self.issue(user_id, TokenKind::Access, ACCESS_TOKEN_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret")
    }

    #[test]
    fn issued_token_validates_for_its_kind() {
        let tokens = service();
        for kind in [TokenKind::Access, TokenKind::Refresh] {
            let token = tokens.issue(42, kind, ACCESS_TOKEN_TTL).unwrap();
            assert_eq!(tokens.validate(&token, kind), Ok(42));
        }
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service();
        let two_hours_ago = Utc::now() - chrono::Duration::hours(2);
        let token = tokens
            .issue_at(1, TokenKind::Access, two_hours_ago, ACCESS_TOKEN_TTL)
            .unwrap();

        assert_eq!(tokens.validate(&token, TokenKind::Access), Err(TokenError::Expired));
    }

    #[test]
    fn purposes_are_not_interchangeable() {
        let tokens = service();
        let access = tokens.issue(5, TokenKind::Access, ACCESS_TOKEN_TTL).unwrap();
        let refresh = tokens.issue(5, TokenKind::Refresh, REFRESH_TOKEN_TTL).unwrap();

        assert_eq!(tokens.validate(&access, TokenKind::Refresh), Err(TokenError::WrongPurpose));
        assert_eq!(tokens.validate(&refresh, TokenKind::Access), Err(TokenError::WrongPurpose));
    }

    #[test]
    fn foreign_signature_is_malformed() {
        let ours = service();
        let theirs = TokenService::new("some-other-secret");
        let token = theirs.issue(1, TokenKind::Access, ACCESS_TOKEN_TTL).unwrap();

        assert_eq!(ours.validate(&token, TokenKind::Access), Err(TokenError::Malformed));
        assert_eq!(ours.validate("garbage", TokenKind::Access), Err(TokenError::Malformed));
        assert_eq!(ours.validate("", TokenKind::Access), Err(TokenError::Malformed));
    }

    #[test]
    fn tampered_payload_is_malformed() {
        let tokens = service();
        let other = tokens.issue(2, TokenKind::Access, ACCESS_TOKEN_TTL).unwrap();
        let other_payload = other.split('.').nth(1).unwrap();
        let token = tokens.issue(1, TokenKind::Access, ACCESS_TOKEN_TTL).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = other_payload;

        assert_eq!(tokens.validate(&parts.join("."), TokenKind::Access), Err(TokenError::Malformed));
    }

    #[test]
    fn tokens_issued_together_are_distinct() {
        let tokens = service();
        let now = Utc::now();
        let a = tokens.issue_at(7, TokenKind::Refresh, now, REFRESH_TOKEN_TTL).unwrap();
        let b = tokens.issue_at(7, TokenKind::Refresh, now, REFRESH_TOKEN_TTL).unwrap();
        assert_ne!(a, b);
        assert_eq!(tokens.validate(&a, TokenKind::Refresh), Ok(7));
        assert_eq!(tokens.validate(&b, TokenKind::Refresh), Ok(7));

        let first = tokens.issue_pair(7).unwrap();
        let second = tokens.issue_pair(7).unwrap();
        assert_ne!(first.access, second.access);
        assert_ne!(first.refresh, second.refresh);
    }

    #[test]
    fn refresh_mints_access_token() {
        let tokens = service();
        let pair = tokens.issue_pair(9).unwrap();

        let access = tokens.refresh(&pair.refresh).unwrap();
        assert_eq!(tokens.validate(&access, TokenKind::Access), Ok(9));
    }

    #[test]
    fn refresh_rejects_access_and_expired_tokens() {
        let tokens = service();
        let pair = tokens.issue_pair(9).unwrap();
        assert_eq!(tokens.refresh(&pair.access), Err(TokenError::InvalidRefreshToken));

        let long_ago = Utc::now() - chrono::Duration::days(90);
        let stale = tokens
            .issue_at(9, TokenKind::Refresh, long_ago, REFRESH_TOKEN_TTL)
            .unwrap();
        assert_eq!(tokens.refresh(&stale), Err(TokenError::InvalidRefreshToken));
    }

    #[test]
    fn login_pair_lifetimes() {
        let tokens = service();
        let pair = tokens.issue_pair(3).unwrap();

        let access = decode::<Claims>(&pair.access, &tokens.decoding, &tokens.validation).unwrap();
        let refresh = decode::<Claims>(&pair.refresh, &tokens.decoding, &tokens.validation).unwrap();

        assert_eq!(access.claims.exp - access.claims.iat, 60 * 60);
        assert_eq!(refresh.claims.exp - refresh.claims.iat, 60 * 60 * 24 * 60);
        assert_eq!(access.claims.iss, "chirpy-access");
        assert_eq!(refresh.claims.iss, "chirpy-refresh");
        assert_eq!(access.claims.sub, "3");
        assert_ne!(access.claims.jti, refresh.claims.jti);
    }
}
