use crate::token::TokenError;

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

/// Pull the token out of an `Authorization: Bearer <token>` header value.
///
/// Only the single-space form is accepted; `Bearer: <token>` is rejected.
pub fn bearer_token(header: Option<&str>) -> Result<&str, TokenError> {
    strip_scheme(header, BEARER_PREFIX)
}

/// Pull the key out of an `Authorization: ApiKey <key>` header value, as sent
/// by the payment provider's webhooks.
pub fn api_key(header: Option<&str>) -> Result<&str, TokenError> {
    strip_scheme(header, API_KEY_PREFIX)
}

fn strip_scheme<'a>(header: Option<&'a str>, prefix: &str) -> Result<&'a str, TokenError> {
    let value = header
        .and_then(|h| h.strip_prefix(prefix))
        .map(str::trim)
        .ok_or(TokenError::MissingToken)?;

    if value.is_empty() {
        return Err(TokenError::MissingToken);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn missing_or_malformed_headers() {
        assert_eq!(bearer_token(None), Err(TokenError::MissingToken));
        assert_eq!(bearer_token(Some("")), Err(TokenError::MissingToken));
        assert_eq!(bearer_token(Some("Bearer ")), Err(TokenError::MissingToken));
        assert_eq!(bearer_token(Some("Bearer    ")), Err(TokenError::MissingToken));
        assert_eq!(bearer_token(Some("Basic dXNlcjpwdw==")), Err(TokenError::MissingToken));
        assert_eq!(bearer_token(Some("bearer abc")), Err(TokenError::MissingToken));
    }

    #[test]
    fn colon_variant_is_rejected() {
        assert_eq!(bearer_token(Some("Bearer: abc")), Err(TokenError::MissingToken));
    }

    #[test]
    fn extracts_api_key() {
        assert_eq!(api_key(Some("ApiKey f271c81ff7084ee5b99a5091b42d486e")), Ok("f271c81ff7084ee5b99a5091b42d486e"));
        assert_eq!(api_key(Some("Bearer f271")), Err(TokenError::MissingToken));
        assert_eq!(api_key(None), Err(TokenError::MissingToken));
    }
}
