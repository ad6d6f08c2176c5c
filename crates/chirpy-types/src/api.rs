use serde::{Deserialize, Serialize};

// -- Users --

/// Body of `POST /api/users`, `PUT /api/users` and `POST /api/login`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: u64,
    pub email: String,
    pub is_chirpy_red: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

// -- Chirps --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateChirpRequest {
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChirpResponse {
    pub id: u64,
    pub author_id: u64,
    pub body: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Query string of `GET /api/chirps`.
#[derive(Debug, Default, Deserialize)]
pub struct ChirpQuery {
    pub author_id: Option<u64>,
    #[serde(default)]
    pub sort: SortOrder,
}

// -- Webhooks --

/// Event the payment provider posts when a user's subscription changes.
/// Unknown fields are tolerated; the provider adds them freely.
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub user_id: u64,
}

pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_flattens_user() {
        let resp = LoginResponse {
            user: UserResponse {
                id: 7,
                email: "a@b.c".to_string(),
                is_chirpy_red: false,
            },
            token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        };

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["email"], "a@b.c");
        assert_eq!(value["refresh_token"], "refresh");
        assert!(value.get("user").is_none());
    }

    #[test]
    fn credentials_reject_unknown_fields() {
        let parsed: Result<CredentialsRequest, _> =
            serde_json::from_str(r#"{"email":"a@b.c","password":"pw","admin":true}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn webhook_tolerates_extra_fields() {
        let req: WebhookRequest = serde_json::from_str(
            r#"{"event":"user.upgraded","data":{"user_id":3,"plan":"red"},"id":"evt_1"}"#,
        )
        .unwrap();
        assert_eq!(req.event, USER_UPGRADED_EVENT);
        assert_eq!(req.data.user_id, 3);
    }

    #[test]
    fn sort_order_defaults_to_ascending() {
        let q: ChirpQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.sort, SortOrder::Asc);
        assert!(q.author_id.is_none());

        let q: ChirpQuery = serde_json::from_str(r#"{"sort":"desc"}"#).unwrap();
        assert_eq!(q.sort, SortOrder::Desc);
    }
}
