use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login form contents. Serialized as the sign-in request body.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token issued by the remote on sign-in, with its expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: String,
    #[serde(rename = "expired", with = "chrono::serde::ts_milliseconds")]
    pub expires: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(token: impl Into<String>, expires: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Authentication flag that decides which top-level view renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated,
}

impl SessionState {
    pub fn is_authenticated(self) -> bool {
        self == SessionState::Authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn signin_body_parses_millisecond_expiry() {
        let body = json!({
            "success": true,
            "message": "登入成功",
            "uid": "u1",
            "token": "T1",
            "expired": 1_893_456_000_000i64
        });
        let token: SessionToken = serde_json::from_value(body).unwrap();
        assert_eq!(token.token, "T1");
        assert_eq!(token.expires, Utc.timestamp_millis_opt(1_893_456_000_000).unwrap());
    }

    #[test]
    fn credential_debug_hides_password() {
        let c = Credential::new("a@b.com", "secret");
        let shown = format!("{:?}", c);
        assert!(shown.contains("a@b.com"));
        assert!(!shown.contains("secret"));
    }
}
