use std::collections::HashMap;

use chrono::Duration;
use serde::Deserialize;
use serde::Serialize;

/// Session token claims: `{email, role, iat, exp}`.
///
/// `role` lives in the flattened `extra` map, so a token whose role has the
/// wrong JSON type still decodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Claims {
    /// Login identity the token was issued to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    pub const ROLE: &'static str = "role";

    pub fn new() -> Self {
        Self::default()
    }

    /// Claims for a login session starting at `issued_at`.
    ///
    /// # Arguments
    /// * `email` - Identity of the authenticated user
    /// * `role` - Role name granted by the session
    /// * `issued_at` - Unix timestamp the session starts at
    /// * `lifetime_hours` - Hours until the token expires
    pub fn for_session(
        email: impl ToString,
        role: impl ToString,
        issued_at: i64,
        lifetime_hours: i64,
    ) -> Self {
        let exp = issued_at + Duration::hours(lifetime_hours).num_seconds();

        Self::new()
            .with_email(email)
            .with_issued_at(issued_at)
            .with_expiration(exp)
            .with_extra(Self::ROLE, role.to_string())
    }

    pub fn with_email(mut self, email: impl ToString) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Role claim, if present and a JSON string.
    pub fn role(&self) -> Option<&str> {
        self.extra.get(Self::ROLE).and_then(|v| v.as_str())
    }

    /// Expired strictly after `exp`; a token is still valid at the `exp` second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| exp < current_timestamp)
    }
}
