//! # Session
//!
//! The bearer token issued at login, and what it says about the user.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  POST /auth/login ──► { token } ──► Session::from_token                │
//! │                                          │                              │
//! │                                          ├── claims decoded (no verify) │
//! │                                          │                              │
//! │                                          ▼                              │
//! │              backend.products(&session) / checkout(&session, ...)       │
//! │                                          │                              │
//! │                         401/403 ◄────────┘                              │
//! │                            │                                            │
//! │                            ▼                                            │
//! │                 ClientError::Unauthorized ──► log in again              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is passed explicitly to everything that makes authenticated
//! requests. It is never stored in a global and never changes after it is
//! built; a new login makes a new session.
//!
//! The service owns signature verification. This side only reads the
//! payload, so the signature is not checked here.

use jsonwebtoken::{DecodingKey, Validation};
use punto_core::EmployeeId;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Claims
// =============================================================================

/// Claims of interest in the token payload. All optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "employeeId", default, deserialize_with = "de_opt_id")]
    pub employee_id: Option<EmployeeId>,

    /// Subject; number or string depending on the service version.
    #[serde(default)]
    pub sub: Option<serde_json::Value>,

    #[serde(default)]
    pub email: Option<String>,

    /// Expiry, seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<u64>,
}

/// Accepts `7`, `"7"` or null.
fn de_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value))
}

fn id_from_value(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// =============================================================================
// Session
// =============================================================================

/// An authenticated session.
#[derive(Clone)]
pub struct Session {
    token: String,
    user_email: Option<String>,
    claims: Claims,
}

impl Session {
    /// Builds a session from a bearer token, decoding its claims.
    ///
    /// ## Errors
    /// `InvalidToken` if the token is not a JWT with a JSON payload.
    pub fn from_token(token: impl Into<String>) -> ClientResult<Self> {
        let token = token.into();
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(ClientError::InvalidToken("token is empty".into()));
        }

        let claims = decode_claims(&token)?;
        Ok(Session {
            user_email: claims.email.clone(),
            token,
            claims,
        })
    }

    /// Records the email the user logged in with.
    pub fn with_user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = Some(email.into());
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// The employee this session acts for.
    ///
    /// `employeeId` when present, otherwise a numeric subject.
    pub fn employee_id(&self) -> Option<EmployeeId> {
        self.claims
            .employee_id
            .or_else(|| self.claims.sub.as_ref().and_then(id_from_value))
    }

    /// True only when the token carries an expiry and it has passed.
    pub fn is_expired_at(&self, unix_secs: u64) -> bool {
        self.claims.exp.is_some_and(|exp| exp <= unix_secs)
    }

    /// [`Session::is_expired_at`] against the current clock.
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.is_expired_at(now)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user_email", &self.user_email)
            .field("claims", &self.claims)
            .finish()
    }
}

fn decode_claims(token: &str) -> ClientResult<Claims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token(payload: serde_json::Value) -> String {
        encode(&Header::default(), &payload, &EncodingKey::from_secret(b"service-secret")).unwrap()
    }

    #[test]
    fn test_claims_decoded_without_secret() {
        let session = Session::from_token(token(json!({
            "employeeId": 12,
            "email": "ana@punto.co",
            "exp": 2_000_000_000u64
        })))
        .unwrap();

        assert_eq!(session.employee_id(), Some(12));
        assert_eq!(session.user_email(), Some("ana@punto.co"));
        assert!(!session.is_expired_at(1_999_999_999));
        assert!(session.is_expired_at(2_000_000_000));
    }

    #[test]
    fn test_employee_id_falls_back_to_subject() {
        let session = Session::from_token(token(json!({ "sub": "31" }))).unwrap();
        assert_eq!(session.employee_id(), Some(31));

        let session = Session::from_token(token(json!({ "employeeId": "8", "sub": 31 }))).unwrap();
        assert_eq!(session.employee_id(), Some(8));
    }

    #[test]
    fn test_token_without_exp_never_expires() {
        let session = Session::from_token(token(json!({}))).unwrap();
        assert!(!session.is_expired_at(u64::MAX));
        assert_eq!(session.employee_id(), None);
    }

    #[test]
    fn test_invalid_tokens() {
        assert!(matches!(Session::from_token("  "), Err(ClientError::InvalidToken(_))));
        assert!(matches!(Session::from_token("abc.def"), Err(ClientError::InvalidToken(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::from_token(token(json!({}))).unwrap().with_user_email("a@b.co");
        let debug = format!("{:?}", session);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(session.token()));
    }
}
