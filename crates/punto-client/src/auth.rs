//! Login against `POST /auth/login`.

use punto_core::validation::{validate_email, validate_required};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ClientError, ClientResult};
use crate::session::Session;
use crate::transport::HttpTransport;

pub const LOGIN_PATH: &str = "/auth/login";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    #[serde(rename = "userEmail")]
    user_email: &'a str,
    #[serde(rename = "userPassword")]
    user_password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(alias = "access_token", alias = "accessToken")]
    token: String,
}

/// Exchanges credentials for a [`Session`].
///
/// ## Errors
/// - `Validation` if either credential is blank, before any request
/// - `LoginFailed` if the service refuses the credentials
/// - transport errors as they come
pub async fn login(transport: &HttpTransport, email: &str, password: &str) -> ClientResult<Session> {
    let email = email.trim();
    validate_required("userEmail", email)?;
    validate_email("userEmail", email)?;
    validate_required("userPassword", password)?;

    let request = LoginRequest {
        user_email: email,
        user_password: password,
    };

    let response: LoginResponse = match transport.post(LOGIN_PATH, None, &request).await {
        Ok(response) => response,
        Err(ClientError::Unauthorized) => {
            warn!(email, "Login refused");
            return Err(ClientError::LoginFailed("invalid credentials".into()));
        }
        Err(ClientError::Rejected { message, .. }) => {
            warn!(email, %message, "Login rejected");
            return Err(ClientError::LoginFailed(message));
        }
        Err(ClientError::NotFound { .. }) => {
            warn!(email, "Login user not found");
            return Err(ClientError::LoginFailed("unknown user".into()));
        }
        Err(e) => return Err(e),
    };

    let session = Session::from_token(response.token)?.with_user_email(email);
    info!(email, employee_id = ?session.employee_id(), "Logged in");
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[test]
    fn test_login_request_wire_names() {
        let body = serde_json::to_value(LoginRequest {
            user_email: "ana@punto.co",
            user_password: "secret",
        })
        .unwrap();
        assert_eq!(body["userEmail"], "ana@punto.co");
        assert_eq!(body["userPassword"], "secret");
    }

    #[test]
    fn test_login_response_aliases() {
        let r: LoginResponse = serde_json::from_str(r#"{"token":"a.b.c"}"#).unwrap();
        assert_eq!(r.token, "a.b.c");
        let r: LoginResponse = serde_json::from_str(r#"{"access_token":"x.y.z"}"#).unwrap();
        assert_eq!(r.token, "x.y.z");
    }

    #[tokio::test]
    async fn test_blank_credentials_rejected_locally() {
        // Port 9 is never contacted: validation fails first.
        let mut config = ClientConfig::default();
        config.api.base_url = "http://127.0.0.1:9".into();
        let transport = HttpTransport::new(&config).unwrap();

        let err = login(&transport, "  ", "pw").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let err = login(&transport, "not-an-email", "pw").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let err = login(&transport, "ana@punto.co", "").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }
}
