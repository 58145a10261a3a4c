//! Account endpoints under `/api/users`
//!
//! [`login`] and [`logout`] also update the transport's bearer token, so a
//! session keeps working with the new identity without being rebuilt.
//! Persisting the token between runs is left to the caller.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::ApiResult;
use crate::models::{Metadata, User};
use crate::transport::{ApiRequest, Transport};

const USERS_PATH: &str = "/api/users";

fn users_path(action: &str) -> String {
    format!("{}/{}", USERS_PATH, action)
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// A new account
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub name: String,
    pub surname: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Profile fields to change; `None` leaves a field as it is
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.surname.is_none() && self.metadata.is_none()
    }
}

#[derive(Debug, Deserialize)]
struct AuthToken {
    token: String,
}

async fn post_json<B: Serialize + ?Sized>(
    transport: &dyn Transport,
    action: &str,
    body: &B,
) -> ApiResult<Value> {
    let request = ApiRequest::post(users_path(action)).with_json(body)?;
    transport.request(request).await
}

pub async fn register(transport: &dyn Transport, registration: &Registration) -> ApiResult<User> {
    debug!("Registering {}", registration.email);
    let value = post_json(transport, "register", registration).await?;
    Ok(serde_json::from_value(value)?)
}

/// Exchange credentials for a token
///
/// The token is installed on `transport` before it is returned.
pub async fn login(transport: &dyn Transport, credentials: &Credentials) -> ApiResult<String> {
    debug!("Logging in as {}", credentials.email);
    let value = post_json(transport, "login", credentials).await?;
    let AuthToken { token } = serde_json::from_value(value)?;
    transport.set_token(Some(token.clone()));
    Ok(token)
}

/// End the server session
///
/// The transport forgets its token whether or not the server call succeeds.
pub async fn logout(transport: &dyn Transport) -> ApiResult<()> {
    let result = transport.request(ApiRequest::post(users_path("logout"))).await;
    transport.set_token(None);
    if let Err(ref err) = result {
        warn!("Logout request failed: {}", err);
    }
    result.map(|_| ())
}

pub async fn profile(transport: &dyn Transport) -> ApiResult<User> {
    let value = transport
        .request(ApiRequest::get(users_path("profile")))
        .await?;
    Ok(serde_json::from_value(value)?)
}

pub async fn update_profile(
    transport: &dyn Transport,
    changes: &ProfileChanges,
) -> ApiResult<User> {
    let request = ApiRequest::put(users_path("profile")).with_json(changes)?;
    let value = transport.request(request).await?;
    Ok(serde_json::from_value(value)?)
}

pub async fn change_password(
    transport: &dyn Transport,
    current_password: &str,
    new_password: &str,
) -> ApiResult<()> {
    let body = json!({ "currentPassword": current_password, "newPassword": new_password });
    post_json(transport, "change-password", &body).await?;
    Ok(())
}

/// Ask the server to mail a password reset code
pub async fn forgot_password(transport: &dyn Transport, email: &str) -> ApiResult<()> {
    let request = ApiRequest::post(users_path("forgot-password")).with_param("email", email);
    transport.request(request).await?;
    Ok(())
}

/// Ask the server to mail an account verification code
pub async fn send_verification(transport: &dyn Transport, email: &str) -> ApiResult<()> {
    let request = ApiRequest::post(users_path("send-verification")).with_param("email", email);
    transport.request(request).await?;
    Ok(())
}

pub async fn verify_account(transport: &dyn Transport, code: &str) -> ApiResult<User> {
    let value = post_json(transport, "verify-account", &json!({ "code": code })).await?;
    Ok(serde_json::from_value(value)?)
}

/// Set a new password using a mailed reset code
pub async fn reset_password(transport: &dyn Transport, code: &str, password: &str) -> ApiResult<()> {
    let body = json!({ "code": code, "password": password });
    post_json(transport, "reset-password", &body).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::test_support::ScriptedTransport;
    use crate::transport::Method;

    fn user_json() -> Value {
        json!({ "id": 7, "email": "ana@example.com", "name": "Ana", "surname": "Diaz" })
    }

    #[tokio::test]
    async fn test_login_installs_token() {
        let transport = ScriptedTransport::new();
        transport.respond_ok(json!({ "token": "abc123" }));

        let token = login(&*transport, &Credentials::new("ana@example.com", "secret"))
            .await
            .unwrap();

        assert_eq!(token, "abc123");
        assert_eq!(transport.token().as_deref(), Some("abc123"));

        let request = transport.last_request();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/api/users/login");
        assert_eq!(
            request.body,
            Some(json!({ "email": "ana@example.com", "password": "secret" }))
        );
    }

    #[tokio::test]
    async fn test_failed_login_keeps_token() {
        let transport = ScriptedTransport::new();
        transport.set_token(Some("old".to_string()));
        transport.respond_err(ApiError::status(401, Some("Invalid credentials".to_string())));

        let err = login(&*transport, &Credentials::new("ana@example.com", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Invalid credentials");
        assert_eq!(transport.token().as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_login_without_token_is_invalid_response() {
        let transport = ScriptedTransport::new();
        transport.respond_ok(json!({ "user": 7 }));

        let err = login(&*transport, &Credentials::new("ana@example.com", "secret"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidResponse(_)));
        assert!(transport.token().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_token_even_on_failure() {
        let transport = ScriptedTransport::new();
        transport.set_token(Some("abc123".to_string()));
        transport.respond_err(ApiError::Network("offline".to_string()));

        assert!(logout(&*transport).await.is_err());
        assert!(transport.token().is_none());
        assert_eq!(transport.last_request().path, "/api/users/logout");
    }

    #[tokio::test]
    async fn test_register_and_profile() {
        let transport = ScriptedTransport::new();
        transport.respond_ok(user_json());
        transport.respond_ok(user_json());
        transport.respond_ok(json!({ "id": 7, "email": "ana@example.com", "name": "Ana", "surname": "Ruiz" }));

        let registration = Registration {
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            surname: "Diaz".to_string(),
            password: "secret".to_string(),
            metadata: None,
        };
        let user = register(&*transport, &registration).await.unwrap();
        assert_eq!(user.id, 7);

        let user = profile(&*transport).await.unwrap();
        assert_eq!(user.full_name(), "Ana Diaz");

        let changes = ProfileChanges {
            surname: Some("Ruiz".to_string()),
            ..Default::default()
        };
        let user = update_profile(&*transport, &changes).await.unwrap();
        assert_eq!(user.surname, "Ruiz");

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/api/users/register");
        assert!(requests[0].body.as_ref().unwrap().get("metadata").is_none());
        assert_eq!(requests[1].method, Method::Get);
        assert_eq!(requests[1].path, "/api/users/profile");
        assert_eq!(requests[2].method, Method::Put);
        assert_eq!(requests[2].body, Some(json!({ "surname": "Ruiz" })));
    }

    #[tokio::test]
    async fn test_password_and_verification_requests() {
        let transport = ScriptedTransport::new();
        transport.respond_ok(Value::Null);
        transport.respond_ok(Value::Null);
        transport.respond_ok(Value::Null);
        transport.respond_ok(user_json());
        transport.respond_ok(Value::Null);

        change_password(&*transport, "old", "new").await.unwrap();
        forgot_password(&*transport, "ana@example.com").await.unwrap();
        send_verification(&*transport, "ana@example.com").await.unwrap();
        let verified = verify_account(&*transport, "123456").await.unwrap();
        reset_password(&*transport, "654321", "fresh").await.unwrap();

        assert_eq!(verified.email, "ana@example.com");

        let requests = transport.requests();
        assert!(requests.iter().all(|r| r.method == Method::Post));
        assert_eq!(
            requests[0].body,
            Some(json!({ "currentPassword": "old", "newPassword": "new" }))
        );
        // The email travels in the query string, not the body
        assert_eq!(requests[1].path, "/api/users/forgot-password");
        assert_eq!(requests[1].param("email"), Some("ana@example.com"));
        assert!(requests[1].body.is_none());
        assert_eq!(requests[2].path, "/api/users/send-verification");
        assert_eq!(requests[2].param("email"), Some("ana@example.com"));
        assert_eq!(requests[3].body, Some(json!({ "code": "123456" })));
        assert_eq!(
            requests[4].body,
            Some(json!({ "code": "654321", "password": "fresh" }))
        );
    }

    #[test]
    fn test_profile_changes_is_empty() {
        assert!(ProfileChanges::default().is_empty());
        let changes = ProfileChanges {
            name: Some("Ana".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
