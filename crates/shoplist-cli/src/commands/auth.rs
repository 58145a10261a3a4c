//! Account command handlers
//!
//! `login` stores the returned token in the config file so later commands
//! run authenticated; `logout` removes it.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};

use shoplist_core::auth::{self, Credentials, ProfileChanges, Registration};
use shoplist_core::error::ApiResult;
use shoplist_core::transport::Transport;
use shoplist_core::{Config, Session};

use crate::output::Output;

/// Log in and remember the token in `config`
async fn sign_in(
    transport: &dyn Transport,
    config: &mut Config,
    credentials: &Credentials,
) -> ApiResult<()> {
    let token = auth::login(transport, credentials).await?;
    config.token = Some(token);
    Ok(())
}

/// Log out; `config` forgets the token even when the server call fails
async fn sign_out(transport: &dyn Transport, config: &mut Config) -> ApiResult<()> {
    let result = auth::logout(transport).await;
    config.token = None;
    result
}

/// Read one line from `input`, prompting on stderr
fn read_secret(prompt: &str, input: &mut impl BufRead) -> Result<String> {
    eprint!("{}: ", prompt);
    io::stderr().flush().ok();

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    let secret = line.trim_end_matches(['\r', '\n']).to_string();
    if secret.is_empty() {
        bail!("{} cannot be empty", prompt);
    }
    Ok(secret)
}

fn secret_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => read_secret(prompt, &mut io::stdin().lock()),
    }
}

pub async fn register(
    session: &Session,
    email: String,
    name: String,
    surname: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let registration = Registration {
        email,
        name,
        surname,
        password: secret_or_prompt(password, "Password")?,
        metadata: None,
    };
    let user = auth::register(session.transport(), &registration)
        .await
        .context("Failed to register")?;

    output.success(&format!(
        "Registered {}; check {} for a verification code",
        user.full_name(),
        user.email
    ));
    Ok(())
}

pub async fn login(
    session: &Session,
    config: &mut Config,
    email: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let credentials = Credentials::new(email, secret_or_prompt(password, "Password")?);
    sign_in(session.transport(), config, &credentials)
        .await
        .context("Failed to log in")?;
    config.save().context("Failed to save configuration")?;

    output.success(&format!("Logged in as {}", credentials.email));
    Ok(())
}

pub async fn logout(session: &Session, config: &mut Config, output: &Output) -> Result<()> {
    let result = sign_out(session.transport(), config).await;
    config.save().context("Failed to save configuration")?;

    match result {
        Ok(()) => output.success("Logged out"),
        Err(err) => output.success(&format!(
            "Logged out locally; the server session was not ended ({})",
            err.user_message()
        )),
    }
    Ok(())
}

pub async fn profile(session: &Session, output: &Output) -> Result<()> {
    let user = auth::profile(session.transport())
        .await
        .context("Failed to load profile")?;

    output.print_user(&user);
    Ok(())
}

pub async fn update_profile(
    session: &Session,
    name: Option<String>,
    surname: Option<String>,
    output: &Output,
) -> Result<()> {
    let changes = ProfileChanges {
        name,
        surname,
        metadata: None,
    };
    if changes.is_empty() {
        bail!("Nothing to update. Use --name or --surname.");
    }

    let user = auth::update_profile(session.transport(), &changes)
        .await
        .context("Failed to update profile")?;

    output.print_user(&user);
    Ok(())
}

pub async fn change_password(
    session: &Session,
    current: Option<String>,
    new: Option<String>,
    output: &Output,
) -> Result<()> {
    let current = secret_or_prompt(current, "Current password")?;
    let new = secret_or_prompt(new, "New password")?;
    auth::change_password(session.transport(), &current, &new)
        .await
        .context("Failed to change password")?;

    output.success("Password changed");
    Ok(())
}

pub async fn forgot_password(session: &Session, email: String, output: &Output) -> Result<()> {
    auth::forgot_password(session.transport(), &email)
        .await
        .context("Failed to request a password reset")?;

    output.success(&format!("Reset code sent to {}", email));
    Ok(())
}

pub async fn reset_password(
    session: &Session,
    code: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let password = secret_or_prompt(password, "New password")?;
    auth::reset_password(session.transport(), &code, &password)
        .await
        .context("Failed to reset password")?;

    output.success("Password reset; log in with the new password");
    Ok(())
}

pub async fn send_verification(session: &Session, email: String, output: &Output) -> Result<()> {
    auth::send_verification(session.transport(), &email)
        .await
        .context("Failed to send verification code")?;

    output.success(&format!("Verification code sent to {}", email));
    Ok(())
}

pub async fn verify(session: &Session, code: String, output: &Output) -> Result<()> {
    let user = auth::verify_account(session.transport(), &code)
        .await
        .context("Failed to verify account")?;

    output.success(&format!("Verified {}", user.email));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::CannedTransport;
    use serde_json::json;
    use shoplist_core::error::ApiError;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_sign_in_stores_token() {
        let transport = CannedTransport::with(vec![Ok(json!({ "token": "abc123" }))]);
        let mut config = Config::default();

        sign_in(
            &transport,
            &mut config,
            &Credentials::new("ana@example.com", "secret"),
        )
        .await
        .unwrap();

        assert_eq!(config.token.as_deref(), Some("abc123"));
        assert_eq!(transport.sent()[0].path, "/api/users/login");
    }

    #[tokio::test]
    async fn test_failed_sign_in_keeps_config() {
        let transport = CannedTransport::with(vec![Err(ApiError::status(
            401,
            Some("Invalid credentials".to_string()),
        ))]);
        let mut config = Config {
            token: Some("old".to_string()),
            ..Config::default()
        };

        let err = sign_in(&transport, &mut config, &Credentials::new("ana@example.com", "x"))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Invalid credentials");
        assert_eq!(config.token.as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_sign_out_forgets_token_when_server_fails() {
        let transport = CannedTransport::with(vec![Err(ApiError::Network("offline".to_string()))]);
        let mut config = Config {
            token: Some("abc123".to_string()),
            ..Config::default()
        };

        assert!(sign_out(&transport, &mut config).await.is_err());
        assert!(config.token.is_none());
    }

    #[test]
    fn test_read_secret() {
        let mut input = Cursor::new("hunter2\r\nignored\n");
        assert_eq!(read_secret("Password", &mut input).unwrap(), "hunter2");

        let mut empty = Cursor::new("\n");
        assert!(read_secret("Password", &mut empty).is_err());
    }
}
