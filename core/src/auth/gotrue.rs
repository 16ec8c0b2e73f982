//! Client for the hosted auth API (GoTrue).

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;

use clubboard_types::ProfileUpdate;

use super::{AuthService, AuthUser, Credentials, Session, SignUpOutcome};
use crate::config::SupabaseConfig;
use crate::error::AuthError;
use crate::http;

#[derive(Debug, Clone)]
pub struct GoTrueClient {
    client: Client,
    config: SupabaseConfig,
}

/// Token grant body. `expires_at` is absent on older deployments.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    expires_in: Option<i64>,
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

/// Sign-up returns a token grant when the account is auto-confirmed, and the
/// bare user (sometimes nested) when an email confirmation is pending.
fn parse_sign_up(body: &str, now: DateTime<Utc>) -> Result<SignUpOutcome, AuthError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.get("access_token").is_some() {
        let token: TokenResponse = serde_json::from_value(value)?;
        return Ok(SignUpOutcome::SignedIn(token.into_session(now)));
    }
    let user = match value.get("user") {
        Some(user) => serde_json::from_value(user.clone())?,
        None => serde_json::from_value(value)?,
    };
    Ok(SignUpOutcome::ConfirmationRequired(user))
}

/// Map an auth error response to [`AuthError`], keeping the service's text.
fn classify(status: u16, body: &str) -> AuthError {
    let message = http::error_message(body).unwrap_or_else(|| format!("auth service returned {status}"));
    let lower = message.to_lowercase();
    if lower.contains("invalid login credentials") {
        AuthError::InvalidCredentials
    } else if lower.contains("already registered") || lower.contains("already been registered") {
        AuthError::AlreadyRegistered
    } else {
        AuthError::Rejected { status, message }
    }
}

async fn check(response: Response) -> Result<Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = classify(status.as_u16(), &body);
    tracing::warn!(status = status.as_u16(), error = %err, "auth request failed");
    Err(err)
}

impl GoTrueClient {
    pub fn new(config: SupabaseConfig) -> Result<Self, AuthError> {
        Ok(Self {
            client: http::client()?,
            config,
        })
    }

    fn request(&self, builder: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        let builder = builder.header("apikey", &self.config.anon_key);
        match access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl AuthService for GoTrueClient {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let builder = self
            .client
            .post(self.config.auth_url("token?grant_type=password"))
            .json(&json!({ "email": credentials.email, "password": credentials.password }));
        let response = check(self.request(builder, None).send().await?).await?;
        let token: TokenResponse = serde_json::from_str(&response.text().await?)?;
        tracing::info!(user_id = %token.user.id, "signed in");
        Ok(token.into_session(Utc::now()))
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        details: &ProfileUpdate,
    ) -> Result<SignUpOutcome, AuthError> {
        let builder = self.client.post(self.config.auth_url("signup")).json(&json!({
            "email": credentials.email,
            "password": credentials.password,
            "data": details,
        }));
        let response = check(self.request(builder, None).send().await?).await?;
        let outcome = parse_sign_up(&response.text().await?, Utc::now())?;
        match &outcome {
            SignUpOutcome::SignedIn(session) => tracing::info!(user_id = %session.user.id, "signed up"),
            SignUpOutcome::ConfirmationRequired(user) => {
                tracing::info!(user_id = %user.id, "signed up, awaiting email confirmation")
            }
        }
        Ok(outcome)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let builder = self.client.post(self.config.auth_url("logout"));
        check(self.request(builder, Some(access_token)).send().await?).await?;
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let builder = self.client.get(self.config.auth_url("user"));
        let response = check(self.request(builder, Some(access_token)).send().await?).await?;
        Ok(serde_json::from_str(&response.text().await?)?)
    }
}
