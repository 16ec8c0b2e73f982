//! Authentication: service contract, clients, and the auth-state publisher.

mod gotrue;
mod memory;
mod publisher;

pub use gotrue::GoTrueClient;
pub use memory::MemoryAuth;
pub use publisher::{AuthState, AuthSubscription};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use clubboard_types::ProfileUpdate;

use crate::error::AuthError;

/// Email and password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Profile details given at sign-up, kept by the service as user
    /// metadata. Used to create the profile row if it is missing.
    #[serde(
        default,
        rename = "user_metadata",
        deserialize_with = "profile_metadata",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile: Option<ProfileUpdate>,
}

/// Metadata without the full set of profile fields reads as `None`.
fn profile_metadata<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ProfileUpdate>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// A signed-in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: AuthUser,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Result of a sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account is active and signed in.
    SignedIn(Session),
    /// The service sent a confirmation email; no session yet.
    ConfirmationRequired(AuthUser),
}

#[allow(async_fn_in_trait)]
pub trait AuthService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// Register a new account. `details` travel as user metadata so the
    /// backend can create the profile row when confirmation is required.
    async fn sign_up(
        &self,
        credentials: &Credentials,
        details: &ProfileUpdate,
    ) -> Result<SignUpOutcome, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    /// The user an access token belongs to.
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let mut session = Session {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: Some(now + Duration::minutes(5)),
            user: AuthUser {
                id: "u".into(),
                email: None,
                profile: None,
            },
        };
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::minutes(5)));
        session.expires_at = None;
        assert!(!session.is_expired(now + Duration::days(365)));
    }

    #[test]
    fn test_user_metadata_is_optional() {
        let user: AuthUser = serde_json::from_str(
            r#"{"id":"u-1","email":"ada@example.com","user_metadata":{"username":"ada","year":"junior","major":"math","main_club":"colorstack","email_verified":true}}"#,
        )
        .unwrap();
        assert_eq!(user.profile.map(|p| p.main_club), Some("colorstack".to_string()));

        for body in [
            r#"{"id":"u-2","user_metadata":{"email_verified":true}}"#,
            r#"{"id":"u-2","user_metadata":null}"#,
            r#"{"id":"u-2"}"#,
        ] {
            let user: AuthUser = serde_json::from_str(body).unwrap();
            assert_eq!(user.profile, None, "{body}");
        }
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials {
            email: "a@b.co".into(),
            password: "hunter22".into(),
        };
        let shown = format!("{creds:?}");
        assert!(shown.contains("a@b.co"));
        assert!(!shown.contains("hunter22"));
    }
}
