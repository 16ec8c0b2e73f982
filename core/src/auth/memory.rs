//! In-process auth service.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Duration, Utc};

use clubboard_types::ProfileUpdate;

use super::{AuthService, AuthUser, Credentials, Session, SignUpOutcome};
use crate::error::AuthError;

const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug)]
struct Account {
    password: String,
    user: AuthUser,
    confirmed: bool,
}

/// Accounts and sessions held in memory.
#[derive(Debug, Default)]
pub struct MemoryAuth {
    accounts: Mutex<HashMap<String, Account>>,
    /// access token -> user id
    sessions: Mutex<HashMap<String, String>>,
    next_id: AtomicU64,
    require_confirmation: bool,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// New sign-ups wait for [`confirm`](Self::confirm) before they can sign in.
    pub fn requiring_confirmation() -> Self {
        Self {
            require_confirmation: true,
            ..Self::default()
        }
    }

    pub fn confirm(&self, email: &str) -> bool {
        match lock(&self.accounts).get_mut(&email.to_lowercase()) {
            Some(account) => {
                account.confirmed = true;
                true
            }
            None => false,
        }
    }

    pub fn active_sessions(&self) -> usize {
        lock(&self.sessions).len()
    }

    fn issue(&self, user: &AuthUser) -> Session {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        let access_token = format!("access-{}-{n}", user.id);
        lock(&self.sessions).insert(access_token.clone(), user.id.clone());
        Session {
            access_token,
            refresh_token: format!("refresh-{}-{n}", user.id),
            expires_at: Some(Utc::now() + Duration::seconds(TOKEN_LIFETIME_SECS)),
            user: user.clone(),
        }
    }
}

impl AuthService for MemoryAuth {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let user = {
            let accounts = lock(&self.accounts);
            let account = accounts
                .get(&credentials.email.to_lowercase())
                .filter(|a| a.password == credentials.password)
                .ok_or(AuthError::InvalidCredentials)?;
            if !account.confirmed {
                return Err(AuthError::Rejected {
                    status: 400,
                    message: "Email not confirmed".to_string(),
                });
            }
            account.user.clone()
        };
        Ok(self.issue(&user))
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        details: &ProfileUpdate,
    ) -> Result<SignUpOutcome, AuthError> {
        let email = credentials.email.to_lowercase();
        let user = {
            let mut accounts = lock(&self.accounts);
            if accounts.contains_key(&email) {
                return Err(AuthError::AlreadyRegistered);
            }
            let n = self.next_id.fetch_add(1, Ordering::Relaxed);
            let user = AuthUser {
                id: format!("user-{n}"),
                email: Some(email.clone()),
                profile: Some(details.clone()),
            };
            accounts.insert(
                email,
                Account {
                    password: credentials.password.clone(),
                    user: user.clone(),
                    confirmed: !self.require_confirmation,
                },
            );
            user
        };

        if self.require_confirmation {
            Ok(SignUpOutcome::ConfirmationRequired(user))
        } else {
            Ok(SignUpOutcome::SignedIn(self.issue(&user)))
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        lock(&self.sessions).remove(access_token);
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let user_id = lock(&self.sessions)
            .get(access_token)
            .cloned()
            .ok_or(AuthError::Rejected {
                status: 401,
                message: "invalid JWT".to_string(),
            })?;
        lock(&self.accounts)
            .values()
            .find(|a| a.user.id == user_id)
            .map(|a| a.user.clone())
            .ok_or(AuthError::NotSignedIn)
    }
}
