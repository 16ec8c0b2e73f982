//! Sign-up, sign-in, sign-out and profile flows over an auth service and a
//! profile store. Every flow publishes its outcome to [`AuthState`].

use clubboard_types::{ProfileUpdate, UserProfile};

use crate::auth::{AuthService, AuthState, Session, SignUpOutcome};
use crate::error::{AccountError, AuthError, StoreError};
use crate::store::ProfileStore;
use crate::validation::{SignInForm, SignUpForm, validate_profile};

/// Result of a successful sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpResult {
    /// Signed in with a profile row in place.
    SignedIn(UserProfile),
    /// Waiting on an emailed confirmation link.
    ConfirmationPending { email: String },
}

pub struct AccountService<A, S> {
    auth: A,
    store: S,
    state: AuthState,
}

impl<A: AuthService, S: ProfileStore> AccountService<A, S> {
    pub fn new(auth: A, store: S, state: AuthState) -> Self {
        Self { auth, store, state }
    }

    pub fn auth_state(&self) -> &AuthState {
        &self.state
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> Option<Session> {
        self.state.current()
    }

    pub async fn sign_up(&self, form: &SignUpForm) -> Result<SignUpResult, AccountError> {
        let (credentials, details) = form.validate()?;
        match self.auth.sign_up(&credentials, &details).await? {
            SignUpOutcome::SignedIn(session) => {
                let profile = UserProfile::new_member(session.user.id.clone(), details);
                let inserted = self.store.insert_profile(&session.access_token, &profile).await;
                self.state.publish(Some(session));
                match inserted {
                    Ok(()) => {
                        tracing::info!(user_id = %profile.user_id, "profile created");
                        Ok(SignUpResult::SignedIn(profile))
                    }
                    Err(e) => {
                        tracing::warn!(user_id = %profile.user_id, error = %e, "profile insert failed after sign-up");
                        Err(AccountError::ProfileNotCreated(e))
                    }
                }
            }
            SignUpOutcome::ConfirmationRequired(user) => {
                tracing::info!(user_id = %user.id, "profile deferred until email confirmation");
                Ok(SignUpResult::ConfirmationPending {
                    email: credentials.email,
                })
            }
        }
    }

    pub async fn sign_in(&self, form: &SignInForm) -> Result<Session, AccountError> {
        let credentials = form.validate()?;
        let session = self.auth.sign_in(&credentials).await?;
        self.state.publish(Some(session.clone()));
        Ok(session)
    }

    /// Always ends signed out locally, even if the service call fails.
    pub async fn sign_out(&self) {
        if let Some(session) = self.state.current()
            && let Err(e) = self.auth.sign_out(&session.access_token).await
        {
            tracing::warn!(error = %e, "sign-out request failed; clearing local session anyway");
        }
        self.state.publish(None);
    }

    /// Check a saved session with the service and publish it if still valid.
    pub async fn restore(&self, session: Session) -> Result<Session, AccountError> {
        if session.is_expired(chrono::Utc::now()) {
            self.state.publish(None);
            return Err(AuthError::NotSignedIn.into());
        }
        match self.auth.get_user(&session.access_token).await {
            Ok(user) => {
                let session = Session { user, ..session };
                self.state.publish(Some(session.clone()));
                Ok(session)
            }
            Err(e) => {
                self.state.publish(None);
                Err(e.into())
            }
        }
    }

    fn require_session(&self) -> Result<Session, AccountError> {
        self.state.current().ok_or(AccountError::Auth(AuthError::NotSignedIn))
    }

    /// Fetch the signed-in user's row. A missing row is created from the
    /// details the user gave at sign-up, when the service kept them.
    pub async fn load_profile(&self) -> Result<UserProfile, AccountError> {
        let session = self.require_session()?;
        let token = &session.access_token;
        let user_id = &session.user.id;
        match self.store.fetch_profile(token, user_id).await {
            Err(StoreError::ProfileNotFound(id)) => {
                let Some(details) = session.user.profile.as_ref() else {
                    return Err(StoreError::ProfileNotFound(id).into());
                };
                let details = validate_profile(details)?;
                let profile = UserProfile::new_member(user_id.clone(), details);
                self.store.insert_profile(token, &profile).await?;
                tracing::info!(user_id = %profile.user_id, "missing profile created from sign-up details");
                Ok(profile)
            }
            other => Ok(other?),
        }
    }

    pub async fn save_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, AccountError> {
        let update = validate_profile(update)?;
        let session = self.require_session()?;
        let profile = self
            .store
            .update_profile(&session.access_token, &session.user.id, &update)
            .await?;
        tracing::info!(user_id = %profile.user_id, "profile saved");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryAuth;
    use crate::query::LeaderboardRequest;
    use crate::error::{StoreError, ValidationError};
    use crate::store::MemoryStore;

    fn service() -> AccountService<MemoryAuth, MemoryStore> {
        AccountService::new(MemoryAuth::new(), MemoryStore::new(), AuthState::new())
    }

    fn sign_up_form() -> SignUpForm {
        SignUpForm {
            username: "ada".into(),
            password: "secret1".into(),
            email: "ada@example.com".into(),
            year: "Junior".into(),
            major: "Math".into(),
            main_club: "ColorStack".into(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_creates_profile_and_signs_in() {
        let accounts = service();
        let mut sub = accounts.auth_state().subscribe();

        let SignUpResult::SignedIn(profile) = accounts.sign_up(&sign_up_form()).await.unwrap() else {
            panic!("expected signed in");
        };
        assert_eq!(profile.num_events_attended, 0);
        assert_eq!(profile.year, "junior");
        assert_eq!(profile.main_club, "colorstack");
        assert_eq!(accounts.store().len(), 1);
        assert!(sub.changed().await.unwrap().is_some());

        assert_eq!(accounts.load_profile().await.unwrap(), profile);
    }

    #[tokio::test]
    async fn test_failed_profile_insert_is_recovered_on_load() {
        let accounts = service();
        accounts.store().fail_next("insert blew up");

        let err = accounts.sign_up(&sign_up_form()).await.unwrap_err();
        assert!(matches!(
            &err,
            AccountError::ProfileNotCreated(StoreError::Status { status: 503, .. })
        ));
        assert!(err.to_string().contains("insert blew up"));
        assert!(accounts.auth_state().is_signed_in());
        assert!(accounts.store().is_empty());

        let profile = accounts.load_profile().await.unwrap();
        assert_eq!(profile.username, "ada");
        assert_eq!(profile.year, "junior");
        assert_eq!(profile.major, "math");
        assert_eq!(profile.main_club, "colorstack");
        assert_eq!(profile.num_events_attended, 0);
        assert_eq!(accounts.store().len(), 1);

        let board = accounts
            .store()
            .select_leaderboard(&LeaderboardRequest::default().to_query())
            .await
            .unwrap();
        assert!(board.iter().any(|row| row.username == "ada"));
    }

    #[tokio::test]
    async fn test_confirmed_account_gets_profile_on_first_load() {
        let accounts = AccountService::new(
            MemoryAuth::requiring_confirmation(),
            MemoryStore::new(),
            AuthState::new(),
        );
        accounts.sign_up(&sign_up_form()).await.unwrap();
        assert!(accounts.auth().confirm("ada@example.com"));
        accounts
            .sign_in(&SignInForm {
                email: "ada@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();

        let profile = accounts.load_profile().await.unwrap();
        assert_eq!(profile.user_id, accounts.session().unwrap().user.id);
        assert_eq!(profile.main_club, "colorstack");
        assert_eq!(accounts.load_profile().await.unwrap(), profile);
        assert_eq!(accounts.store().len(), 1);
    }

    #[tokio::test]
    async fn test_sign_up_awaiting_confirmation_stays_signed_out() {
        let accounts = AccountService::new(
            MemoryAuth::requiring_confirmation(),
            MemoryStore::new(),
            AuthState::new(),
        );
        let result = accounts.sign_up(&sign_up_form()).await.unwrap();
        assert_eq!(
            result,
            SignUpResult::ConfirmationPending {
                email: "ada@example.com".into()
            }
        );
        assert!(!accounts.auth_state().is_signed_in());
        assert!(accounts.store().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_call() {
        let accounts = service();
        let mut form = sign_up_form();
        form.email = "not-an-email".into();
        let err = accounts.sign_up(&form).await.unwrap_err();
        assert!(matches!(err, AccountError::Validation(ValidationError::InvalidEmail)));
        assert_eq!(err.to_string(), "Please enter a valid email address");

        // The address was never registered
        form.email = "ada@example.com".into();
        assert!(accounts.sign_up(&form).await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_in_error_text_is_shown_as_is() {
        let accounts = service();
        accounts.sign_up(&sign_up_form()).await.unwrap();
        accounts.sign_out().await;

        let err = accounts
            .sign_in(&SignInForm {
                email: "ada@example.com".into(),
                password: "wrong-password".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert!(!accounts.auth_state().is_signed_in());
    }

    #[tokio::test]
    async fn test_sign_out_publishes_none() {
        let accounts = service();
        accounts.sign_up(&sign_up_form()).await.unwrap();
        assert!(accounts.auth_state().is_signed_in());
        accounts.sign_out().await;
        assert!(!accounts.auth_state().is_signed_in());
        assert_eq!(accounts.auth().active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_profile_errors_are_distinct() {
        let accounts = service();
        assert!(matches!(
            accounts.load_profile().await,
            Err(AccountError::Auth(AuthError::NotSignedIn))
        ));

        accounts.sign_up(&sign_up_form()).await.unwrap();
        let mut session = accounts.session().unwrap();
        accounts.store().fail_next("boom");
        assert!(matches!(
            accounts.load_profile().await,
            Err(AccountError::Store(StoreError::Status { status: 503, .. }))
        ));

        // A session whose profile row is missing and cannot be rebuilt
        session.user.profile = None;
        let fresh = AccountService::new(MemoryAuth::new(), MemoryStore::new(), AuthState::new());
        fresh.auth_state().publish(Some(session));
        assert!(matches!(
            fresh.load_profile().await,
            Err(AccountError::Store(StoreError::ProfileNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_save_profile_updates_signed_in_row() {
        let accounts = service();
        accounts.sign_up(&sign_up_form()).await.unwrap();

        let saved = accounts
            .save_profile(&ProfileUpdate {
                username: "ada_l".into(),
                year: "senior".into(),
                major: "Computer Science".into(),
                main_club: "codeblack".into(),
            })
            .await
            .unwrap();
        assert_eq!(saved.username, "ada_l");
        assert_eq!(saved.major, "computer-science");
        assert_eq!(accounts.load_profile().await.unwrap(), saved);

        let err = accounts
            .save_profile(&ProfileUpdate {
                username: String::new(),
                ..saved.to_update()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Validation(ValidationError::Missing { field: "Username" })));
    }

    #[tokio::test]
    async fn test_restore_checks_token() {
        let accounts = service();
        accounts.sign_up(&sign_up_form()).await.unwrap();
        let session = accounts.session().unwrap();

        let other = AccountService::new(MemoryAuth::new(), MemoryStore::new(), AuthState::new());
        assert!(other.restore(session.clone()).await.is_err());
        assert!(!other.auth_state().is_signed_in());

        accounts.auth_state().publish(None);
        let restored = accounts.restore(session).await.unwrap();
        assert_eq!(restored.user.email.as_deref(), Some("ada@example.com"));
        assert!(accounts.auth_state().is_signed_in());
    }
}
