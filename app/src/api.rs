//! Backend handle shared through context, plus browser-side session storage.

use std::rc::Rc;

use dioxus::prelude::*;

use clubboard_core::{AccountService, AppConfig, GoTrueClient, RestStore, Session};

const SESSION_KEY: &str = "clubboard.session";

pub type Accounts = AccountService<GoTrueClient, RestStore>;

// ─────────────────────────────────────────────────────────────────────────────
// Backend
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Backend {
    pub config: Rc<AppConfig>,
    pub accounts: Rc<Accounts>,
}

impl PartialEq for Backend {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.accounts, &other.accounts)
    }
}

impl Backend {
    /// Build clients from the settings compiled into the bundle.
    pub fn connect() -> Result<Self, String> {
        let config = AppConfig::from_build_env();
        config.validate().map_err(|e| e.to_string())?;
        let auth = GoTrueClient::new(config.supabase.clone()).map_err(|e| e.to_string())?;
        let store = RestStore::new(config.supabase.clone()).map_err(|e| e.to_string())?;
        let state = clubboard_core::AuthState::global().clone();
        Ok(Self {
            config: Rc::new(config),
            accounts: Rc::new(AccountService::new(auth, store, state)),
        })
    }
}

pub fn use_backend() -> Backend {
    use_context::<Backend>()
}

/// Current session, kept in sync with the auth-state publisher at the root.
#[derive(Clone, Copy, PartialEq)]
pub struct SessionSignal(pub Signal<Option<Session>>);

pub fn use_session() -> Signal<Option<Session>> {
    use_context::<SessionSignal>().0
}

/// Mirror the auth-state publisher into a signal and persist every change.
///
/// Call once at the app root.
pub fn use_session_provider(backend: &Backend) -> Signal<Option<Session>> {
    let state = backend.accounts.auth_state().clone();
    let mut session = use_signal(|| state.current());
    use_context_provider(|| SessionSignal(session));

    use_hook(move || {
        let mut sub = state.subscribe();
        spawn(async move {
            while let Some(next) = sub.changed().await {
                save_session(next.as_ref());
                session.set(next);
            }
        });
    });
    session
}

// ─────────────────────────────────────────────────────────────────────────────
// Session storage
// ─────────────────────────────────────────────────────────────────────────────

fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub fn load_session() -> Option<Session> {
    let raw = storage()?.get_item(SESSION_KEY).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable saved session");
            None
        }
    }
}

fn save_session(session: Option<&Session>) {
    let Some(storage) = storage() else {
        return;
    };
    let result = match session.map(serde_json::to_string) {
        Some(Ok(json)) => storage.set_item(SESSION_KEY, &json),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "could not serialize session");
            return;
        }
        None => storage.remove_item(SESSION_KEY),
    };
    if result.is_err() {
        tracing::warn!("could not write session to local storage");
    }
}
