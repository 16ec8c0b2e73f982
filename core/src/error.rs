//! Error types for store, auth, validation and config failures.

use std::path::PathBuf;

use thiserror::Error;

/// Failure talking to the profile table.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no profile found for user {0}")]
    ProfileNotFound(String),

    #[error("store is not configured: {0}")]
    NotConfigured(String),
}

/// Failure reported by the auth service.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service rejected the request; `message` is its own text.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("User already registered")]
    AlreadyRegistered,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("could not decode auth response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Input rejected before any network call. Messages are shown inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("Username must be at most {max} characters")]
    UsernameTooLong { max: usize },

    #[error("{value:?} is not a valid {field}")]
    UnknownCode { field: &'static str, value: String },
}

/// Failure from the account and profile flows.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The account exists and is signed in, but its profile row was not
    /// written. Loading the profile creates it.
    #[error("account created, but saving your profile failed: {0}")]
    ProfileNotCreated(#[source] StoreError),
}

/// Failure loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing setting {0}")]
    Missing(&'static str),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[cfg(not(target_arch = "wasm32"))]
    #[error("config store error: {0}")]
    Confy(#[from] confy::ConfyError),
}
