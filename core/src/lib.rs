pub mod account;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod leaderboard;
pub mod query;
pub mod store;
pub mod validation;

// Re-exports for convenience
pub use account::{AccountService, SignUpResult};
pub use auth::{
    AuthService, AuthState, AuthSubscription, AuthUser, Credentials, GoTrueClient, MemoryAuth,
    Session, SignUpOutcome,
};
pub use config::AppConfig;
pub use error::{AccountError, AuthError, ConfigError, StoreError, ValidationError};
pub use leaderboard::{LeaderboardController, LoadState, RequestTicket};
pub use query::{LeaderboardPage, LeaderboardRequest, TableQuery};
pub use store::{MemoryStore, ProfileStore, RestStore};
pub use validation::{SignInForm, SignUpForm};
