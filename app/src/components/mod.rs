//! UI components

pub mod fields;
pub mod leaderboard;
pub mod site_header;
pub mod sign_in;
pub mod sign_up;
pub mod toast;
pub mod view_profile;

pub use leaderboard::Leaderboard;
pub use site_header::SiteHeader;
pub use sign_in::SignIn;
pub use sign_up::SignUp;
pub use toast::{ToastFrame, ToastManager, ToastSeverity, use_toast, use_toast_provider};
pub use view_profile::ViewProfile;
