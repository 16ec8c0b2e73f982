//! Shared types for Clubboard.
//!
//! Row shapes of the `user_profiles` table, leaderboard view state, and the
//! code/label tables used by every front end.

pub mod formatting;
pub mod leaderboard;
pub mod profile;

pub use formatting::LabelDomain;
pub use leaderboard::{FilterState, PAGE_SIZE, PageState, SortColumn, SortState};
pub use profile::{LeaderboardEntry, ProfileUpdate, UserProfile};
