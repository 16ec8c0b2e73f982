//! Access to the `user_profiles` table.
//!
//! [`ProfileStore`] is the capability contract the rest of the crate depends
//! on. [`RestStore`] talks to the hosted table API; [`MemoryStore`] evaluates
//! the same queries over rows held in process.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use clubboard_types::{LeaderboardEntry, ProfileUpdate, UserProfile};

use crate::error::StoreError;
use crate::query::TableQuery;

#[allow(async_fn_in_trait)]
pub trait ProfileStore {
    /// Run a leaderboard read and return rows in query order.
    async fn select_leaderboard(&self, query: &TableQuery) -> Result<Vec<LeaderboardEntry>, StoreError>;

    /// Fetch the profile row owned by `user_id`.
    ///
    /// `access_token` is the signed-in user's token; row access is scoped by it.
    async fn fetch_profile(&self, access_token: &str, user_id: &str) -> Result<UserProfile, StoreError>;

    async fn insert_profile(&self, access_token: &str, profile: &UserProfile) -> Result<(), StoreError>;

    /// Overwrite editable fields of the row whose `user_id` matches.
    async fn update_profile(
        &self,
        access_token: &str,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, StoreError>;
}
