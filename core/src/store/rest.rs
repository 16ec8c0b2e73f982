//! PostgREST client for the hosted `user_profiles` table.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use clubboard_types::{LeaderboardEntry, ProfileUpdate, UserProfile};

use super::ProfileStore;
use crate::config::SupabaseConfig;
use crate::error::StoreError;
use crate::http;
use crate::query::{TableQuery, USER_PROFILES};

#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    config: SupabaseConfig,
}

impl RestStore {
    pub fn new(config: SupabaseConfig) -> Result<Self, StoreError> {
        if config.url.is_empty() || config.anon_key.is_empty() {
            return Err(StoreError::NotConfigured(
                "supabase url and anon key must be set".to_string(),
            ));
        }
        Ok(Self {
            client: http::client()?,
            config,
        })
    }

    /// Attach the API key and bearer token. Anonymous calls use the anon key
    /// as the bearer.
    fn request(&self, builder: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.config.anon_key);
        builder
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    fn table_url(&self, table: &str) -> String {
        self.config.rest_url(table)
    }

    async fn read<T: DeserializeOwned>(
        &self,
        query: &TableQuery,
        access_token: Option<&str>,
    ) -> Result<Vec<T>, StoreError> {
        let params = query.to_params();
        tracing::debug!(table = %query.table, ?params, "select");
        let builder = self.client.get(self.table_url(&query.table)).query(&params);
        let response = self.request(builder, access_token).send().await?;
        decode(response).await
    }
}

/// Turn a non-2xx response into [`StoreError::Status`], using PostgREST's
/// `message` field when the body has one.
async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = http::error_message(&body).unwrap_or_else(|| status.to_string());
    tracing::warn!(status = status.as_u16(), %message, "store request failed");
    Err(StoreError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let body = check(response).await?.text().await?;
    Ok(serde_json::from_str(&body)?)
}

impl ProfileStore for RestStore {
    async fn select_leaderboard(&self, query: &TableQuery) -> Result<Vec<LeaderboardEntry>, StoreError> {
        self.read(query, None).await
    }

    async fn fetch_profile(&self, access_token: &str, user_id: &str) -> Result<UserProfile, StoreError> {
        let query = TableQuery::on(USER_PROFILES).select(&["*"]).eq("user_id", user_id);
        let rows: Vec<UserProfile> = self.read(&query, Some(access_token)).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::ProfileNotFound(user_id.to_string()))
    }

    async fn insert_profile(&self, access_token: &str, profile: &UserProfile) -> Result<(), StoreError> {
        let builder = self
            .client
            .post(self.table_url(USER_PROFILES))
            .header("Prefer", "return=minimal")
            .json(profile);
        let response = self.request(builder, Some(access_token)).send().await?;
        check(response).await?;
        tracing::info!(user_id = %profile.user_id, "inserted profile");
        Ok(())
    }

    async fn update_profile(
        &self,
        access_token: &str,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, StoreError> {
        let filter = TableQuery::on(USER_PROFILES).eq("user_id", user_id);
        let builder = self
            .client
            .patch(self.table_url(USER_PROFILES))
            .query(&filter.to_params())
            .header("Prefer", "return=representation")
            .json(update);
        let response = self.request(builder, Some(access_token)).send().await?;
        let rows: Vec<UserProfile> = decode(response).await?;
        // An RLS-filtered or missing row updates nothing and returns []
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::ProfileNotFound(user_id.to_string()))
    }
}
