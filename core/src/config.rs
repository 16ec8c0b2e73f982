//! Application configuration.
//!
//! Native builds keep settings in a TOML file under the user config dir
//! (loaded through confy). `CLUBBOARD_SUPABASE_URL` and
//! `CLUBBOARD_SUPABASE_ANON_KEY` override whatever the file says. The wasm
//! build has no config dir and reads the same variables at compile time.

use serde::{Deserialize, Serialize};

use clubboard_types::PAGE_SIZE;

use crate::error::ConfigError;

pub const APP_NAME: &str = "clubboard";
pub const ENV_SUPABASE_URL: &str = "CLUBBOARD_SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "CLUBBOARD_SUPABASE_ANON_KEY";

/// Default search debounce for the leaderboard username box.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u32 = 300;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub supabase: SupabaseConfig,
    pub leaderboard: LeaderboardConfig,
}

/// Project URL and public anon key of the hosted backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    /// Table endpoint, e.g. `https://x.supabase.co/rest/v1/user_profiles`.
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), table)
    }

    /// Auth endpoint, e.g. `https://x.supabase.co/auth/v1/signup`.
    pub fn auth_url(&self, path: &str) -> String {
        format!(
            "{}/auth/v1/{}",
            self.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub page_size: usize,
    pub search_debounce_ms: u32,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }
}

impl AppConfig {
    /// Load from the user config file, then apply environment overrides.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, ConfigError> {
        let mut config: AppConfig = confy::load(APP_NAME, None)?;
        config.apply_env(|key| std::env::var(key).ok());
        tracing::debug!(url = %config.supabase.url, "loaded config");
        Ok(config)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, None, self)?;
        Ok(())
    }

    /// Location of the config file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn path() -> Result<std::path::PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }

    /// Settings baked in at compile time (used by the web build).
    pub fn from_build_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| match key {
            ENV_SUPABASE_URL => option_env!("CLUBBOARD_SUPABASE_URL").map(str::to_string),
            ENV_SUPABASE_ANON_KEY => option_env!("CLUBBOARD_SUPABASE_ANON_KEY").map(str::to_string),
            _ => None,
        });
        config
    }

    /// Override backend settings from `lookup`; blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_SUPABASE_URL).filter(|v| !v.trim().is_empty()) {
            self.supabase.url = url.trim().to_string();
        }
        if let Some(key) = lookup(ENV_SUPABASE_ANON_KEY).filter(|v| !v.trim().is_empty()) {
            self.supabase.anon_key = key.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.supabase.url.is_empty() {
            return Err(ConfigError::Missing("supabase.url"));
        }
        if !(self.supabase.url.starts_with("https://") || self.supabase.url.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                key: "supabase.url",
                reason: format!("expected an http(s) URL, got {:?}", self.supabase.url),
            });
        }
        if self.supabase.anon_key.is_empty() {
            return Err(ConfigError::Missing("supabase.anon_key"));
        }
        if !(1..=PAGE_SIZE).contains(&self.leaderboard.page_size) {
            return Err(ConfigError::Invalid {
                key: "leaderboard.page_size",
                reason: format!("must be between 1 and {PAGE_SIZE}"),
            });
        }
        Ok(())
    }
}
