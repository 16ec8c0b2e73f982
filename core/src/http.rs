//! Shared HTTP plumbing for the hosted backend.

use reqwest::Client;
use serde::Deserialize;

#[cfg(not(target_arch = "wasm32"))]
const USER_AGENT: &str = concat!("clubboard/", env!("CARGO_PKG_VERSION"));

#[cfg(not(target_arch = "wasm32"))]
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Build the HTTP client used by the store and auth clients.
#[cfg(not(target_arch = "wasm32"))]
pub fn client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// Build the HTTP client used by the store and auth clients.
///
/// The browser owns timeouts and the user agent here.
#[cfg(target_arch = "wasm32")]
pub fn client() -> Result<Client, reqwest::Error> {
    Client::builder().build()
}

/// Error bodies from the table and auth APIs use several field names.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Pull a human-readable message out of an error response body.
pub fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .or(parsed.error)
        .filter(|m| !m.is_empty())
}
