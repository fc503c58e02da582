//! HTTP and OpenAI client construction with shared timeouts.

use crate::error::{EduAidError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for model and speech requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Build a plain HTTP client with the default request timeout.
pub fn create_http_client() -> Result<reqwest::Client> {
    create_http_client_with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Build a plain HTTP client with a custom request timeout.
pub fn create_http_client_with_timeout(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("eduaid/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| EduAidError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Create an OpenAI client with the default timeout.
///
/// Reads `OPENAI_API_KEY` from the environment.
pub fn create_client() -> Result<Client<OpenAIConfig>> {
    let http_client = create_http_client()?;
    Ok(Client::with_config(OpenAIConfig::default()).with_http_client(http_client))
}

/// Whether an OpenAI API key is present in the environment.
pub fn is_api_key_configured() -> bool {
    std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.is_empty())
}
