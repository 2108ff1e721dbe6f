//! Outbound HTTP client shared by all upstream integrations

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response};

use crate::config::HttpConfig;
use crate::error::FetchError;

/// Build the client every fetcher uses: one timeout, one user agent, no retries
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    client_builder(config)
        .build()
        .with_context(|| "Failed to create HTTP client")
}

/// Client for the OAuth2 token exchange, which must not follow redirects
pub fn build_token_client(config: &HttpConfig) -> Result<Client> {
    client_builder(config)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .with_context(|| "Failed to create OAuth2 HTTP client")
}

fn client_builder(config: &HttpConfig) -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(config.user_agent.clone())
}

/// Treat any non-2xx status as a failed lookup
pub(crate) fn ensure_success(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::Status(status))
    }
}
