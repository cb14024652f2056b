//! Page fetching with bounded retry, plus local HTML input.
//!
//! Fetching is synchronous: each attempt blocks the calling thread for at
//! most the configured timeout, and the retry delay is a plain sleep.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::{Result, SerapisError};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-attempt request timeout in seconds.
    pub timeout: u64,
    /// Optional User-Agent string. No header is sent when unset.
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 10, user_agent: None }
    }
}

/// A page body as returned by one successful attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Builds the blocking HTTP client used by both extractors.
pub fn build_client(config: &FetchConfig) -> Result<Client> {
    let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout));
    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }
    builder.build().map_err(SerapisError::HttpError)
}

/// Performs a single GET and returns the decoded body.
///
/// Error statuses count as failures, as do bodies that cannot be decoded as text.
pub fn fetch_once(client: &Client, url: &str, timeout: u64) -> Result<RawResponse> {
    let parsed_url = Url::parse(url).map_err(|e| SerapisError::InvalidUrl(e.to_string()))?;

    let response = client.get(parsed_url).send().map_err(|e| {
        if e.is_timeout() { SerapisError::Timeout { timeout } } else { SerapisError::HttpError(e) }
    })?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(SerapisError::HttpStatus { status: status.as_u16(), url: url.to_string() });
    }

    let final_url = response.url().to_string();
    let body = response.text()?;

    Ok(RawResponse { url: final_url, status: status.as_u16(), body })
}

/// Fetches `url`, making at most `max_attempts` attempts with `delay` between them.
///
/// Returns `None` once every attempt has failed, after logging a single error
/// for the URL. Individual failed attempts are logged at `warn`.
pub fn fetch_with_retry(client: &Client, url: &str, timeout: u64, max_attempts: u32, delay: Duration) -> Option<RawResponse> {
    let mut remaining = max_attempts;

    while remaining > 0 {
        let attempt = max_attempts - remaining + 1;
        tracing::debug!(url, attempt, "fetching page");

        match fetch_once(client, url, timeout) {
            Ok(response) => return Some(response),
            Err(err) => {
                tracing::warn!(url, attempt, error = %err, "fetch attempt failed");
                remaining -= 1;
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
        }
    }

    tracing::error!(url, attempts = max_attempts, "Failed to return page for url: {url}");
    None
}

/// Reads HTML from a local file, or from standard input when `source` is `-`.
pub fn read_html_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }

    let path = PathBuf::from(source);
    if !path.exists() {
        return Err(SerapisError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("file not found: {}", path.display()),
        )));
    }

    Ok(fs::read_to_string(&path)?)
}
