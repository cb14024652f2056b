//! Process-wide configuration for the extractors.
//!
//! Configuration is read once and then shared read-only by every request.
//! It can come from defaults, a TOML file, the builder, or `SERAPIS_*`
//! environment variables.
//!
//! # Example
//!
//! ```rust
//! use serapis_core::SerapisConfig;
//!
//! let config = SerapisConfig::builder()
//!     .request_retry(5)
//!     .request_seconds_before_retry(0.5)
//!     .save_html(true)
//!     .build();
//! assert_eq!(config.request_retry, 5);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::fetch::FetchConfig;
use crate::{Result, SerapisError};

/// Default Diffbot v3 article endpoint.
pub const DEFAULT_ARTICLE_API_ENDPOINT: &str = "http://api.diffbot.com/v3/article";

/// API credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Token for the article extraction API.
    pub diffbot: Option<String>,
}

/// Configuration shared by both extraction backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerapisConfig {
    /// Number of fetch attempts before a page is given up (default: 3).
    pub request_retry: u32,

    /// Seconds to sleep between fetch attempts (default: 1.0).
    pub request_seconds_before_retry: f64,

    /// Per-attempt request timeout in seconds (default: 10).
    pub request_timeout_seconds: u64,

    /// Optional User-Agent header. Requests carry no special headers when unset.
    pub user_agent: Option<String>,

    /// Whether records keep the page HTML (default: false).
    pub save_html: bool,

    /// Article API endpoint.
    pub article_api_endpoint: String,

    pub credentials: Credentials,
}

impl Default for SerapisConfig {
    fn default() -> Self {
        Self {
            request_retry: 3,
            request_seconds_before_retry: 1.0,
            request_timeout_seconds: 10,
            user_agent: None,
            save_html: false,
            article_api_endpoint: DEFAULT_ARTICLE_API_ENDPOINT.to_string(),
            credentials: Credentials::default(),
        }
    }
}

impl SerapisConfig {
    /// Creates a new builder for SerapisConfig.
    pub fn builder() -> SerapisConfigBuilder {
        SerapisConfigBuilder::new()
    }

    /// Parses configuration from a TOML string. Missing keys keep their defaults.
    ///
    /// ```rust
    /// use serapis_core::SerapisConfig;
    ///
    /// let config = SerapisConfig::from_toml_str("request_retry = 7\n[credentials]\ndiffbot = \"abc\"").unwrap();
    /// assert_eq!(config.request_retry, 7);
    /// assert_eq!(config.credentials.diffbot.as_deref(), Some("abc"));
    /// assert!(!config.save_html);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| SerapisError::ConfigError(e.to_string()))
    }

    /// Reads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|e| SerapisError::ConfigError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }

    /// Location of the user-level configuration file, `<config dir>/serapis/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("serapis").join("config.toml"))
    }

    /// Loads the user-level configuration file if it exists, defaults otherwise.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Applies `SERAPIS_DIFFBOT_TOKEN`, `SERAPIS_REQUEST_RETRY`, and `SERAPIS_SAVE_HTML`.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("SERAPIS_DIFFBOT_TOKEN")
            && !token.trim().is_empty()
        {
            self.credentials.diffbot = Some(token.trim().to_string());
        }

        if let Some(retry) = lookup("SERAPIS_REQUEST_RETRY") {
            self.request_retry = retry
                .trim()
                .parse()
                .map_err(|_| SerapisError::ConfigError(format!("SERAPIS_REQUEST_RETRY is not a count: {retry}")))?;
        }

        if let Some(flag) = lookup("SERAPIS_SAVE_HTML") {
            self.save_html = matches!(flag.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }

        Ok(self)
    }

    /// Delay between fetch attempts. Negative or non-finite values mean no delay.
    pub fn retry_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_seconds_before_retry).unwrap_or(Duration::ZERO)
    }

    /// HTTP client settings derived from this configuration.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig { timeout: self.request_timeout_seconds, user_agent: self.user_agent.clone() }
    }
}

/// Builder for SerapisConfig.
pub struct SerapisConfigBuilder {
    config: SerapisConfig,
}

impl SerapisConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: SerapisConfig::default() }
    }

    /// Sets the number of fetch attempts.
    pub fn request_retry(mut self, value: u32) -> Self {
        self.config.request_retry = value;
        self
    }

    /// Sets the delay between fetch attempts, in seconds.
    pub fn request_seconds_before_retry(mut self, value: f64) -> Self {
        self.config.request_seconds_before_retry = value;
        self
    }

    /// Sets the per-attempt timeout, in seconds.
    pub fn request_timeout_seconds(mut self, value: u64) -> Self {
        self.config.request_timeout_seconds = value;
        self
    }

    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.user_agent = Some(value.into());
        self
    }

    /// Sets whether records keep the page HTML.
    pub fn save_html(mut self, value: bool) -> Self {
        self.config.save_html = value;
        self
    }

    /// Sets the article API endpoint.
    pub fn article_api_endpoint(mut self, value: impl Into<String>) -> Self {
        self.config.article_api_endpoint = value.into();
        self
    }

    /// Sets the article API token.
    pub fn diffbot_token(mut self, value: impl Into<String>) -> Self {
        self.config.credentials.diffbot = Some(value.into());
        self
    }

    /// Builds the config.
    pub fn build(self) -> SerapisConfig {
        self.config
    }
}

impl Default for SerapisConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
