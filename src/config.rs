//! Tap configuration
//!
//! The JSON config file (or inline JSON) handed to every subcommand.
//! Credentials are consumed only by the authenticator; the extraction core
//! reads the base URL and pagination settings.

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::{PaginationConfig, DEFAULT_PAGE_SIZE};
use crate::resources::API_PREFIX;
use crate::types::BackoffType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Largest page size the WordPress REST API accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Tap configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// Site root, e.g. `https://lms.example.com`
    pub api_url: String,

    /// Username for HTTP Basic auth
    #[serde(default)]
    pub username: Option<String>,

    /// Password (usually a WordPress application password)
    #[serde(default)]
    pub password: Option<String>,

    /// Token for `Private-Token` auth
    #[serde(default)]
    pub auth_token: Option<String>,

    /// User-Agent header sent with every request
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Rows requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Query parameter carrying the page size
    #[serde(default = "default_page_size_param")]
    pub page_size_param: String,

    /// Lower bound for incremental streams without a bookmark (RFC 3339)
    #[serde(default)]
    pub start_date: Option<String>,

    /// Client-side request rate limit
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,

    /// Transport retries on 429/5xx/timeouts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_page_size_param() -> String {
    "per_page".to_string()
}

fn default_rps() -> u32 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout() -> u64 {
    30
}

impl TapConfig {
    /// Create a config with defaults for everything but the URL
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            username: None,
            password: None,
            auth_token: None,
            user_agent: None,
            page_size: default_page_size(),
            page_size_param: default_page_size_param(),
            start_date: None,
            requests_per_second: default_rps(),
            max_retries: default_max_retries(),
            timeout_seconds: default_timeout(),
        }
    }

    /// Set Basic credentials
    #[must_use]
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set a private token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the incremental start date
    #[must_use]
    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate inline JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field before any request is made
    pub fn validate(&self) -> Result<()> {
        self.site_url()?;
        self.auth()?;

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(Error::invalid_value(
                "page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}, got {}", self.page_size),
            ));
        }

        if self.page_size_param.trim().is_empty() {
            return Err(Error::invalid_value("page_size_param", "must not be empty"));
        }

        if self.timeout_seconds == 0 {
            return Err(Error::invalid_value("timeout_seconds", "must be positive"));
        }

        self.parsed_start_date()?;
        Ok(())
    }

    /// Parsed `api_url`
    fn site_url(&self) -> Result<Url> {
        let url = Url::parse(self.api_url.trim())
            .map_err(|e| Error::invalid_value("api_url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "api_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(url)
    }

    /// `api_url` joined with the LearnDash REST prefix, no trailing slash
    pub fn base_url(&self) -> Result<String> {
        let url = self.site_url()?;
        Ok(format!(
            "{}{}",
            url.as_str().trim_end_matches('/'),
            API_PREFIX
        ))
    }

    /// Credentials for the authenticator
    ///
    /// Basic auth wins when both a username and a token are configured.
    pub fn auth(&self) -> Result<AuthConfig> {
        let username = non_blank(self.username.as_deref());
        let token = non_blank(self.auth_token.as_deref());

        match (username, token) {
            (Some(username), _) => {
                let password =
                    non_blank(self.password.as_deref()).ok_or_else(|| Error::missing_field("password"))?;
                Ok(AuthConfig::Basic { username, password })
            }
            (None, Some(token)) => Ok(AuthConfig::PrivateToken { token }),
            (None, None) => Err(Error::config(
                "either username/password or auth_token must be provided",
            )),
        }
    }

    /// Parsed `start_date`
    pub fn parsed_start_date(&self) -> Result<Option<DateTime<Utc>>> {
        self.start_date
            .as_deref()
            .map(|raw| {
                DateTime::parse_from_rfc3339(raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| Error::invalid_value("start_date", e.to_string()))
            })
            .transpose()
    }

    /// Pagination settings for the paginator
    pub fn pagination(&self) -> PaginationConfig {
        PaginationConfig::new().with_page_size(&self.page_size_param, self.page_size)
    }

    /// Transport settings for the HTTP client
    pub fn http(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .max_retries(self.max_retries)
            .backoff(
                BackoffType::Exponential,
                Duration::from_millis(500),
                Duration::from_secs(60),
            )
            .rate_limit(RateLimiterConfig::per_second(self.requests_per_second))
            .build()
    }
}

// Secrets stay out of logs
impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("auth_token", &self.auth_token.as_ref().map(|_| "***"))
            .field("user_agent", &self.user_agent)
            .field("page_size", &self.page_size)
            .field("page_size_param", &self.page_size_param)
            .field("start_date", &self.start_date)
            .field("requests_per_second", &self.requests_per_second)
            .field("max_retries", &self.max_retries)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Treat a blank credential the same as a missing one
fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_minimal_config() {
        let config = TapConfig::from_json(
            r#"{"api_url": "https://lms.example.com", "username": "u", "password": "p"}"#,
        )
        .unwrap();

        assert_eq!(config.page_size, 100);
        assert_eq!(config.page_size_param, "per_page");
        assert_eq!(config.requests_per_second, 10);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.start_date.is_none());
    }

    #[test_case("https://lms.example.com", "https://lms.example.com/wp-json/ldlms/v2" ; "bare host")]
    #[test_case("https://lms.example.com/", "https://lms.example.com/wp-json/ldlms/v2" ; "trailing slash")]
    #[test_case("http://example.com/school", "http://example.com/school/wp-json/ldlms/v2" ; "subdirectory")]
    fn test_base_url(api_url: &str, expected: &str) {
        let config = TapConfig::new(api_url).with_token("t");
        assert_eq!(config.base_url().unwrap(), expected);
    }

    #[test]
    fn test_missing_api_url() {
        let err = TapConfig::from_json(r#"{"username": "u", "password": "p"}"#).unwrap_err();
        assert!(err.to_string().contains("api_url"));
    }

    #[test_case("not a url" ; "garbage")]
    #[test_case("ftp://example.com" ; "wrong scheme")]
    fn test_invalid_api_url(api_url: &str) {
        let err = TapConfig::new(api_url).with_token("t").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "api_url"));
    }

    #[test]
    fn test_basic_auth() {
        let config = TapConfig::new("https://x.test").with_basic_auth("admin", "secret");
        assert_eq!(
            config.auth().unwrap(),
            AuthConfig::Basic {
                username: "admin".to_string(),
                password: "secret".to_string()
            }
        );
    }

    #[test]
    fn test_token_auth() {
        let config = TapConfig::new("https://x.test").with_token("abc");
        assert_eq!(
            config.auth().unwrap(),
            AuthConfig::PrivateToken {
                token: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_missing_credentials() {
        let err = TapConfig::new("https://x.test").validate().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_blank_username_falls_back_to_token() {
        let mut config = TapConfig::new("https://x.test").with_token("abc");
        config.username = Some("  ".to_string());
        assert_eq!(
            config.auth().unwrap(),
            AuthConfig::PrivateToken {
                token: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_username_without_password() {
        let mut config = TapConfig::new("https://x.test");
        config.username = Some("admin".to_string());
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::MissingConfigField { ref field } if field == "password"
        ));
    }

    #[test_case(0 ; "zero")]
    #[test_case(101 ; "too large")]
    fn test_invalid_page_size(page_size: u32) {
        let mut config = TapConfig::new("https://x.test").with_token("t");
        config.page_size = page_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_start_date() {
        let config = TapConfig::new("https://x.test")
            .with_token("t")
            .with_start_date("2024-01-01T00:00:00Z");
        let parsed = config.parsed_start_date().unwrap().unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-01T00:00:00+00:00");

        let bad = TapConfig::new("https://x.test")
            .with_token("t")
            .with_start_date("yesterday");
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_pagination_and_http_settings() {
        let mut config = TapConfig::new("https://x.test").with_token("t");
        config.page_size = 50;
        config.page_size_param = "limit".to_string();
        config.requests_per_second = 2;
        config.timeout_seconds = 5;

        let pagination = config.pagination();
        assert_eq!(pagination.page_size, 50);
        assert_eq!(pagination.page_size_param, "limit");

        let http = config.http();
        assert_eq!(http.timeout, Duration::from_secs(5));
        assert_eq!(http.rate_limit, Some(RateLimiterConfig::new(2, 2)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = TapConfig::new("https://x.test").with_basic_auth("admin", "hunter2");
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
