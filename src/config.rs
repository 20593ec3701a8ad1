//! Centralized configuration management for fastedgar

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};
use tracing::warn;

use crate::edgar::EdgarError;

/// Smallest gap allowed between two requests to the same EDGAR host
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Words per chunk handed to length-limited analysis
pub const DEFAULT_CHUNK_SIZE: usize = 500;

const DEFAULT_USER_AGENT: &str = "fastedgar/0.1.0 (contact@example.com)";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for saved filing text
    pub download_dir: PathBuf,
    /// Words per text chunk
    pub chunk_size: usize,
    /// Upstream endpoints
    pub endpoints: Endpoints,
    /// Identification headers sent with every request
    pub headers: RequestHeaders,
    /// Rate limiting configuration
    pub rate_limits: RateLimits,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// EDGAR base URLs, overridable so tests can point at a local server
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Submissions API base, without the trailing `CIK##########.json`
    pub submissions_base: String,
    /// Archive base, without the trailing `{cik}/{accession}/{document}`
    pub archives_base: String,
    /// Ticker to CIK mapping file
    pub tickers_url: String,
}

/// Headers the SEC expects on automated requests.
///
/// `user_agent` must name the requester and carry a contact address; EDGAR
/// throttles or blocks clients that don't.
#[derive(Debug, Clone)]
pub struct RequestHeaders {
    pub user_agent: String,
    pub accept: String,
    pub connection: String,
    pub referer: String,
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimits {
    /// Delay between requests to the same host (milliseconds)
    pub request_interval_ms: u64,
}

/// HTTP client configuration
#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    /// Request timeout in seconds, no timeout when unset
    pub timeout_seconds: Option<u64>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            submissions_base: "https://data.sec.gov/submissions".to_string(),
            archives_base: "https://www.sec.gov/Archives/edgar/data".to_string(),
            tickers_url: "https://www.sec.gov/files/company_tickers.json".to_string(),
        }
    }
}

impl RequestHeaders {
    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Self::default()
        }
    }
}

impl Default for RequestHeaders {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
            connection: "keep-alive".to_string(),
            referer: "https://www.sec.gov/".to_string(),
        }
    }
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            request_interval_ms: MIN_REQUEST_INTERVAL.as_millis() as u64,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("./downloads"),
            chunk_size: DEFAULT_CHUNK_SIZE,
            endpoints: Endpoints::default(),
            headers: RequestHeaders::default(),
            rate_limits: RateLimits::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let download_dir = std::env::var("FASTEDGAR_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.download_dir);

        let endpoints = Endpoints {
            submissions_base: std::env::var("FASTEDGAR_SUBMISSIONS_URL")
                .unwrap_or(defaults.endpoints.submissions_base),
            archives_base: std::env::var("FASTEDGAR_ARCHIVES_URL")
                .unwrap_or(defaults.endpoints.archives_base),
            tickers_url: std::env::var("FASTEDGAR_TICKERS_URL")
                .unwrap_or(defaults.endpoints.tickers_url),
        };

        let headers = match std::env::var("FASTEDGAR_USER_AGENT") {
            Ok(user_agent) => RequestHeaders::with_user_agent(user_agent),
            Err(_) => defaults.headers,
        };

        let rate_limits = RateLimits {
            request_interval_ms: parse_env_var("FASTEDGAR_REQUEST_INTERVAL_MS")?
                .unwrap_or(defaults.rate_limits.request_interval_ms),
        };

        let http = HttpConfig {
            timeout_seconds: parse_env_var("FASTEDGAR_HTTP_TIMEOUT_SECONDS")?,
        };

        Ok(Config {
            download_dir,
            chunk_size: parse_env_var("FASTEDGAR_CHUNK_SIZE")?.unwrap_or(defaults.chunk_size),
            endpoints,
            headers,
            rate_limits,
            http,
        })
    }

    /// Get the per-host request interval as Duration
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.rate_limits.request_interval_ms)
    }

    /// Get HTTP timeout as Duration, if one is configured
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http.timeout_seconds.map(Duration::from_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.headers.user_agent.trim().is_empty() {
            return Err(anyhow::anyhow!("User agent must not be empty"));
        }
        if !self.headers.user_agent.contains('@') {
            warn!(
                "User agent '{}' carries no contact address; EDGAR may throttle these requests",
                self.headers.user_agent
            );
        } else if self.headers.user_agent == DEFAULT_USER_AGENT {
            warn!("Using the placeholder user agent; set FASTEDGAR_USER_AGENT to your own name and email");
        }

        if self.request_interval() < MIN_REQUEST_INTERVAL {
            return Err(anyhow::anyhow!(
                "Request interval of {}ms is below the {}ms minimum",
                self.rate_limits.request_interval_ms,
                MIN_REQUEST_INTERVAL.as_millis()
            ));
        }

        if self.chunk_size == 0 {
            return Err(EdgarError::InvalidChunkSize.into());
        }

        Ok(())
    }

    /// Create the download directory if it is missing
    pub fn ensure_download_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.download_dir)
            .with_context(|| format!("Cannot create download directory: {}", self.download_dir.display()))
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.download_dir, PathBuf::from("./downloads"));
        assert_eq!(config.rate_limits.request_interval_ms, 1000);
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.http_timeout(), None);
        assert_eq!(config.endpoints.submissions_base, "https://data.sec.gov/submissions");
        assert!(config.headers.user_agent.contains('@'));
    }

    #[test]
    fn test_config_validation() {
        Config::default().validate().unwrap();

        let mut config = Config::default();
        config.rate_limits.request_interval_ms = 250;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.headers.user_agent = "   ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.chunk_size = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EdgarError>(),
            Some(EdgarError::InvalidChunkSize)
        ));
    }

    #[test]
    fn test_parse_env_var_rejects_garbage() {
        std::env::set_var("FASTEDGAR_TEST_PARSE_GARBAGE", "soon");
        assert!(parse_env_var::<u64>("FASTEDGAR_TEST_PARSE_GARBAGE").is_err());
        assert_eq!(parse_env_var::<u64>("FASTEDGAR_TEST_PARSE_UNSET").unwrap(), None);
    }
}
