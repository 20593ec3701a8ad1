//! HTTP access to EDGAR: identification headers and per-host rate limiting

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONNECTION, CONTENT_TYPE, REFERER, USER_AGENT};
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::config::{Config, Endpoints, RequestHeaders, MIN_REQUEST_INTERVAL};
use crate::edgar::{EdgarError, FailureReason};
use crate::models::RawDocument;

/// Enforces a minimum gap between consecutive requests to the same host
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_request: HashMap<String, Instant>,
}

impl Throttle {
    /// Intervals shorter than [`MIN_REQUEST_INTERVAL`] are raised to it
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval: min_interval.max(MIN_REQUEST_INTERVAL),
            last_request: HashMap::new(),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Sleep until `host` may be contacted again, then record the request
    pub async fn wait(&mut self, host: &str) {
        if let Some(last) = self.last_request.get(host) {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                debug!("Waiting {:?} before next request to {}", remaining, host);
                sleep(remaining).await;
            }
        }
        self.last_request.insert(host.to_string(), Instant::now());
    }
}

/// Sequential EDGAR client.
///
/// Every request carries the configured identification headers and goes
/// through the throttle. Methods take `&mut self`, so at most one request is
/// ever in flight per client.
pub struct EdgarClient {
    http: Client,
    headers: HeaderMap,
    throttle: Throttle,
    endpoints: Endpoints,
}

impl EdgarClient {
    pub fn new(config: &Config) -> Result<Self, EdgarError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| EdgarError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            headers: header_map(&config.headers)?,
            throttle: Throttle::new(config.request_interval()),
            endpoints: config.endpoints.clone(),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Issue a throttled GET and hand back the response whatever its status
    pub async fn get(&mut self, url: &str) -> Result<Response, FailureReason> {
        let host = reqwest::Url::parse(url)
            .map_err(|e| FailureReason::Malformed(format!("invalid URL '{}': {}", url, e)))?
            .host_str()
            .unwrap_or_default()
            .to_string();

        self.throttle.wait(&host).await;

        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| FailureReason::Network(e.to_string()))?;

        debug!("HTTP {} for {}", response.status(), url);
        Ok(response)
    }

    /// Retrieve a document body. Non-success statuses and transport
    /// failures come back as [`EdgarError::Fetch`].
    pub async fn fetch(&mut self, url: &str) -> Result<RawDocument, EdgarError> {
        let fetch_error = |reason: FailureReason| EdgarError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self.get(url).await.map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Fetching {} failed with HTTP {}", url, status);
            return Err(fetch_error(FailureReason::Status(status.as_u16())));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| fetch_error(FailureReason::Network(e.to_string())))?;

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(RawDocument {
            url: url.to_string(),
            content_type,
            body,
        })
    }
}

/// Build the per-request header set. `Accept-Encoding` is left to reqwest,
/// which advertises gzip/deflate and decodes the body.
fn header_map(headers: &RequestHeaders) -> Result<HeaderMap, EdgarError> {
    let value = |name: &str, raw: &str| {
        HeaderValue::from_str(raw)
            .map_err(|_| EdgarError::Config(format!("Invalid {} header value: {:?}", name, raw)))
    };

    let mut map = HeaderMap::new();
    map.insert(USER_AGENT, value("User-Agent", &headers.user_agent)?);
    map.insert(ACCEPT, value("Accept", &headers.accept)?);
    map.insert(CONNECTION, value("Connection", &headers.connection)?);
    map.insert(REFERER, value("Referer", &headers.referer)?);
    Ok(map)
}
