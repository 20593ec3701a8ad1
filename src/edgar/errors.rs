//! EDGAR-specific error types

use std::fmt;
use thiserror::Error;

/// Why an outbound call did not produce usable data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Upstream answered with a non-success HTTP status
    Status(u16),
    /// Connection, TLS, timeout, or body read failure
    Network(String),
    /// Body arrived but did not have the expected shape
    Malformed(String),
}

impl FailureReason {
    /// Network failures, 429 and 5xx may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            FailureReason::Status(code) => *code == 429 || (500..600).contains(code),
            FailureReason::Network(_) => true,
            FailureReason::Malformed(_) => false,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Status(code) => write!(f, "HTTP {}", code),
            FailureReason::Network(msg) => write!(f, "network error: {}", msg),
            FailureReason::Malformed(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("Invalid company identifier '{0}': expected up to 10 digits")]
    InvalidIdentifier(String),

    #[error("At least one form type must be requested")]
    NoFormTypes,

    #[error("Chunk size must be at least 1 word")]
    InvalidChunkSize,

    #[error("Failed to retrieve filing index for CIK {cik}: {reason}")]
    Retrieval { cik: String, reason: FailureReason },

    #[error("No recent filings recorded for CIK {cik}")]
    EmptyResult { cik: String },

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: FailureReason },

    #[error("Ticker '{0}' not found in EDGAR company tickers")]
    TickerNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EdgarError {
    /// Whether the caller may reasonably try the same operation again
    pub fn is_retryable(&self) -> bool {
        match self {
            EdgarError::Retrieval { reason, .. } | EdgarError::Fetch { reason, .. } => {
                reason.is_retryable()
            }
            _ => false,
        }
    }

    /// The upstream HTTP status, when the failure was a non-success response
    pub fn status(&self) -> Option<u16> {
        match self {
            EdgarError::Retrieval { reason: FailureReason::Status(code), .. }
            | EdgarError::Fetch { reason: FailureReason::Status(code), .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(FailureReason::Status(429).is_retryable());
        assert!(FailureReason::Status(503).is_retryable());
        assert!(!FailureReason::Status(404).is_retryable());
        assert!(!FailureReason::Status(403).is_retryable());
        assert!(FailureReason::Network("reset".into()).is_retryable());
        assert!(!FailureReason::Malformed("not json".into()).is_retryable());

        let err = EdgarError::Fetch {
            url: "https://www.sec.gov/x".into(),
            reason: FailureReason::Status(404),
        };
        assert!(!err.is_retryable());
        assert_eq!(err.status(), Some(404));
        assert!(!EdgarError::EmptyResult { cik: "0000320193".into() }.is_retryable());
    }

    #[test]
    fn test_error_messages() {
        let err = EdgarError::Retrieval {
            cik: "0000320193".into(),
            reason: FailureReason::Status(503),
        };
        assert_eq!(
            err.to_string(),
            "Failed to retrieve filing index for CIK 0000320193: HTTP 503"
        );
        assert_eq!(
            EdgarError::InvalidChunkSize.to_string(),
            "Chunk size must be at least 1 word"
        );
    }
}
