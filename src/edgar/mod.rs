//! SEC EDGAR module
//!
//! Filing index resolution against the submissions API, archive URL
//! construction, and rate-limited document retrieval.

pub mod client;
pub mod errors;
pub mod locator;
pub mod resolver;
pub mod tickers;
pub mod types;

pub use client::{EdgarClient, Throttle};
pub use errors::{EdgarError, FailureReason};
pub use locator::locate;
pub use resolver::resolve;
pub use tickers::lookup_cik;
