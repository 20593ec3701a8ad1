//! fastedgar: resolve a company's SEC filings, download their primary
//! documents, and turn them into clean, chunked text for analysis.

pub mod config;
pub mod edgar;
pub mod models;
pub mod pipeline;
pub mod text;

pub use config::Config;
pub use edgar::{EdgarClient, EdgarError, FailureReason};
pub use models::{Cik, FilingFilter, FilingIndexEntry, FormTypes, RawDocument};
pub use pipeline::{FilingOutcome, Pipeline, ProcessedFiling};
pub use text::{chunk, clean, normalize, TextChunk};
