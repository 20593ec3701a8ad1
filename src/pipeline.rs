//! Identifier to clean text: resolve, locate, fetch, normalize, chunk

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::edgar::{self, EdgarClient, EdgarError};
use crate::models::{Cik, FilingFilter, FilingIndexEntry, FormTypes};
use crate::text::{self, Chunks};

/// A filing whose document was fetched and normalized
#[derive(Debug, Clone)]
pub struct ProcessedFiling {
    pub entry: FilingIndexEntry,
    pub url: String,
    pub content_type: Option<String>,
    pub text: String,
    pub chunk_size: NonZeroUsize,
    /// Where the clean text was written, if saving was enabled
    pub saved_to: Option<PathBuf>,
}

impl ProcessedFiling {
    /// Fresh chunk sequence over the clean text
    pub fn chunks(&self) -> Chunks<'_> {
        text::chunk(&self.text, self.chunk_size)
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Result of processing one resolved filing
#[derive(Debug)]
pub struct FilingOutcome {
    pub entry: FilingIndexEntry,
    pub url: String,
    pub result: Result<ProcessedFiling, EdgarError>,
}

pub struct Pipeline {
    client: EdgarClient,
    chunk_size: NonZeroUsize,
    output_dir: Option<PathBuf>,
}

impl Pipeline {
    /// Build a pipeline that keeps text in memory only
    pub fn new(config: &Config) -> Result<Self, EdgarError> {
        let chunk_size =
            NonZeroUsize::new(config.chunk_size).ok_or(EdgarError::InvalidChunkSize)?;

        Ok(Self {
            client: EdgarClient::new(config)?,
            chunk_size,
            output_dir: None,
        })
    }

    /// Also write each filing's clean text below `dir`
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn client(&mut self) -> &mut EdgarClient {
        &mut self.client
    }

    /// Resolve the company's filings and narrow them with `filter`
    pub async fn filings(
        &mut self,
        cik: &Cik,
        forms: &FormTypes,
        filter: &FilingFilter,
    ) -> Result<Vec<FilingIndexEntry>, EdgarError> {
        let entries = edgar::resolve(&mut self.client, cik, forms).await?;
        Ok(filter.apply(entries))
    }

    /// Archive URL of an entry's primary document
    pub fn locate(&self, cik: &Cik, entry: &FilingIndexEntry) -> String {
        edgar::locate(&self.client.endpoints().archives_base, cik, entry)
    }

    /// Run every stage for a company.
    ///
    /// A failing index lookup ends the run. A failing document is recorded
    /// in its outcome and the run moves on to the next filing.
    pub async fn run(
        &mut self,
        cik: &Cik,
        forms: &FormTypes,
        filter: &FilingFilter,
    ) -> Result<Vec<FilingOutcome>, EdgarError> {
        self.run_filings(cik, forms, filter, false).await
    }

    /// Like [`Pipeline::run`], but stop after the first filing that
    /// processes successfully. The last outcome is then the only `Ok` one.
    pub async fn run_until_success(
        &mut self,
        cik: &Cik,
        forms: &FormTypes,
        filter: &FilingFilter,
    ) -> Result<Vec<FilingOutcome>, EdgarError> {
        self.run_filings(cik, forms, filter, true).await
    }

    async fn run_filings(
        &mut self,
        cik: &Cik,
        forms: &FormTypes,
        filter: &FilingFilter,
        stop_on_success: bool,
    ) -> Result<Vec<FilingOutcome>, EdgarError> {
        let entries = self.filings(cik, forms, filter).await?;
        info!("Processing {} filings for CIK {}", entries.len(), cik.padded());

        let mut outcomes = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let url = self.locate(cik, &entry);
            info!(
                "Processing filing {}: {} filed {} ({})",
                index + 1,
                entry.form,
                entry.filing_date,
                url
            );

            let result = self.process(cik, &entry, &url).await;
            let succeeded = match &result {
                Ok(filing) => {
                    info!(
                        "✓ {} {}: {} words",
                        entry.form,
                        entry.accession_number,
                        filing.word_count()
                    );
                    true
                }
                Err(e) => {
                    warn!("✗ {} {}: {}", entry.form, entry.accession_number, e);
                    false
                }
            };

            outcomes.push(FilingOutcome { entry, url, result });
            if succeeded && stop_on_success {
                break;
            }
        }

        Ok(outcomes)
    }

    /// Fetch, clean, and optionally save a single filing
    pub async fn process(
        &mut self,
        cik: &Cik,
        entry: &FilingIndexEntry,
        url: &str,
    ) -> Result<ProcessedFiling, EdgarError> {
        let document = self.client.fetch(url).await?;
        let text = text::normalize(
            &document.body,
            document.content_type.as_deref(),
            &entry.primary_document,
        );

        let saved_to = match &self.output_dir {
            Some(dir) => Some(save_text(dir, cik, entry, &text).await?),
            None => None,
        };

        Ok(ProcessedFiling {
            entry: entry.clone(),
            url: document.url,
            content_type: document.content_type,
            text,
            chunk_size: self.chunk_size,
            saved_to,
        })
    }
}

/// Write clean text to `{dir}/edgar/{cik}/{form}-{date}-{accession}.txt`
async fn save_text(
    dir: &Path,
    cik: &Cik,
    entry: &FilingIndexEntry,
    text: &str,
) -> Result<PathBuf, EdgarError> {
    let company_dir = dir.join("edgar").join(cik.padded());
    fs::create_dir_all(&company_dir).await?;

    let path = company_dir.join(entry.text_file_name());
    fs::write(&path, text).await?;
    info!("Saved clean text to: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_text_layout() {
        let temp_dir = TempDir::new().unwrap();
        let cik: Cik = "320193".parse().unwrap();
        let entry = FilingIndexEntry {
            form: "10-K".to_string(),
            accession_number: "0000320193-23-000106".to_string(),
            filing_date: NaiveDate::from_ymd_opt(2023, 11, 3).unwrap(),
            primary_document: "aapl-20230930.htm".to_string(),
            report_date: None,
            primary_doc_description: None,
        };

        let path = save_text(temp_dir.path(), &cik, &entry, "Apple Inc. annual report")
            .await
            .unwrap();

        assert_eq!(
            path,
            temp_dir
                .path()
                .join("edgar")
                .join("0000320193")
                .join("10-K-2023-11-03-000032019323000106.txt")
        );
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Apple Inc. annual report");
    }

    #[test]
    fn test_pipeline_rejects_zero_chunk_size() {
        let config = Config {
            chunk_size: 0,
            ..Config::default()
        };
        assert!(matches!(Pipeline::new(&config), Err(EdgarError::InvalidChunkSize)));
    }

    #[test]
    fn test_processed_filing_chunks() {
        let filing = ProcessedFiling {
            entry: FilingIndexEntry {
                form: "8-K".to_string(),
                accession_number: "0001-23-000002".to_string(),
                filing_date: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
                primary_document: "ex.htm".to_string(),
                report_date: None,
                primary_doc_description: None,
            },
            url: "https://www.sec.gov/Archives/edgar/data/1/000123000002/ex.htm".to_string(),
            content_type: None,
            text: "a b c d e".to_string(),
            chunk_size: NonZeroUsize::new(2).unwrap(),
            saved_to: None,
        };
        assert_eq!(filing.word_count(), 5);
        let texts: Vec<String> = filing.chunks().map(|c| c.text).collect();
        assert_eq!(texts, vec!["a b", "c d", "e"]);
        assert_eq!(filing.chunks().count(), 3);
    }
}
