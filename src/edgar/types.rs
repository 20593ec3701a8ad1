//! Wire types for the EDGAR JSON endpoints

use chrono::NaiveDate;
use serde::Deserialize;

use crate::edgar::FailureReason;
use crate::models::FilingIndexEntry;

/// Body of `submissions/CIK##########.json`, reduced to what the resolver reads
#[derive(Debug, Deserialize)]
pub struct CompanySubmissions {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub filings: Option<FilingsData>,
}

#[derive(Debug, Deserialize)]
pub struct FilingsData {
    #[serde(default)]
    pub recent: Option<RecentFilings>,
}

/// Column-oriented table of recent filings; position `i` of every array
/// describes the same filing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    #[serde(default)]
    pub form: Vec<String>,
    #[serde(default)]
    pub accession_number: Vec<String>,
    #[serde(default)]
    pub filing_date: Vec<String>,
    #[serde(default)]
    pub primary_document: Vec<String>,
    #[serde(default)]
    pub report_date: Vec<String>,
    #[serde(default)]
    pub primary_doc_description: Vec<String>,
}

impl RecentFilings {
    pub fn len(&self) -> usize {
        self.form.len()
    }

    pub fn is_empty(&self) -> bool {
        self.form.is_empty()
    }

    /// Zip the parallel columns into one record per filing.
    ///
    /// Every required column must have an entry for every position in
    /// `form`; a short column means the response is malformed.
    pub fn into_entries(self) -> Result<Vec<FilingIndexEntry>, FailureReason> {
        let len = self.form.len();
        for (name, column_len) in [
            ("accessionNumber", self.accession_number.len()),
            ("filingDate", self.filing_date.len()),
            ("primaryDocument", self.primary_document.len()),
        ] {
            if column_len < len {
                return Err(FailureReason::Malformed(format!(
                    "{} has {} entries but form has {}",
                    name, column_len, len
                )));
            }
        }

        let mut report_dates = self.report_date.into_iter();
        let mut descriptions = self.primary_doc_description.into_iter();

        self.form
            .into_iter()
            .zip(self.accession_number)
            .zip(self.filing_date)
            .zip(self.primary_document)
            .map(
                |(((form, accession_number), filing_date), primary_document)|
                 -> Result<FilingIndexEntry, FailureReason> {
                let filing_date = NaiveDate::parse_from_str(&filing_date, "%Y-%m-%d").map_err(|e| {
                    FailureReason::Malformed(format!(
                        "filingDate '{}' of {}: {}",
                        filing_date, accession_number, e
                    ))
                })?;

                let report_date = report_dates
                    .next()
                    .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok());
                let primary_doc_description = descriptions.next().filter(|d| !d.is_empty());

                Ok(FilingIndexEntry {
                    form,
                    accession_number,
                    filing_date,
                    primary_document,
                    report_date,
                    primary_doc_description,
                })
            })
            .collect()
    }
}

/// One row of `company_tickers.json`
#[derive(Debug, Deserialize)]
pub struct CompanyTicker {
    pub cik_str: u64,
    pub ticker: String,
    pub title: String,
}
