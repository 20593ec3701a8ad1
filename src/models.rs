use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::edgar::EdgarError;

/// Central Index Key assigned to a filer by the SEC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cik(u64);

impl Cik {
    /// Widest CIK EDGAR issues, in digits
    pub const WIDTH: usize = 10;

    pub fn new(value: u64) -> Result<Self, EdgarError> {
        if value == 0 || value > 9_999_999_999 {
            return Err(EdgarError::InvalidIdentifier(value.to_string()));
        }
        Ok(Cik(value))
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Zero-padded form used by the submissions API, e.g. `0000320193`
    pub fn padded(&self) -> String {
        format!("{:0>width$}", self.0, width = Self::WIDTH)
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cik {
    type Err = EdgarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EdgarError::InvalidIdentifier(s.to_string()));
        }

        let significant = trimmed.trim_start_matches('0');
        if significant.len() > Self::WIDTH {
            return Err(EdgarError::InvalidIdentifier(s.to_string()));
        }

        let value = if significant.is_empty() {
            0
        } else {
            significant
                .parse::<u64>()
                .map_err(|_| EdgarError::InvalidIdentifier(s.to_string()))?
        };
        Cik::new(value).map_err(|_| EdgarError::InvalidIdentifier(s.to_string()))
    }
}

/// Non-empty set of form codes a caller wants, matched exactly against EDGAR's `form` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormTypes(BTreeSet<String>);

impl FormTypes {
    pub fn new<I, S>(forms: I) -> Result<Self, EdgarError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = forms
            .into_iter()
            .map(|f| {
                let f: String = f.into();
                f.trim().to_string()
            })
            .filter(|f| !f.is_empty())
            .collect();

        if set.is_empty() {
            return Err(EdgarError::NoFormTypes);
        }
        Ok(FormTypes(set))
    }

    pub fn contains(&self, form: &str) -> bool {
        self.0.contains(form)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for FormTypes {
    fn default() -> Self {
        FormTypes(["10-K", "10-Q"].iter().map(|s| s.to_string()).collect())
    }
}

impl FromStr for FormTypes {
    type Err = EdgarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormTypes::new(s.split(','))
    }
}

impl fmt::Display for FormTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(","))
    }
}

/// One filing listed in a company's recent submissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingIndexEntry {
    pub form: String,
    pub accession_number: String,
    pub filing_date: NaiveDate,
    pub primary_document: String,
    pub report_date: Option<NaiveDate>,
    pub primary_doc_description: Option<String>,
}

impl FilingIndexEntry {
    /// Accession number as it appears in archive paths
    pub fn accession_no_dashes(&self) -> String {
        self.accession_number.replace('-', "")
    }

    /// File name used when saving this filing's clean text
    pub fn text_file_name(&self) -> String {
        format!(
            "{}-{}-{}.txt",
            self.form.replace('/', "-"),
            self.filing_date,
            self.accession_no_dashes()
        )
    }
}

/// Downloaded document body, kept only until it is normalized
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Post-resolution selection of filings to process
#[derive(Debug, Clone, Default)]
pub struct FilingFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl FilingFilter {
    pub fn matches(&self, entry: &FilingIndexEntry) -> bool {
        if let Some(from) = self.date_from {
            if entry.filing_date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if entry.filing_date > to {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, entries: Vec<FilingIndexEntry>) -> Vec<FilingIndexEntry> {
        let limit = self.limit.unwrap_or(usize::MAX);
        entries
            .into_iter()
            .filter(|e| self.matches(e))
            .take(limit)
            .collect()
    }
}
