//! Company filing index lookup

use tracing::{debug, info};

use crate::edgar::types::CompanySubmissions;
use crate::edgar::{EdgarClient, EdgarError, FailureReason};
use crate::models::{Cik, FilingIndexEntry, FormTypes};

/// Submissions API URL for a company
pub fn submissions_url(base: &str, cik: &Cik) -> String {
    format!("{}/CIK{}.json", base.trim_end_matches('/'), cik.padded())
}

/// List a company's recent filings whose form is one of `forms`, in the
/// order EDGAR reports them (newest first).
///
/// Returns [`EdgarError::EmptyResult`] when the company has no recent
/// filings table at all. A table with filings of other forms only resolves
/// to an empty list.
pub async fn resolve(
    client: &mut EdgarClient,
    cik: &Cik,
    forms: &FormTypes,
) -> Result<Vec<FilingIndexEntry>, EdgarError> {
    let url = submissions_url(&client.endpoints().submissions_base, cik);
    let retrieval_error = |reason: FailureReason| EdgarError::Retrieval {
        cik: cik.padded(),
        reason,
    };

    debug!("Fetching company submissions from: {}", url);
    let response = client.get(&url).await.map_err(retrieval_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(retrieval_error(FailureReason::Status(status.as_u16())));
    }

    let body = response
        .text()
        .await
        .map_err(|e| retrieval_error(FailureReason::Network(e.to_string())))?;

    let submissions: CompanySubmissions = serde_json::from_str(&body)
        .map_err(|e| retrieval_error(FailureReason::Malformed(e.to_string())))?;

    let recent = match submissions.filings.and_then(|f| f.recent) {
        Some(recent) if !recent.is_empty() => recent,
        _ => return Err(EdgarError::EmptyResult { cik: cik.padded() }),
    };

    let total = recent.len();
    let entries: Vec<FilingIndexEntry> = recent
        .into_entries()
        .map_err(retrieval_error)?
        .into_iter()
        .filter(|entry| forms.contains(&entry.form))
        .collect();

    info!(
        "Resolved {} of {} recent filings for CIK {} ({}) matching [{}]",
        entries.len(),
        total,
        cik.padded(),
        submissions.name.as_deref().unwrap_or("unknown company"),
        forms
    );
    Ok(entries)
}
