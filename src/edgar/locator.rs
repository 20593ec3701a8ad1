//! Archive URLs for filing documents

use crate::models::{Cik, FilingIndexEntry};

/// Archive URL of a filing's primary document:
/// `{base}/{cik}/{accession without dashes}/{primary document}`.
///
/// The CIK appears without zero padding, matching EDGAR's archive layout.
pub fn locate(archives_base: &str, cik: &Cik, entry: &FilingIndexEntry) -> String {
    document_url(
        archives_base,
        cik,
        &entry.accession_number,
        &entry.primary_document,
    )
}

pub fn document_url(
    archives_base: &str,
    cik: &Cik,
    accession_number: &str,
    primary_document: &str,
) -> String {
    format!(
        "{}/{}/{}/{}",
        archives_base.trim_end_matches('/'),
        cik,
        accession_number.replace('-', ""),
        primary_document
    )
}
