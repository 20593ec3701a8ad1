//! Ticker symbol to CIK lookup through `company_tickers.json`

use std::collections::HashMap;
use tracing::{debug, info};

use crate::edgar::types::CompanyTicker;
use crate::edgar::{EdgarClient, EdgarError, FailureReason};
use crate::models::Cik;

pub async fn lookup_cik(client: &mut EdgarClient, ticker: &str) -> Result<Cik, EdgarError> {
    let url = client.endpoints().tickers_url.clone();
    let fetch_error = |reason: FailureReason| EdgarError::Fetch {
        url: url.clone(),
        reason,
    };

    debug!("Fetching company tickers from: {}", url);
    let document = client.fetch(&url).await?;

    let tickers: HashMap<String, CompanyTicker> = serde_json::from_str(&document.body)
        .map_err(|e| fetch_error(FailureReason::Malformed(e.to_string())))?;

    let company = find_ticker(&tickers, ticker)
        .ok_or_else(|| EdgarError::TickerNotFound(ticker.to_string()))?;

    let cik = Cik::new(company.cik_str)?;
    info!("Found CIK {} for ticker {} ({})", cik.padded(), ticker, company.title);
    Ok(cik)
}

/// Case-insensitive ticker match
fn find_ticker<'a>(
    tickers: &'a HashMap<String, CompanyTicker>,
    ticker: &str,
) -> Option<&'a CompanyTicker> {
    let wanted = ticker.trim().to_uppercase();
    tickers
        .values()
        .find(|company| company.ticker.to_uppercase() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_ticker_case_insensitive() {
        let body = r#"{
            "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
            "1": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"}
        }"#;
        let tickers: HashMap<String, CompanyTicker> = serde_json::from_str(body).unwrap();

        assert_eq!(find_ticker(&tickers, "msft").unwrap().cik_str, 789019);
        assert_eq!(find_ticker(&tickers, " AAPL ").unwrap().title, "Apple Inc.");
        assert!(find_ticker(&tickers, "PLTR").is_none());
    }
}
