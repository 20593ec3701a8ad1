use clap::{Args, Parser, Subcommand};
use chrono::NaiveDate;
use fastedgar::{Cik, FilingFilter, FormTypes};

#[derive(Parser)]
#[command(name = "fastedgar")]
#[command(about = "Resolve, download, and normalize SEC EDGAR filings for text analysis")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up the CIK for a ticker symbol
    Lookup {
        /// Company ticker symbol
        #[arg(short, long)]
        ticker: String,
    },

    /// List a company's recent filings of the requested forms
    Filings {
        #[command(flatten)]
        company: CompanyArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Print CSV instead of a tab-separated table
        #[arg(long)]
        csv: bool,
    },

    /// Download filings and normalize them to plain text
    Fetch {
        #[command(flatten)]
        company: CompanyArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Words per text chunk (defaults to FASTEDGAR_CHUNK_SIZE or 500)
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Output directory (defaults to FASTEDGAR_DOWNLOAD_DIR or ./downloads)
        #[arg(short, long)]
        output: Option<String>,

        /// Keep text in memory only
        #[arg(long)]
        no_save: bool,
    },
}

/// Company to work on, by CIK or by ticker
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct CompanyArgs {
    /// Central Index Key, with or without zero padding
    #[arg(short, long)]
    pub cik: Option<String>,

    /// Company ticker symbol, resolved to a CIK first
    #[arg(short, long)]
    pub ticker: Option<String>,
}

#[derive(Args)]
pub struct SelectionArgs {
    /// Comma-separated form types, matched exactly
    #[arg(short, long, default_value = "10-K,10-Q")]
    pub forms: String,

    /// Earliest filing date (YYYY-MM-DD)
    #[arg(long)]
    pub from_date: Option<NaiveDate>,

    /// Latest filing date (YYYY-MM-DD)
    #[arg(long)]
    pub to_date: Option<NaiveDate>,

    /// Maximum number of filings
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl CompanyArgs {
    pub fn parse_cik(&self) -> Result<Option<Cik>, anyhow::Error> {
        self.cik
            .as_deref()
            .map(|cik| cik.parse::<Cik>().map_err(anyhow::Error::from))
            .transpose()
    }
}

impl SelectionArgs {
    pub fn parse_forms(&self) -> Result<FormTypes, anyhow::Error> {
        Ok(self.forms.parse::<FormTypes>()?)
    }

    pub fn filter(&self) -> FilingFilter {
        FilingFilter {
            date_from: self.from_date,
            date_to: self.to_date,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filings_command() {
        let cli = Cli::try_parse_from([
            "fastedgar", "filings", "--cik", "0000320193", "--forms", "10-K", "--limit", "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Filings { company, selection, csv } => {
                assert_eq!(company.parse_cik().unwrap().unwrap().padded(), "0000320193");
                assert!(selection.parse_forms().unwrap().contains("10-K"));
                assert_eq!(selection.filter().limit, Some(3));
                assert!(!csv);
            }
            _ => panic!("expected filings command"),
        }
    }

    #[test]
    fn test_company_requires_exactly_one_identifier() {
        assert!(Cli::try_parse_from(["fastedgar", "fetch"]).is_err());
        assert!(Cli::try_parse_from([
            "fastedgar", "fetch", "--cik", "320193", "--ticker", "AAPL",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["fastedgar", "fetch", "--ticker", "AAPL"]).is_ok());
    }

    #[test]
    fn test_default_forms() {
        let cli = Cli::try_parse_from(["fastedgar", "fetch", "--cik", "320193"]).unwrap();
        let Commands::Fetch { selection, .. } = cli.command else {
            panic!("expected fetch command");
        };
        assert_eq!(selection.parse_forms().unwrap(), FormTypes::default());
        assert!(selection.filter().limit.is_none());
    }
}
