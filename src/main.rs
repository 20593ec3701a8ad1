use clap::Parser;
use anyhow::Result;
use serde::Serialize;
use tracing::{info, error};

use fastedgar::{edgar, Cik, Config, FilingIndexEntry, Pipeline};

mod cli;

use cli::{Cli, Commands, CompanyArgs};

#[tokio::main]
async fn main() -> Result<()> {
    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "fastedgar=info");
    }

    // Initialize logging to both console and file
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

    let file_appender = tracing_appender::rolling::never(".", "fastedgar.log");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env())
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env())
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match &cli.command {
        Commands::Lookup { ticker } => {
            config.validate()?;
            let mut client = edgar::EdgarClient::new(&config)?;
            match edgar::lookup_cik(&mut client, ticker).await {
                Ok(cik) => println!("{}\t{}", ticker.to_uppercase(), cik.padded()),
                Err(e) => error!("Lookup failed: {}", e),
            }
        }

        Commands::Filings { company, selection, csv } => {
            config.validate()?;
            let forms = selection.parse_forms()?;
            let mut pipeline = Pipeline::new(&config)?;

            let Some(cik) = company_cik(&mut pipeline, company).await? else {
                return Ok(());
            };

            match pipeline.filings(&cik, &forms, &selection.filter()).await {
                Ok(entries) => {
                    info!("Found {} filings for CIK {}", entries.len(), cik.padded());
                    let rows: Vec<FilingRow> = entries
                        .iter()
                        .map(|entry| FilingRow::new(entry, pipeline.locate(&cik, entry)))
                        .collect();
                    if *csv {
                        print_csv(&rows)?;
                    } else {
                        print_table(&rows);
                    }
                }
                Err(e) => error!("Filing lookup failed: {}", e),
            }
        }

        Commands::Fetch { company, selection, chunk_size, output, no_save } => {
            if let Some(size) = chunk_size {
                config.chunk_size = *size;
            }
            if let Some(output) = output {
                config.download_dir = output.into();
            }
            config.validate()?;

            let forms = selection.parse_forms()?;
            let filter = selection.filter();

            let mut pipeline = Pipeline::new(&config)?;
            if !*no_save {
                config.ensure_download_dir()?;
                pipeline = pipeline.with_output_dir(config.download_dir.clone());
            }

            let Some(cik) = company_cik(&mut pipeline, company).await? else {
                return Ok(());
            };

            info!("Fetching [{}] filings for CIK {}", forms, cik.padded());
            // Without --limit, one successfully analysed filing is enough
            let outcomes = if filter.limit.is_some() {
                pipeline.run(&cik, &forms, &filter).await
            } else {
                pipeline.run_until_success(&cik, &forms, &filter).await
            };
            match outcomes {
                Ok(outcomes) => {
                    let mut succeeded = 0;
                    for outcome in &outcomes {
                        match &outcome.result {
                            Ok(filing) => {
                                succeeded += 1;
                                println!(
                                    "{}\t{}\t{}\t{} words\t{} chunks\t{}",
                                    outcome.entry.form,
                                    outcome.entry.filing_date,
                                    outcome.entry.accession_number,
                                    filing.word_count(),
                                    filing.chunks().count(),
                                    filing
                                        .saved_to
                                        .as_ref()
                                        .map(|p| p.display().to_string())
                                        .unwrap_or_else(|| outcome.url.clone())
                                );
                            }
                            Err(e) => error!("{}", e),
                        }
                    }
                    info!("Processed {} of {} filings", succeeded, outcomes.len());
                }
                Err(e) => error!("Fetch failed: {}", e),
            }
        }
    }

    Ok(())
}

/// Resolve the CLI's company arguments to a CIK, logging lookup failures
async fn company_cik(pipeline: &mut Pipeline, company: &CompanyArgs) -> Result<Option<Cik>> {
    if let Some(cik) = company.parse_cik()? {
        return Ok(Some(cik));
    }

    let ticker = company.ticker.as_deref().unwrap_or_default();
    match edgar::lookup_cik(pipeline.client(), ticker).await {
        Ok(cik) => Ok(Some(cik)),
        Err(e) => {
            error!("Lookup failed: {}", e);
            Ok(None)
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FilingRow<'a> {
    form: &'a str,
    filing_date: String,
    report_date: String,
    accession_number: &'a str,
    primary_document: &'a str,
    url: String,
}

impl<'a> FilingRow<'a> {
    fn new(entry: &'a FilingIndexEntry, url: String) -> Self {
        Self {
            form: &entry.form,
            filing_date: entry.filing_date.to_string(),
            report_date: entry.report_date.map(|d| d.to_string()).unwrap_or_default(),
            accession_number: &entry.accession_number,
            primary_document: &entry.primary_document,
            url,
        }
    }
}

fn print_table(rows: &[FilingRow<'_>]) {
    println!("form\tfilingDate\treportDate\taccessionNumber\turl");
    for row in rows {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            row.form, row.filing_date, row.report_date, row.accession_number, row.url
        );
    }
}

fn print_csv(rows: &[FilingRow<'_>]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
