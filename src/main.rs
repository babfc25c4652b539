// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate the configuration (bad input stops us before any request)
// 3. Audit each page and collect the report rows
// 4. Write the CSV file and print the table (or JSON)
// 5. Exit with proper code (0 = success, 1 = failed fetches, 2 = error)
// =============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use header_scout::cli::Cli;
use header_scout::{audit, logging, report, HttpFetcher};
use std::time::Instant;
use tracing::info;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every resource was fetched (or skipped on purpose)
//   Ok(1) = at least one resource could not be fetched
//   Err   = configuration or IO problem
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let started = Instant::now();
    let config = cli.audit_config();

    // Fail fast: both checks happen before the first request
    config.validate()?;
    let file_name = report::report_file_name(&cli.file_name)?;

    let fetcher =
        HttpFetcher::new(config.timeout).context("Failed to create HTTP client")?;

    let rows = audit::audit_all(&config, &fetcher).await?;

    let path = report::write_csv_file(&cli.out_dir, &file_name, &config.headers, &rows)?;
    report::print_rows(&rows, cli.json)?;

    info!(
        report = %path.display(),
        rows = rows.len(),
        elapsed = ?started.elapsed(),
        "overall execution time"
    );

    if rows.iter().any(|row| row.is_fetch_failure()) {
        Ok(1)
    } else {
        Ok(0)
    }
}
