// src/report.rs
// =============================================================================
// Everything the user gets to see at the end of a run:
// - the CSV report file (one line per row, empty cell = absent value)
// - a table + summary on the terminal, or the rows as JSON
//
// CSV columns: URL, Tag, Type, Locality, <requested headers...>, Error
//
// Rust concepts:
// - Generics: write_csv() accepts any io::Write (a file, or a Vec in tests)
// - anyhow::Context: Adds the file path to IO errors
// =============================================================================

use crate::error::ConfigurationError;
use crate::resource::{OutputRow, RowStatus};
use anyhow::{Context, Result};
use chrono::Local;
use regex::Regex;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const LEADING_COLUMNS: [&str; 4] = ["URL", "Tag", "Type", "Locality"];
const TRAILING_COLUMN: &str = "Error";

// Turns "headers.csv" into "headers-20240131235959.csv"
//
// The stem is limited to 12 word characters or dashes so generated names
// stay short and shell-friendly.
pub fn report_file_name(name: &str) -> Result<String, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidFileName(name.to_string());

    let re = Regex::new(r"^([\w-]{1,12})\.csv$").map_err(|_| invalid())?;
    let caps = re.captures(name).ok_or_else(invalid)?;

    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    Ok(format!("{}-{}.csv", &caps[1], timestamp))
}

// Writes rows as CSV to any writer
pub fn write_csv<W: Write>(writer: W, requested: &[String], rows: &[OutputRow]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = LEADING_COLUMNS.to_vec();
    header.extend(requested.iter().map(String::as_str));
    header.push(TRAILING_COLUMN);
    csv.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.url.clone(),
            row.tag.clone(),
            row.resource_type.to_string(),
            row.locality.map(|l| l.to_string()).unwrap_or_default(),
        ];
        record.extend(row.headers.iter().map(|cell| cell.value.clone().unwrap_or_default()));
        record.push(row.error().unwrap_or_default());

        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

// Creates `dir/name` and writes the report into it
pub fn write_csv_file(
    dir: &Path,
    name: &str,
    requested: &[String],
    rows: &[OutputRow],
) -> Result<PathBuf> {
    let path = dir.join(name);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;

    write_csv(file, requested, rows)
        .with_context(|| format!("Failed to write report file: {}", path.display()))?;

    Ok(path)
}

// Prints the rows either as a table or JSON
pub fn print_rows(rows: &[OutputRow], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
    } else {
        print_table(rows);
    }
    Ok(())
}

fn print_table(rows: &[OutputRow]) {
    println!(
        "{:<60} {:<7} {:<11} {:<9} {:<30}",
        "URL", "TAG", "TYPE", "LOCALITY", "STATUS"
    );
    println!("{}", "=".repeat(120));

    for row in rows {
        let locality = row.locality.map(|l| l.to_string()).unwrap_or_default();
        println!(
            "{:<60} {:<7} {:<11} {:<9} {:<30}",
            truncate(&row.url, 60),
            row.tag,
            row.resource_type.as_str(),
            locality,
            format_status(row)
        );
    }

    println!();

    let summary = Summary::of(rows);
    println!("📊 Summary:");
    println!("   ✅ Fetched: {}", summary.fetched);
    println!("   ⏭️  Not fetched: {}", summary.not_fetched);
    println!("   🚫 Unsupported: {}", summary.unsupported);
    println!("   ❌ Failed: {}", summary.failed);
    println!("   📋 Total: {}", rows.len());
}

fn format_status(row: &OutputRow) -> String {
    match &row.status {
        RowStatus::Fetched => "✅ OK".to_string(),
        RowStatus::NotFetched => "⏭️  NOT FETCHED".to_string(),
        RowStatus::Unsupported(reason) => format!("🚫 {}", reason),
        RowStatus::FetchFailed(e) => format!("❌ {}", e),
    }
}

// Truncates on a char boundary, URLs may contain non-ASCII text
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max - 3).collect();
        format!("{}...", kept)
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub fetched: usize,
    pub not_fetched: usize,
    pub unsupported: usize,
    pub failed: usize,
}

impl Summary {
    pub fn of(rows: &[OutputRow]) -> Self {
        let mut summary = Summary::default();
        for row in rows {
            match row.status {
                RowStatus::Fetched => summary.fetched += 1,
                RowStatus::NotFetched => summary.not_fetched += 1,
                RowStatus::Unsupported(_) => summary.unsupported += 1,
                RowStatus::FetchFailed(_) => summary.failed += 1,
            }
        }
        summary
    }
}
