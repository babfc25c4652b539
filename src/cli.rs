// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the struct below is the CLI, each field is an
// option, and the doc comments become the --help text. With the `env`
// feature every option can also come from a HEADER_SCOUT_* variable, which
// is handy in CI jobs.
// =============================================================================

use crate::config::AuditConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "header-scout",
    version,
    about = "Audit the resources a web page references and capture their response headers in a CSV file",
    long_about = "header-scout parses an HTML page, finds the links, images, scripts, stylesheets and \
                  picture sources it references, classifies each one as internal or external, fetches \
                  them and writes the requested response headers to a CSV report."
)]
pub struct Cli {
    /// Page URL(s) to audit (e.g., https://www.example.com)
    #[arg(
        short = 'r',
        long = "resource",
        required = true,
        num_args = 1..,
        value_name = "URL",
        env = "HEADER_SCOUT_RESOURCES",
        value_delimiter = ','
    )]
    pub resources: Vec<String>,

    /// Response headers to include in the CSV
    #[arg(
        short = 'H',
        long = "response-header",
        num_args = 1..,
        value_name = "HEADER",
        default_values_t = ["Cache-Control".to_string(), "Pragma".to_string()],
        env = "HEADER_SCOUT_HEADERS",
        value_delimiter = ','
    )]
    pub headers: Vec<String>,

    /// HTML tags to collect references from
    #[arg(
        short = 't',
        long = "tag",
        num_args = 1..,
        value_name = "TAG",
        value_parser = ["a", "link", "script", "source", "img"],
        default_values_t = ["a", "link", "script", "source", "img"].map(String::from),
        env = "HEADER_SCOUT_TAGS",
        value_delimiter = ','
    )]
    pub tags: Vec<String>,

    /// Also list and fetch references to other hosts
    #[arg(short = 'e', long = "enable-external", env = "HEADER_SCOUT_EXTERNAL")]
    pub enable_external: bool,

    /// CSV file name; a timestamp is added before the extension
    #[arg(
        short = 'o',
        long = "file-name",
        value_name = "NAME.csv",
        default_value = "headers.csv",
        env = "HEADER_SCOUT_FILE_NAME"
    )]
    pub file_name: String,

    /// Directory the CSV file is written to
    #[arg(long, value_name = "DIR", default_value = ".", env = "HEADER_SCOUT_OUT_DIR")]
    pub out_dir: PathBuf,

    /// Number of resources fetched in parallel (1-64)
    #[arg(
        short,
        long,
        default_value_t = 4,
        value_parser = clap::value_parser!(u8).range(1..=64),
        env = "HEADER_SCOUT_CONCURRENCY"
    )]
    pub concurrency: u8,

    /// Timeout per resource in seconds (at least 1)
    #[arg(
        long,
        default_value_t = 10,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..),
        env = "HEADER_SCOUT_TIMEOUT"
    )]
    pub timeout: u64,

    /// List the references without fetching them
    #[arg(long)]
    pub no_fetch: bool,

    /// Print the rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn audit_config(&self) -> AuditConfig {
        AuditConfig {
            resources: self.resources.iter().map(|r| r.trim().to_string()).collect(),
            headers: self.headers.clone(),
            tags: self.tags.clone(),
            include_external: self.enable_external,
            fetch: !self.no_fetch,
            concurrency: self.concurrency as usize,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["header-scout", "-r", "https://example.com"]).unwrap();
        let config = cli.audit_config();

        assert_eq!(config.resources, vec!["https://example.com"]);
        assert_eq!(config.headers, vec!["Cache-Control", "Pragma"]);
        assert_eq!(config.tags, vec!["a", "link", "script", "source", "img"]);
        assert!(!config.include_external);
        assert!(config.fetch);
        assert_eq!(config.concurrency, 4);
        assert_eq!(cli.file_name, "headers.csv");
    }

    #[test]
    fn test_multiple_values() {
        let cli = Cli::try_parse_from([
            "header-scout",
            "-r",
            "https://a.example",
            "https://b.example",
            "-H",
            "ETag",
            "-t",
            "img",
            "source",
            "-e",
            "--no-fetch",
        ])
        .unwrap();
        let config = cli.audit_config();

        assert_eq!(config.resources.len(), 2);
        assert_eq!(config.headers, vec!["ETag"]);
        assert_eq!(config.tags, vec!["img", "source"]);
        assert!(config.include_external);
        assert!(!config.fetch);
    }

    #[test]
    fn test_rejects_unknown_tag() {
        let result = Cli::try_parse_from(["header-scout", "-r", "https://a.example", "-t", "iframe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let result =
            Cli::try_parse_from(["header-scout", "-r", "https://a.example", "--timeout", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resource_is_required() {
        assert!(Cli::try_parse_from(["header-scout"]).is_err());
    }
}
