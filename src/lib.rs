// src/lib.rs
// =============================================================================
// Library root. The binary in main.rs is a thin shell around these modules:
//
// - refs: scanning, normalizing and classifying references (no network)
// - resource: fetching references and building report rows
// - audit: the per-page pipeline tying the two together
// - report: CSV file, terminal table, JSON
// - config / error / logging: ambient plumbing
// =============================================================================

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod refs;
pub mod report;
pub mod resource;

pub use audit::{audit_all, audit_page};
pub use config::AuditConfig;
pub use error::{ConfigurationError, FetchError, UnsupportedReference};
pub use refs::{NormalizedReference, RawReference, RefProcessor, ResourceType};
pub use resource::{Fetch, HttpFetcher, OutputRow};
