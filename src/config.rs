// src/config.rs
// =============================================================================
// The run configuration.
//
// Everything the audit needs to know is in one AuditConfig value that is
// passed down explicitly. It is built from the command line in main.rs and
// checked once, up front, so that a bad option stops the run before any
// network request is made.
// =============================================================================

use crate::error::ConfigurationError;
use crate::refs::{parse_base_url, SUPPORTED_TAGS};
use crate::resource::{PoolOptions, DEFAULT_CONCURRENCY};
use std::time::Duration;

pub const DEFAULT_HEADERS: [&str; 2] = ["Cache-Control", "Pragma"];

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Pages to audit
    pub resources: Vec<String>,
    /// Response headers to report, in column order
    pub headers: Vec<String>,
    /// Tags whose references are collected
    pub tags: Vec<String>,
    /// Keep references that point to another host
    pub include_external: bool,
    /// Fetch each reference (false = report references only)
    pub fetch: bool,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            headers: DEFAULT_HEADERS.iter().map(|h| h.to_string()).collect(),
            tags: SUPPORTED_TAGS.iter().map(|t| t.to_string()).collect(),
            include_external: false,
            fetch: true,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(10),
        }
    }
}

impl AuditConfig {
    // Checks everything that would make the whole run meaningless
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.resources.is_empty() {
            return Err(ConfigurationError::NoResources);
        }
        for resource in &self.resources {
            parse_base_url(resource)?;
        }

        if self.tags.is_empty() {
            return Err(ConfigurationError::EmptyTagSet);
        }
        for tag in &self.tags {
            let tag = tag.to_ascii_lowercase();
            if !SUPPORTED_TAGS.contains(&tag.as_str()) {
                return Err(ConfigurationError::UnknownTag(tag));
            }
        }

        if self.concurrency == 0 {
            return Err(ConfigurationError::ZeroConcurrency);
        }

        if self.timeout.is_zero() {
            return Err(ConfigurationError::ZeroTimeout);
        }

        Ok(())
    }

    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            concurrency: self.concurrency,
            timeout: self.timeout,
        }
    }
}
