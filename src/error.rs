// src/error.rs
// =============================================================================
// Error types for the three failure classes of an audit:
//
// - ConfigurationError: bad input to the whole run. Fatal, reported before
//   any network request is made.
// - UnsupportedReference: a single reference that can't be turned into an
//   http(s) URL. Recorded on that reference's row only.
// - FetchError: a single resource that couldn't be fetched. Recorded on that
//   resource's row only.
//
// We use `thiserror` so each enum gets a Display implementation from the
// #[error(...)] attributes, and `serde` so the per-row errors show up in the
// JSON output.
// =============================================================================

use serde::Serialize;
use thiserror::Error;

// Fatal configuration problems
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("base URL '{0}' must use http or https")]
    UnsupportedBaseScheme(String),

    #[error("the allowed tag set is empty")]
    EmptyTagSet,

    #[error("tag '{0}' is not one of: a, link, script, source, img")]
    UnknownTag(String),

    #[error("no resource URL given")]
    NoResources,

    #[error(
        "invalid CSV file name '{0}': use at most 12 letters, digits, '_' or '-', followed by .csv"
    )]
    InvalidFileName(String),

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("timeout must be at least 1 second")]
    ZeroTimeout,
}

// Why a reference was rejected before fetching
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum UnsupportedReference {
    #[error("empty reference")]
    Empty,

    #[error("fragment-only reference")]
    FragmentOnly,

    #[error("unsupported scheme '{0}'")]
    Scheme(String),

    #[error("malformed reference: {0}")]
    Malformed(String),

    #[error("reference has no host")]
    MissingHost,
}

// Why fetching a resource failed
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP status code is [{0}]")]
    Status(u16),

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("could not resolve hostname")]
    Dns,

    #[error("SSL certificate error")]
    Ssl,

    #[error("connection failed")]
    Connect,

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("{0}")]
    Other(String),
}
