// src/resource/row.rs
// =============================================================================
// Builds one report row per normalized reference.
//
// A row always exists for a reference, whatever happened to it:
// - unsupported references are never fetched, their header cells stay empty
// - failed fetches (including timeouts) keep empty cells and record why
// - successful fetches fill in the requested headers
//
// Rust concepts:
// - tokio::time::timeout: Caps how long one fetch may take
// - #[serde(flatten)]: Puts the status fields next to the row fields in JSON
// =============================================================================

use crate::error::{FetchError, UnsupportedReference};
use crate::refs::{Locality, NormalizedReference, Resolution, ResourceType};
use crate::resource::fetch::Fetch;
use reqwest::header::HeaderMap;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

// One requested header and its value, if the response had it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum RowStatus {
    Fetched,
    /// Fetching was turned off for this run
    NotFetched,
    Unsupported(UnsupportedReference),
    FetchFailed(FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    pub url: String,
    pub tag: String,
    pub resource_type: ResourceType,
    pub locality: Option<Locality>,
    pub headers: Vec<HeaderCell>,
    #[serde(flatten)]
    pub status: RowStatus,
}

impl OutputRow {
    fn from_reference(
        reference: &NormalizedReference,
        headers: Vec<HeaderCell>,
        status: RowStatus,
    ) -> Self {
        // A rejected reference has no URL, show what the page said instead
        let url = match &reference.resolution {
            Resolution::Supported { url, .. } => url.to_string(),
            Resolution::Unsupported(_) => reference.original_value.clone(),
        };

        Self {
            url,
            tag: reference.tag.clone(),
            resource_type: reference.resource_type,
            locality: reference.locality(),
            headers,
            status,
        }
    }

    // Row for a reference that won't be fetched
    pub fn unfetched(reference: &NormalizedReference, requested: &[String]) -> Self {
        let status = match reference.unsupported_reason() {
            Some(reason) => RowStatus::Unsupported(reason.clone()),
            None => RowStatus::NotFetched,
        };
        Self::from_reference(reference, absent(requested), status)
    }

    // Row for the audited page itself
    //
    // Used when the page couldn't be fetched, or when it references nothing.
    pub fn for_page(
        url: &str,
        result: Result<&HeaderMap, FetchError>,
        requested: &[String],
    ) -> Self {
        let (headers, status) = match result {
            Ok(headers) => (pick_headers(headers, requested), RowStatus::Fetched),
            Err(e) => (absent(requested), RowStatus::FetchFailed(e)),
        };

        Self {
            url: url.to_string(),
            tag: String::new(),
            resource_type: ResourceType::classify("", url),
            locality: Some(Locality::Internal),
            headers,
            status,
        }
    }

    /// Message for the Error column, if any.
    pub fn error(&self) -> Option<String> {
        match &self.status {
            RowStatus::Fetched | RowStatus::NotFetched => None,
            RowStatus::Unsupported(reason) => Some(reason.to_string()),
            RowStatus::FetchFailed(e) => Some(e.to_string()),
        }
    }

    pub fn is_fetch_failure(&self) -> bool {
        matches!(self.status, RowStatus::FetchFailed(_))
    }
}

// Builds the row for one reference, fetching it if it is supported
//
// Parameters:
//   reference: the normalized reference
//   requested: header names to report, in column order
//   fetcher: the HTTP collaborator
//   timeout: upper bound for this one fetch
pub async fn build(
    reference: &NormalizedReference,
    requested: &[String],
    fetcher: &dyn Fetch,
    timeout: Duration,
) -> OutputRow {
    let url = match &reference.resolution {
        Resolution::Supported { url, .. } => url.as_str(),
        Resolution::Unsupported(_) => return OutputRow::unfetched(reference, requested),
    };

    debug!(%url, tag = %reference.tag, "fetching headers");

    let result = match tokio::time::timeout(timeout, fetcher.fetch_headers(url)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout),
    };

    match result {
        Ok(headers) => OutputRow::from_reference(
            reference,
            pick_headers(&headers, requested),
            RowStatus::Fetched,
        ),
        Err(e) => {
            warn!(%url, error = %e, "invalid resource");
            OutputRow::from_reference(reference, absent(requested), RowStatus::FetchFailed(e))
        }
    }
}

// Header names are case-insensitive; repeated headers are joined with ", "
fn pick_headers(headers: &HeaderMap, requested: &[String]) -> Vec<HeaderCell> {
    requested
        .iter()
        .map(|name| {
            let key = name.trim().to_ascii_lowercase();
            let values: Vec<&str> = headers
                .get_all(key.as_str())
                .iter()
                .filter_map(|value| value.to_str().ok())
                .collect();

            HeaderCell {
                name: name.clone(),
                value: if values.is_empty() {
                    None
                } else {
                    Some(values.join(", "))
                },
            }
        })
        .collect()
}

fn absent(requested: &[String]) -> Vec<HeaderCell> {
    requested
        .iter()
        .map(|name| HeaderCell {
            name: name.clone(),
            value: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refs::{RawReference, RefProcessor};
    use crate::resource::testing::FakeFetcher;

    fn requested() -> Vec<String> {
        vec!["Cache-Control".to_string(), "Pragma".to_string()]
    }

    fn normalize(value: &str, tag: &str) -> NormalizedReference {
        let p = RefProcessor::new("https://example.com/index.html", ["a", "img", "link"]).unwrap();
        p.normalize(&RawReference::new(tag, "href", value))
    }

    #[tokio::test]
    async fn test_successful_fetch_fills_headers_case_insensitively() {
        let fetcher = FakeFetcher::new()
            .ok("https://example.com/logo.png", &[("cache-control", "max-age=60")]);

        let row = build(
            &normalize("logo.png", "img"),
            &requested(),
            &fetcher,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(row.url, "https://example.com/logo.png");
        assert_eq!(row.status, RowStatus::Fetched);
        assert_eq!(row.resource_type, ResourceType::Image);
        assert_eq!(row.locality, Some(Locality::Internal));
        assert_eq!(row.headers[0].value.as_deref(), Some("max-age=60"));
        assert_eq!(row.headers[1].value, None);
        assert_eq!(row.error(), None);
    }

    #[tokio::test]
    async fn test_repeated_header_values_are_joined() {
        let fetcher = FakeFetcher::new().ok(
            "https://example.com/about",
            &[("cache-control", "no-cache"), ("cache-control", "no-store")],
        );

        let row = build(
            &normalize("/about", "a"),
            &requested(),
            &fetcher,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(row.headers[0].value.as_deref(), Some("no-cache, no-store"));
    }

    #[tokio::test]
    async fn test_unsupported_reference_is_not_fetched() {
        let fetcher = FakeFetcher::new();

        let row = build(
            &normalize("javascript:void(0)", "a"),
            &requested(),
            &fetcher,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(fetcher.calls(), 0);
        assert_eq!(row.url, "javascript:void(0)");
        assert_eq!(row.locality, None);
        assert!(row.headers.iter().all(|cell| cell.value.is_none()));
        assert_eq!(row.error().as_deref(), Some("unsupported scheme 'javascript'"));
        assert!(!row.is_fetch_failure());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_recorded() {
        let fetcher = FakeFetcher::new().fail("https://example.com/gone", FetchError::Status(410));

        let row = build(
            &normalize("/gone", "a"),
            &requested(),
            &fetcher,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(row.status, RowStatus::FetchFailed(FetchError::Status(410)));
        assert!(row.headers.iter().all(|cell| cell.value.is_none()));
        assert!(row.is_fetch_failure());
    }

    #[tokio::test]
    async fn test_slow_fetch_times_out() {
        let fetcher = FakeFetcher::new()
            .ok("https://example.com/slow", &[("pragma", "no-cache")])
            .delay("https://example.com/slow", Duration::from_millis(500));

        let row = build(
            &normalize("/slow", "a"),
            &requested(),
            &fetcher,
            Duration::from_millis(20),
        )
        .await;

        assert_eq!(row.status, RowStatus::FetchFailed(FetchError::Timeout));
    }

    #[test]
    fn test_unfetched_row() {
        let row = OutputRow::unfetched(&normalize("/about", "a"), &requested());
        assert_eq!(row.status, RowStatus::NotFetched);
        assert_eq!(row.headers.len(), 2);
        assert_eq!(row.error(), None);
    }

    #[test]
    fn test_page_row() {
        let row = OutputRow::for_page(
            "https://example.com/",
            Err(FetchError::Dns),
            &requested(),
        );
        assert_eq!(row.tag, "");
        assert_eq!(row.resource_type, ResourceType::WebPage);
        assert_eq!(row.error().as_deref(), Some("could not resolve hostname"));
    }
}
