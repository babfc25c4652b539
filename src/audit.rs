// src/audit.rs
// =============================================================================
// Audits one page from start to finish.
//
// What happens here:
// 1. Fetch the page HTML
// 2. Scan it for references (a, link, script, source, img)
// 3. Normalize, classify and deduplicate them
// 4. Drop external references unless external processing is enabled
// 5. Fetch the survivors concurrently and build the report rows
//
// Only a configuration problem is an error. A page that can't be fetched
// still produces a row, so one dead page doesn't hide the others.
//
// Rust concepts:
// - async/await: Every step that touches the network is awaited
// - ? operator: Only configuration errors bubble up to the caller
// =============================================================================

use crate::config::AuditConfig;
use crate::error::ConfigurationError;
use crate::refs::{extract_references, Locality, NormalizedReference, RefProcessor};
use crate::resource::{fetch_all, Fetch, OutputRow};
use std::time::Instant;
use tracing::{debug, info, warn};

// Audits every page of the configuration, in order
pub async fn audit_all(
    config: &AuditConfig,
    fetcher: &dyn Fetch,
) -> Result<Vec<OutputRow>, ConfigurationError> {
    config.validate()?;

    let mut rows = Vec::new();
    for resource in &config.resources {
        rows.extend(audit_page(resource, config, fetcher).await?);
    }
    Ok(rows)
}

pub async fn audit_page(
    base_url: &str,
    config: &AuditConfig,
    fetcher: &dyn Fetch,
) -> Result<Vec<OutputRow>, ConfigurationError> {
    let started = Instant::now();
    let processor = RefProcessor::new(base_url, &config.tags)?;
    let page_url = processor.base().to_string();

    info!(url = %page_url, "processing page");

    let document = match fetcher.fetch_document(&page_url).await {
        Ok(document) => document,
        Err(e) => {
            warn!(url = %page_url, error = %e, "could not fetch page");
            return Ok(vec![OutputRow::for_page(&page_url, Err(e), &config.headers)]);
        }
    };

    // Relative references are relative to where the page really lives.
    // A redirect to another host makes that host the internal one.
    let processor = if document.url != page_url {
        debug!(from = %page_url, to = %document.url, "page redirected");
        RefProcessor::new(&document.url, &config.tags).unwrap_or(processor)
    } else {
        processor
    };

    let raw = extract_references(&document.body);
    let found = raw.len();
    let references = apply_external_policy(processor.process(raw), config.include_external);

    info!(
        url = %page_url,
        found,
        kept = references.len(),
        "references collected"
    );

    let rows = if references.is_empty() {
        // Nothing to report on but the page itself
        vec![OutputRow::for_page(
            &page_url,
            Ok(&document.headers),
            &config.headers,
        )]
    } else if config.fetch {
        fetch_all(&references, &config.headers, fetcher, config.pool_options()).await
    } else {
        references
            .iter()
            .map(|reference| OutputRow::unfetched(reference, &config.headers))
            .collect()
    };

    info!(url = %page_url, elapsed = ?started.elapsed(), "page done");

    Ok(rows)
}

// External references are dropped unless asked for.
// Unsupported ones have no locality and are always kept.
pub fn apply_external_policy(
    references: Vec<NormalizedReference>,
    include_external: bool,
) -> Vec<NormalizedReference> {
    if include_external {
        return references;
    }

    references
        .into_iter()
        .filter(|reference| reference.locality() != Some(Locality::External))
        .collect()
}
