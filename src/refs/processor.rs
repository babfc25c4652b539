// src/refs/processor.rs
// =============================================================================
// Turns raw attribute values into normalized references.
//
// For every raw reference found on the page we:
// 1. Drop it if its tag isn't one we were asked to look at
// 2. Resolve it against the page URL (relative paths, "../", "//host/x")
// 3. Reject anything that isn't an http(s) resource (#anchors, mailto:, ...)
// 4. Decide whether it lives on the page's own host (internal) or not
// 5. Collapse duplicates, keeping the order in which they first appeared
//
// Rejected references are kept in the output so they show up in the report.
// Filtering out external links is left to the caller.
//
// Rust concepts:
// - Result<T, E>: resolve() either gives a Url or says why not
// - Enums with data: Resolution carries the URL or the rejection reason
// - HashSet: To remember which (URL, tag) pairs we already kept
// =============================================================================

use crate::error::{ConfigurationError, UnsupportedReference};
use crate::refs::resource_type::ResourceType;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;
use url::Url;

// One URL-bearing attribute found by the HTML scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    pub tag: String,
    pub attribute: String,
    pub raw_value: String,
}

impl RawReference {
    pub fn new(tag: &str, attribute: &str, raw_value: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attribute: attribute.to_string(),
            raw_value: raw_value.to_string(),
        }
    }
}

// Where a supported reference lives relative to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Locality {
    Internal,
    External,
}

impl fmt::Display for Locality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locality::Internal => f.write_str("Internal"),
            Locality::External => f.write_str("External"),
        }
    }
}

// Outcome of resolving one raw value
//
// An unsupported reference has no URL and no locality, so the two cases are
// separate variants instead of an empty string plus flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Supported { url: Url, locality: Locality },
    Unsupported(UnsupportedReference),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedReference {
    pub original_value: String,
    pub tag: String,
    pub resolution: Resolution,
    pub resource_type: ResourceType,
}

impl NormalizedReference {
    /// Absolute URL, or "" when the reference is unsupported.
    pub fn resolved_url(&self) -> &str {
        match &self.resolution {
            Resolution::Supported { url, .. } => url.as_str(),
            Resolution::Unsupported(_) => "",
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self.resolution, Resolution::Supported { .. })
    }

    /// False for external and for unsupported references.
    pub fn is_internal(&self) -> bool {
        self.locality() == Some(Locality::Internal)
    }

    pub fn locality(&self) -> Option<Locality> {
        match &self.resolution {
            Resolution::Supported { locality, .. } => Some(*locality),
            Resolution::Unsupported(_) => None,
        }
    }

    pub fn unsupported_reason(&self) -> Option<&UnsupportedReference> {
        match &self.resolution {
            Resolution::Supported { .. } => None,
            Resolution::Unsupported(reason) => Some(reason),
        }
    }

    // Identity used for deduplication. Rejected references all share an empty
    // URL, so they are told apart by what was written in the page instead.
    fn dedup_key(&self) -> (bool, String, String) {
        match &self.resolution {
            Resolution::Supported { url, .. } => (true, url.to_string(), self.tag.clone()),
            Resolution::Unsupported(_) => {
                (false, self.original_value.trim().to_string(), self.tag.clone())
            }
        }
    }
}

// Resolves references found on one page
#[derive(Debug, Clone)]
pub struct RefProcessor {
    base: Url,
    base_host: String,
    allowed_tags: HashSet<String>,
}

impl RefProcessor {
    // Creates a processor for the page at `base_url`
    //
    // Fails when the base URL can't anchor relative references (not a URL,
    // not http(s), no host) or when no tag is allowed at all.
    pub fn new<I, S>(base_url: &str, allowed_tags: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base = parse_base_url(base_url)?;

        let base_host = base
            .host_str()
            .map(host_key)
            .ok_or_else(|| ConfigurationError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL has no host".to_string(),
            })?;

        let allowed_tags: HashSet<String> = allowed_tags
            .into_iter()
            .map(|tag| tag.as_ref().trim().to_ascii_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();

        if allowed_tags.is_empty() {
            return Err(ConfigurationError::EmptyTagSet);
        }

        Ok(Self {
            base,
            base_host,
            allowed_tags,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn allows(&self, tag: &str) -> bool {
        self.allowed_tags.contains(&tag.to_ascii_lowercase())
    }

    // Resolves one raw value against the page URL
    //
    // Examples (page https://example.com/docs/index.html):
    //   "/about"            -> https://example.com/about
    //   "../logo.png"       -> https://example.com/logo.png
    //   "//cdn.example.org" -> https://cdn.example.org/
    //   "#top"              -> FragmentOnly
    //   "mailto:me@x.org"   -> Scheme("mailto")
    pub fn resolve(&self, raw_value: &str) -> Result<Url, UnsupportedReference> {
        let value = raw_value.trim();

        if value.is_empty() {
            return Err(UnsupportedReference::Empty);
        }
        if value.starts_with('#') {
            return Err(UnsupportedReference::FragmentOnly);
        }

        // join() handles absolute values too, and treats "https:x/y" on an
        // https page as a relative path the way browsers do
        let mut url = self
            .base
            .join(value)
            .map_err(|e| UnsupportedReference::Malformed(e.to_string()))?;

        if !is_http_scheme(url.scheme()) {
            return Err(UnsupportedReference::Scheme(url.scheme().to_string()));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(UnsupportedReference::MissingHost);
        }

        // "page#a" and "page#b" are the same resource
        url.set_fragment(None);

        Ok(url)
    }

    // Host comparison only: scheme and port don't matter
    pub fn locality_of(&self, url: &Url) -> Locality {
        match url.host_str() {
            Some(host) if host_key(host) == self.base_host => Locality::Internal,
            _ => Locality::External,
        }
    }

    // Normalizes a single raw reference (the tag filter is not applied here)
    pub fn normalize(&self, raw: &RawReference) -> NormalizedReference {
        let tag = raw.tag.to_ascii_lowercase();

        let resolution = match self.resolve(&raw.raw_value) {
            Ok(url) => {
                let locality = self.locality_of(&url);
                Resolution::Supported { url, locality }
            }
            Err(reason) => {
                debug!(reference = %raw.raw_value, tag = %tag, %reason, "unsupported reference");
                Resolution::Unsupported(reason)
            }
        };

        let resource_type = match &resolution {
            Resolution::Supported { url, .. } => ResourceType::classify(&tag, url.as_str()),
            Resolution::Unsupported(_) => ResourceType::Unknown,
        };

        NormalizedReference {
            original_value: raw.raw_value.clone(),
            tag,
            resolution,
            resource_type,
        }
    }

    // Filters, normalizes and deduplicates a batch of raw references
    //
    // The output keeps the order of first appearance.
    pub fn process<I>(&self, refs: I) -> Vec<NormalizedReference>
    where
        I: IntoIterator<Item = RawReference>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for raw in refs {
            if !self.allows(&raw.tag) {
                continue;
            }

            let normalized = self.normalize(&raw);
            if seen.insert(normalized.dedup_key()) {
                out.push(normalized);
            }
        }

        out
    }
}

// One-shot form of RefProcessor::new + process
pub fn process<I, S>(
    base_url: &str,
    allowed_tags: I,
    refs: Vec<RawReference>,
) -> Result<Vec<NormalizedReference>, ConfigurationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let processor = RefProcessor::new(base_url, allowed_tags)?;
    Ok(processor.process(refs))
}

// Validates a page URL the way the run needs it
pub fn parse_base_url(base_url: &str) -> Result<Url, ConfigurationError> {
    let base = Url::parse(base_url.trim()).map_err(|e| ConfigurationError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    if !is_http_scheme(base.scheme()) {
        return Err(ConfigurationError::UnsupportedBaseScheme(
            base_url.to_string(),
        ));
    }

    Ok(base)
}

fn is_http_scheme(scheme: &str) -> bool {
    scheme == "http" || scheme == "https"
}

// "Example.COM." and "example.com" are the same host
fn host_key(host: &str) -> String {
    host.trim_end_matches('.').to_ascii_lowercase()
}
