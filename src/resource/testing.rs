// src/resource/testing.rs
// In-memory Fetch implementation for unit tests.

use crate::error::FetchError;
use crate::resource::fetch::{Document, Fetch};
use futures::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct FakeFetcher {
    headers: HashMap<String, Result<HeaderMap, FetchError>>,
    documents: HashMap<String, Result<Document, FetchError>>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, url: &str, pairs: &[(&str, &str)]) -> Self {
        self.headers.insert(url.to_string(), Ok(header_map(pairs)));
        self
    }

    pub fn fail(mut self, url: &str, error: FetchError) -> Self {
        self.headers.insert(url.to_string(), Err(error));
        self
    }

    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn page(mut self, url: &str, html: &str, pairs: &[(&str, &str)]) -> Self {
        self.documents.insert(
            url.to_string(),
            Ok(Document {
                url: url.to_string(),
                headers: header_map(pairs),
                body: html.to_string(),
            }),
        );
        self
    }

    // Served at `url`, but reports `final_url` as if a redirect was followed
    pub fn redirected_page(mut self, url: &str, final_url: &str, html: &str) -> Self {
        self.documents.insert(
            url.to_string(),
            Ok(Document {
                url: final_url.to_string(),
                headers: HeaderMap::new(),
                body: html.to_string(),
            }),
        );
        self
    }

    pub fn page_error(mut self, url: &str, error: FetchError) -> Self {
        self.documents.insert(url.to_string(), Err(error));
        self
    }

    /// Number of header fetches made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetch for FakeFetcher {
    fn fetch_headers<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HeaderMap, FetchError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(url) {
                tokio::time::sleep(*delay).await;
            }
            self.headers
                .get(url)
                .cloned()
                .unwrap_or(Err(FetchError::Status(404)))
        })
    }

    fn fetch_document<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Document, FetchError>> {
        Box::pin(async move {
            self.documents
                .get(url)
                .cloned()
                .unwrap_or(Err(FetchError::Status(404)))
        })
    }
}

fn header_map(pairs: &[(&str, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.append(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    map
}
