// src/resource/fetch.rs
// =============================================================================
// This module talks to the network.
//
// Key functionality:
// - The Fetch trait: what the rest of the tool needs from an HTTP client
// - HttpFetcher: the reqwest implementation used by the CLI
// - Error categorization (timeout, DNS, SSL, too many redirects, ...)
//
// Resources are fetched with HEAD (no body download). Servers that refuse
// HEAD get a GET instead, and we drop the body without reading it.
//
// Rust concepts:
// - Traits: Fetch lets tests swap the network for a fake
// - BoxFuture: async methods in a trait that works as &dyn Fetch
// - Error::source(): walking the chain of causes of an error
// =============================================================================

use crate::error::FetchError;
use futures::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

// A fetched HTML page
#[derive(Debug, Clone)]
pub struct Document {
    pub url: String,
    pub headers: HeaderMap,
    pub body: String,
}

// What the audit needs from an HTTP client
//
// Methods return boxed futures so the trait can be used as `&dyn Fetch`
// (the CLI passes an HttpFetcher, tests pass an in-memory fake).
pub trait Fetch: Send + Sync {
    /// Response headers of `url`. Non-2xx responses are errors.
    fn fetch_headers<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HeaderMap, FetchError>>;

    /// Headers and body of the HTML page at `url`.
    fn fetch_document<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Document, FetchError>>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Creates a fetcher with a per-request timeout
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    async fn head_or_get(&self, url: &str) -> Result<Response, FetchError> {
        let referer = referer_for(url);

        let mut request = self.client.head(url);
        if let Some(value) = &referer {
            request = request.header(REFERER, value.clone());
        }
        let response = request.send().await.map_err(categorize_error)?;

        if !matches!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
        ) {
            return Ok(response);
        }

        debug!(%url, status = response.status().as_u16(), "HEAD refused, retrying with GET");
        let mut request = self.client.get(url);
        if let Some(value) = referer {
            request = request.header(REFERER, value);
        }
        request.send().await.map_err(categorize_error)
    }
}

impl Fetch for HttpFetcher {
    fn fetch_headers<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HeaderMap, FetchError>> {
        Box::pin(async move {
            let response = self.head_or_get(url).await?;
            let response = ensure_success(response)?;
            Ok(response.headers().clone())
        })
    }

    fn fetch_document<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Document, FetchError>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await.map_err(categorize_error)?;
            let response = ensure_success(response)?;

            let final_url = response.url().to_string();
            let headers = response.headers().clone();
            let body = response.text().await.map_err(categorize_error)?;

            Ok(Document {
                url: final_url,
                headers,
                body,
            })
        })
    }
}

// 2xx is the only success; redirects have already been followed by reqwest
fn ensure_success(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::Status(status.as_u16()))
    }
}

// Pages are requested with the root of their own site as referer
fn referer_for(url: &str) -> Option<HeaderValue> {
    let url = Url::parse(url).ok()?;
    let root = url.origin().ascii_serialization();
    HeaderValue::from_str(&root).ok()
}

// Categorizes different error types from reqwest
fn categorize_error(error: reqwest::Error) -> FetchError {
    // The top-level message is generic, the cause is further down the chain
    let error_string = error_chain_text(&error);

    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_connect() {
        // Connection errors often mean DNS issues or host unreachable
        if is_dns_failure(&error_string) {
            FetchError::Dns
        } else {
            FetchError::Connect
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        FetchError::Ssl
    } else if error.is_decode() || error.is_body() {
        FetchError::Malformed(error.to_string())
    } else {
        FetchError::Other(error.to_string())
    }
}

// "error sending request: ... dns error: failed to lookup address ..."
fn error_chain_text(error: &dyn std::error::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text.to_lowercase()
}

fn is_dns_failure(text: &str) -> bool {
    text.contains("dns") || text.contains("failed to lookup address")
}
