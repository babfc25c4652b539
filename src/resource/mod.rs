// src/resource/mod.rs
// =============================================================================
// This module turns normalized references into report rows.
//
// Submodules:
// - fetch: The Fetch trait and its reqwest implementation
// - row: Builds one OutputRow from one reference
// - pool: Runs many row builds concurrently, in a stable order
//
// Rust concepts:
// - #[cfg(test)]: The fake fetcher only exists in test builds
// =============================================================================

mod fetch;
mod pool;
mod row;

#[cfg(test)]
pub(crate) mod testing;

pub use fetch::{Document, Fetch, HttpFetcher};
pub use pool::{fetch_all, PoolOptions, DEFAULT_CONCURRENCY};
pub use row::{build, HeaderCell, OutputRow, RowStatus};
