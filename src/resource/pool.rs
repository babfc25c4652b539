// src/resource/pool.rs
// =============================================================================
// Fetches many references concurrently while keeping the report order.
//
// Up to `concurrency` fetches are in flight at once (buffer_unordered).
// They finish in any order, so each future carries the index of its
// reference and writes its row into that slot. The returned rows are in
// exactly the order of the input references.
//
// Rust concepts:
// - Streams: buffer_unordered runs N futures at a time
// - async move: Each future owns its index and borrows its reference
// =============================================================================

use crate::refs::NormalizedReference;
use crate::resource::fetch::Fetch;
use crate::resource::row::{build, OutputRow};
use futures::stream::{self, StreamExt};
use std::time::Duration;

pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct PoolOptions {
    pub concurrency: usize,
    /// Applied to each fetch separately
    pub timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(10),
        }
    }
}

// Builds one row per reference, fetching supported ones concurrently
//
// A failed or timed-out fetch only affects its own row.
pub async fn fetch_all(
    references: &[NormalizedReference],
    requested: &[String],
    fetcher: &dyn Fetch,
    options: PoolOptions,
) -> Vec<OutputRow> {
    let mut slots: Vec<Option<OutputRow>> = vec![None; references.len()];

    let futures = references.iter().enumerate().map(|(index, reference)| async move {
        let row = build(reference, requested, fetcher, options.timeout).await;
        (index, row)
    });

    let mut completed = stream::iter(futures).buffer_unordered(options.concurrency.max(1));

    while let Some((index, row)) = completed.next().await {
        slots[index] = Some(row);
    }

    // Every index was produced exactly once
    slots.into_iter().flatten().collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not just collect() the stream?
//    - buffer_unordered yields results as they finish, not in input order
//    - Collecting directly would make the report order depend on the network
//    - Writing into slots[index] puts every row back where it belongs
//
// 2. Why Option<OutputRow> slots?
//    - The vector has to exist before any row does
//    - None = "not finished yet"; flatten() unwraps the Somes at the end
//
// 3. Where is the timeout?
//    - Inside build(): each fetch gets its own tokio::time::timeout
//    - A slow resource fails alone, its siblings keep running
// -----------------------------------------------------------------------------
