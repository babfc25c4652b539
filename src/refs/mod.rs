// src/refs/mod.rs
// =============================================================================
// This module contains everything that happens to a reference before any
// network request is made.
//
// Submodules:
// - scan: Finds URL-bearing attributes in an HTML page
// - processor: Resolves, validates, classifies and deduplicates them
// - resource_type: Maps a reference to a coarse resource type
//
// Rust concepts:
// - Modules: each submodule is a file next to this one
// - pub use: Re-export items so callers write refs::RefProcessor
// =============================================================================

mod processor;
mod resource_type;
mod scan;

pub use processor::{
    parse_base_url, process, Locality, NormalizedReference, RawReference, RefProcessor,
    Resolution,
};
pub use resource_type::ResourceType;
pub use scan::{extract_references, SUPPORTED_TAGS};
