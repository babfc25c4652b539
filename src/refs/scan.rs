// src/refs/scan.rs
// =============================================================================
// This module finds URL-bearing attributes in an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Returns matches in document order
//
// Nothing is resolved or validated here. Every attribute value is handed to
// the RefProcessor exactly as it was written in the page.
//
// Rust concepts:
// - Iterators: For walking the selector matches
// - Borrowing: srcset_urls() returns slices of the attribute value
// =============================================================================

use crate::refs::processor::RawReference;
use scraper::{ElementRef, Html, Selector};

// Tags we know how to read a reference from
pub const SUPPORTED_TAGS: [&str; 5] = ["a", "link", "script", "source", "img"];

// Extracts all references from HTML content
//
// Parameters:
//   html: the HTML content to parse
//
// Returns: one RawReference per attribute value, in document order
//
// Example:
//   html = "<a href='/docs'>Docs</a><img src='logo.png'>"
//   result = [(a, href, "/docs"), (img, src, "logo.png")]
pub fn extract_references(html: &str) -> Vec<RawReference> {
    let document = Html::parse_document(html);

    // A single selector keeps the matches in document order
    // The selector is a constant, so parsing it can only fail on a typo here
    let selector = match Selector::parse("a, link, script, source, img") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let mut refs = Vec::new();
    for element in document.select(&selector) {
        collect_element(element, &mut refs);
    }

    refs
}

fn collect_element(element: ElementRef<'_>, refs: &mut Vec<RawReference>) {
    let tag = element.value().name();

    match tag {
        "a" | "link" => push_attr(element, "href", refs),
        "img" | "script" => push_attr(element, "src", refs),
        "source" => {
            // <picture><source srcset> lists candidates; <video><source src> doesn't
            if let Some(srcset) = element.value().attr("srcset") {
                let candidates = srcset_urls(srcset);
                // srcset="" is reported like href="": one empty reference
                if candidates.is_empty() {
                    refs.push(RawReference::new(tag, "srcset", ""));
                }
                for candidate in candidates {
                    refs.push(RawReference::new(tag, "srcset", candidate));
                }
            } else {
                push_attr(element, "src", refs);
            }
        }
        _ => {}
    }
}

// An element without the attribute (inline <script>, placeholder <a>) carries
// no reference. An empty attribute does, and gets rejected later.
fn push_attr(element: ElementRef<'_>, attribute: &str, refs: &mut Vec<RawReference>) {
    if let Some(value) = element.value().attr(attribute) {
        refs.push(RawReference::new(element.value().name(), attribute, value));
    }
}

// Splits "small.jpg 480w, large.jpg 1080w" into ["small.jpg", "large.jpg"]
//
// Candidates are comma separated, and the descriptor follows the URL after
// whitespace. URLs containing commas (data: URIs) are rare enough to ignore.
fn srcset_urls(srcset: &str) -> Vec<&str> {
    srcset
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why one selector instead of one per tag?
//    - document.select() walks the tree once and yields matches in order
//    - Five separate selectors would give all <a> first, then all <link>, ...
//    - The report should follow the page, so we keep document order
//
// 2. What is srcset?
//    - A list of image candidates: "small.jpg 480w, large.jpg 1080w"
//    - The browser picks one; we report all of them
// -----------------------------------------------------------------------------
