// src/refs/resource_type.rs
// =============================================================================
// Classifies a reference into a coarse resource type.
//
// The file extension of the URL path wins. When the path has no extension
// we fall back to the tag the reference came from (an <img> without an
// extension is still an image).
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    WebPage,
    Image,
    Stylesheet,
    Script,
    Other,
    Unknown,
}

impl ResourceType {
    // Classifies a resolved URL found on `tag`
    //
    // Parameters:
    //   tag: the HTML tag name (lowercase)
    //   resolved_url: absolute URL, or "" for an unsupported reference
    //
    // Never fails: an empty or unparseable URL is Unknown, an extension we
    // don't know is Other.
    pub fn classify(tag: &str, resolved_url: &str) -> Self {
        let url = match Url::parse(resolved_url) {
            Ok(url) => url,
            Err(_) => return ResourceType::Unknown,
        };

        match extension(&url) {
            Some(ext) => Self::from_extension(&ext),
            None => Self::from_tag(tag),
        }
    }

    fn from_extension(ext: &str) -> Self {
        match ext {
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "ico" | "webp" | "avif" | "bmp" => {
                ResourceType::Image
            }
            "css" => ResourceType::Stylesheet,
            "js" | "mjs" => ResourceType::Script,
            "html" | "htm" | "xhtml" => ResourceType::WebPage,
            _ => ResourceType::Other,
        }
    }

    fn from_tag(tag: &str) -> Self {
        match tag {
            "img" | "source" => ResourceType::Image,
            "link" => ResourceType::Stylesheet,
            "script" => ResourceType::Script,
            // Anchors and anything else without an extension are pages
            _ => ResourceType::WebPage,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::WebPage => "WebPage",
            ResourceType::Image => "Image",
            ResourceType::Stylesheet => "Stylesheet",
            ResourceType::Script => "Script",
            ResourceType::Other => "Other",
            ResourceType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Lowercased text after the last '.' of the final path segment.
// url::Url keeps the query and fragment out of path(), so "a.css?v=2" works.
fn extension(url: &Url) -> Option<String> {
    let segment = url.path().rsplit('/').next().unwrap_or("");
    let (stem, ext) = segment.rsplit_once('.')?;

    if stem.is_empty() || ext.is_empty() {
        // ".htaccess" or "file." have no usable extension
        return None;
    }

    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_on_img_is_image() {
        assert_eq!(
            ResourceType::classify("img", "https://example.com/logo.png"),
            ResourceType::Image
        );
    }

    #[test]
    fn test_no_extension_anchor_is_webpage() {
        assert_eq!(
            ResourceType::classify("a", "https://example.com/about"),
            ResourceType::WebPage
        );
        assert_eq!(
            ResourceType::classify("a", "https://example.com/"),
            ResourceType::WebPage
        );
    }

    #[test]
    fn test_js_is_script_regardless_of_tag() {
        for tag in ["a", "img", "link", "script", "source"] {
            assert_eq!(
                ResourceType::classify(tag, "https://example.com/app.js"),
                ResourceType::Script
            );
        }
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        assert_eq!(
            ResourceType::classify("link", "https://example.com/site.CSS?v=3#x"),
            ResourceType::Stylesheet
        );
        assert_eq!(
            ResourceType::classify("a", "https://example.com/page?file=x.png"),
            ResourceType::WebPage
        );
    }

    #[test]
    fn test_extension_from_last_segment_only() {
        assert_eq!(
            ResourceType::classify("a", "https://example.com/v1.2/docs"),
            ResourceType::WebPage
        );
    }

    #[test]
    fn test_tag_fallback() {
        assert_eq!(
            ResourceType::classify("img", "https://example.com/avatar"),
            ResourceType::Image
        );
        assert_eq!(
            ResourceType::classify("link", "https://fonts.example.com/css2"),
            ResourceType::Stylesheet
        );
        assert_eq!(
            ResourceType::classify("script", "https://example.com/gtag"),
            ResourceType::Script
        );
    }

    #[test]
    fn test_unknown_extension_is_other() {
        assert_eq!(
            ResourceType::classify("a", "https://example.com/report.pdf"),
            ResourceType::Other
        );
    }

    #[test]
    fn test_empty_url_is_unknown() {
        assert_eq!(ResourceType::classify("a", ""), ResourceType::Unknown);
    }
}
