//! HTTP cache control module
//!
//! Provides the per-path cache policy plus `ETag` generation and
//! conditional request handling.

use hyper::header::{self, HeaderMap, HeaderValue};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Cache-control header set attached to every response.
///
/// A development server wants HTML entry points revalidated on every
/// refresh, while assets referenced from them can be cached briefly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Never cache: revalidate on every request
    NoCache,
    /// Cache for five minutes
    ShortCache,
}

impl CachePolicy {
    /// Select the policy for a request path.
    ///
    /// Paths ending in the literal suffix `.html`, and the bare root path
    /// `/`, get [`Self::NoCache`]; everything else gets
    /// [`Self::ShortCache`]. The check is a plain suffix match with no
    /// validation: `/index.html/` does not qualify, `.html` on its own does.
    pub fn for_path(path: &str) -> Self {
        if path == "/" || path.ends_with(".html") {
            Self::NoCache
        } else {
            Self::ShortCache
        }
    }

    /// Append this policy's headers to a response header map.
    pub fn apply(self, headers: &mut HeaderMap) {
        match self {
            Self::NoCache => {
                headers.insert(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-cache, no-store, must-revalidate"),
                );
                headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
                headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
            }
            Self::ShortCache => {
                headers.insert(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("max-age=300"),
                );
            }
        }
    }
}

/// Generate `ETag` using fast hashing
///
/// # Arguments
/// * `content` - File content
///
/// # Returns
/// Quoted `ETag` string, e.g., `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Wildcard: `*`
///
/// # Returns
/// Returns true if matched (should return 304), false otherwise
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        // Handle multiple ETags separated by comma
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}
