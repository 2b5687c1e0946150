//! Static file serving module
//!
//! Resolves request paths inside the serving root, with index file support,
//! directory listings, and conditional/range response building.

use crate::config::ServingConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeOutcome};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Outcome of resolving a request path against the serving root
#[derive(Debug)]
enum Resolved {
    /// File content and its content type
    File(Vec<u8>, &'static str),
    /// Rendered directory listing HTML
    Listing(String),
    /// Directory requested without a trailing slash
    Redirect(String),
    NotFound,
}

/// Serve a request path from the serving root.
///
/// `root` must already be canonicalized (done once at startup).
pub async fn serve(
    ctx: &RequestContext<'_>,
    root: &Path,
    serving: &ServingConfig,
) -> Response<Full<Bytes>> {
    match resolve(root, serving, ctx.path).await {
        Resolved::File(content, content_type) => {
            if ctx.access_log {
                logger::log_response(content.len());
            }
            build_file_response(&content, content_type, ctx)
        }
        Resolved::Listing(html) => {
            if ctx.access_log {
                logger::log_response(html.len());
            }
            http::response::build_html_response(html, ctx.is_head)
        }
        Resolved::Redirect(target) => http::build_redirect_response(&target),
        Resolved::NotFound => http::build_404_response(),
    }
}

/// Resolve a URL path to a file, a listing, or a redirect.
async fn resolve(root: &Path, serving: &ServingConfig, path: &str) -> Resolved {
    // Remove the leading slash and drop whole `..` components; names that
    // merely contain consecutive dots stay intact
    let clean_path = path
        .trim_start_matches('/')
        .split('/')
        .filter(|component| *component != "..")
        .collect::<Vec<_>>()
        .join("/");

    let mut file_path = root.join(&clean_path);

    // Directory without a trailing slash: redirect so relative links in
    // listings and index pages resolve correctly
    if file_path.is_dir() && !clean_path.is_empty() && !clean_path.ends_with('/') {
        return Resolved::Redirect(format!("{path}/"));
    }

    if file_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
        match resolve_index(&file_path, &serving.index_files) {
            Some(index_path) => file_path = index_path,
            None => {
                if !serving.directory_listing {
                    return Resolved::NotFound;
                }
                let Ok(dir_canonical) = file_path.canonicalize() else {
                    return Resolved::NotFound;
                };
                if !dir_canonical.starts_with(root) {
                    logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
                    return Resolved::NotFound;
                }
                return match render_listing(&dir_canonical, path).await {
                    Some(html) => Resolved::Listing(html),
                    None => Resolved::NotFound,
                };
            }
        }
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_canonical) = file_path.canonicalize() else {
        return Resolved::NotFound;
    };
    if !file_canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_canonical.display()
        ));
        return Resolved::NotFound;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_canonical.display(),
                e
            ));
            return Resolved::NotFound;
        }
    };

    let content_type = mime::content_type_for(file_canonical.extension().and_then(|e| e.to_str()));
    Resolved::File(content, content_type)
}

/// First configured index file present in `dir`, if any
fn resolve_index(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    index_files.iter().map(|f| dir.join(f)).find(|p| p.is_file())
}

/// Render a directory listing, the way a generic static file server does
/// when a directory has no index file.
async fn render_listing(dir: &Path, request_path: &str) -> Option<String> {
    let mut read_dir = fs::read_dir(dir).await.ok()?;

    let mut names: Vec<String> = Vec::new();
    while let Ok(Some(entry)) = read_dir.next_entry().await {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
            name.push('/');
        }
        names.push(name);
    }
    names.sort();

    let display_path = escape_html(if request_path.is_empty() {
        "/"
    } else {
        request_path
    });

    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\">\
         <title>Directory listing for {display_path}</title></head>\n\
         <body>\n<h1>Directory listing for {display_path}</h1>\n<hr>\n<ul>\n"
    );
    for name in &names {
        let href = encode_href(name);
        let label = escape_html(name);
        html.push_str(&format!("<li><a href=\"{href}\">{label}</a></li>\n"));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");

    Some(html)
}

/// Escape text for embedding in HTML
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Percent-encode the characters that would break a relative href
fn encode_href(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '"' => out.push_str("%22"),
            _ => out.push(c),
        }
    }
    out
}

/// Build a file response with `ETag` and Range support
fn build_file_response(
    data: &[u8],
    content_type: &str,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    let total_size = data.len();

    // Check if client has a cached version
    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    match http::parse_range_header(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Satisfiable(range) => {
            let start = range.start;
            let end = range.end_position(total_size);

            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(data[start..=end].to_vec())
            };

            http::response::build_partial_response(
                body,
                content_type,
                &etag,
                start,
                end,
                total_size,
                ctx.is_head,
            )
        }
        RangeOutcome::NotSatisfiable => http::build_416_response(total_size),
        RangeOutcome::Ignored => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(data.to_owned())
            };
            http::response::build_ok_response(body, content_type, &etag, ctx.is_head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    fn fixture_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("devserve-{}-{name}", std::process::id()));
        let _ = std_fs::remove_dir_all(&root);
        std_fs::create_dir_all(&root).unwrap();
        root.canonicalize().unwrap()
    }

    fn serving() -> ServingConfig {
        ServingConfig {
            root: ".".to_string(),
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
            directory_listing: true,
        }
    }

    #[tokio::test]
    async fn serves_file_with_content_type() {
        let root = fixture_root("file");
        std_fs::write(root.join("app.js"), b"console.log(1);").unwrap();

        match resolve(&root, &serving(), "/app.js").await {
            Resolved::File(content, content_type) => {
                assert_eq!(content, b"console.log(1);");
                assert_eq!(content_type, "application/javascript");
            }
            other => panic!("Expected File, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn root_path_resolves_to_index_file() {
        let root = fixture_root("index");
        std_fs::write(root.join("index.html"), b"<html></html>").unwrap();

        match resolve(&root, &serving(), "/").await {
            Resolved::File(content, content_type) => {
                assert_eq!(content, b"<html></html>");
                assert_eq!(content_type, "text/html; charset=utf-8");
            }
            other => panic!("Expected File, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn directory_without_slash_redirects() {
        let root = fixture_root("redirect");
        std_fs::create_dir_all(root.join("assets")).unwrap();

        match resolve(&root, &serving(), "/assets").await {
            Resolved::Redirect(target) => assert_eq!(target, "/assets/"),
            other => panic!("Expected Redirect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn directory_without_index_gets_a_listing() {
        let root = fixture_root("listing");
        std_fs::write(root.join("notes.txt"), b"hi").unwrap();
        std_fs::create_dir_all(root.join("sub")).unwrap();

        match resolve(&root, &serving(), "/").await {
            Resolved::Listing(html) => {
                assert!(html.contains("notes.txt"));
                assert!(html.contains("sub/"));
                assert!(html.contains("Directory listing for /"));
            }
            other => panic!("Expected Listing, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn listing_can_be_disabled() {
        let root = fixture_root("nolisting");
        std_fs::write(root.join("notes.txt"), b"hi").unwrap();
        let cfg = ServingConfig {
            directory_listing: false,
            ..serving()
        };

        assert!(matches!(
            resolve(&root, &cfg, "/").await,
            Resolved::NotFound
        ));
    }

    #[tokio::test]
    async fn parent_traversal_is_neutralized() {
        let root = fixture_root("traversal");
        assert!(matches!(
            resolve(&root, &serving(), "/../../etc/passwd").await,
            Resolved::NotFound
        ));
    }

    #[tokio::test]
    async fn names_with_consecutive_dots_still_resolve() {
        let root = fixture_root("dotted-name");
        std_fs::write(root.join("a..b.css"), b"body{}").unwrap();

        match resolve(&root, &serving(), "/a..b.css").await {
            Resolved::File(content, content_type) => {
                assert_eq!(content, b"body{}");
                assert_eq!(content_type, "text/css");
            }
            other => panic!("Expected File, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let root = fixture_root("missing");
        assert!(matches!(
            resolve(&root, &serving(), "/nope.css").await,
            Resolved::NotFound
        ));
    }

    #[test]
    fn html_escaping_covers_markup_characters() {
        assert_eq!(escape_html("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }

    #[test]
    fn href_encoding_handles_spaces_and_reserved_characters() {
        assert_eq!(encode_href("my file.txt"), "my%20file.txt");
        assert_eq!(encode_href("100%?#.txt"), "100%25%3F%23.txt");
    }
}
