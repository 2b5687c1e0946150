//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, static file
//! dispatch, and response finalization (cache policy + Server header).

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, CachePolicy};
use crate::logger;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
    pub access_log: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let cfg = &state.config;
    let method = req.method();
    let path = req.uri().path();
    let is_head = *method == Method::HEAD;

    if cfg.logging.access_log {
        logger::log_request(method, req.uri(), req.version());
    }
    logger::log_headers_count(req.headers().len(), cfg.logging.show_headers);

    let mut response = match check_http_method(method, cfg.http.enable_cors) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path,
                is_head,
                if_none_match: header_string(&req, "if-none-match"),
                range_header: header_string(&req, "range"),
                access_log: cfg.logging.access_log,
            };
            static_files::serve(&ctx, &state.root, &cfg.serving).await
        }
    };

    // Cache headers go on every outgoing response, keyed off the request
    // path alone - 404s and listings included.
    CachePolicy::for_path(path).apply(response.headers_mut());
    if let Ok(server_name) = HeaderValue::from_str(&cfg.http.server_name) {
        response.headers_mut().insert(header::SERVER, server_name);
    }

    Ok(response)
}

/// Check HTTP method and return an early response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    if *method == Method::GET || *method == Method::HEAD {
        None
    } else if *method == Method::OPTIONS {
        Some(http::build_options_response(enable_cors))
    } else {
        logger::log_warning(&format!("Method not allowed: {method}"));
        Some(http::build_405_response())
    }
}

fn header_string(req: &Request<Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
