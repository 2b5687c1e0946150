//! HTTP protocol layer module
//!
//! Cache policy, MIME detection, Range parsing and response builders,
//! decoupled from the request routing logic.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used items
pub use cache::CachePolicy;
pub use range::parse_range_header;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_416_response,
    build_options_response, build_redirect_response,
};
