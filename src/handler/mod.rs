//! Request handler module
//!
//! Routing dispatch plus static file serving; everything that turns a
//! request into a response lives here.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
