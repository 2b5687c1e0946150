//! Browser launching module
//!
//! Opens the default browser at the server URL. Failure is non-fatal: the
//! server keeps running and the URL is printed for manual navigation.

use crate::logger;

pub fn open_tab(url: &str) {
    match open::that(url) {
        Ok(()) => logger::log_browser_opened(url),
        Err(e) => logger::log_browser_open_failed(url, &e),
    }
}
