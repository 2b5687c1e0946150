//! Logger module
//!
//! Console logging for the development server: lifecycle banners, access
//! logging and error/warning output. Info goes to stdout, errors to stderr.

use crate::config::Config;
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;
use std::path::Path;

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn log_startup() {
    println!("Starting local development server...");
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, root: &Path) {
    println!("======================================");
    println!("Development server started");
    println!("Serving directory: {}", root.display());
    println!("Listening on: http://{addr}");
    if let Some(workers) = config.server.workers {
        println!("Worker threads: {workers}");
    }
    println!("======================================\n");
}

pub fn log_running(url: &str) {
    println!("Application available at: {url}");
    println!("Edit files and refresh the browser to see updates");
    println!("Press Ctrl+C to stop the server...\n");
}

pub fn log_browser_opened(url: &str) {
    println!("Opened browser at {url}");
}

pub fn log_browser_open_failed(url: &str, err: &std::io::Error) {
    eprintln!("[WARN] Could not open browser: {err}");
    eprintln!("[WARN] Navigate to {url} manually");
}

pub fn log_signal(name: &str) {
    println!("\n[SIGNAL] {name} received, initiating shutdown...");
}

pub fn log_shutdown_requested() {
    println!("Stopping server...");
}

pub fn log_draining(open: usize) {
    println!("Waiting for {open} open connection(s) to finish...");
}

pub fn log_stopped() {
    println!("Development server stopped");
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    println!("[{}] \"{method} {uri} {version:?}\"", timestamp());
}

pub fn log_response(bytes: usize) {
    println!("[{}] -> {bytes} bytes", timestamp());
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        println!("[Headers] Count: {count}");
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    println!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}
