//! Logger module
//!
//! Provides logging utilities for the HTTP service including:
//! - Server lifecycle logging
//! - Timestamped access logging
//! - Bootstrap progress logging
//! - Error and warning logging
//!
//! Client input errors (400s) show up as access lines only; store
//! failures are logged with full detail before the generic 500 goes
//! out.

use chrono::Local;
use std::net::SocketAddr;

use crate::config::Config;

/// Write to info/access log
fn write_info(message: &str) {
    println!("{message}");
}

/// Write to error log
fn write_error(message: &str) {
    eprintln!("{message}");
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Geofence service started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Spatial store: {}", config.database_name()));
    write_info(&format!("Default area: {}", config.circle_name));
    write_info("Using Tokio runtime for concurrency");
    write_info("======================================\n");
}

/// Log one access line per handled request
pub fn log_request(method: &str, path: &str, status: u16) {
    write_info(&format!("[{}] {method} {path} - {status}", timestamp()));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

/// Log a store failure with full detail; the client only sees a
/// generic 500 body.
pub fn log_store_error(operation: &str, err: &sqlx::Error) {
    write_error(&format!("[ERROR] Store {operation} failed: {err:?}"));
}

pub fn log_bootstrap_step(message: &str) {
    write_info(&format!("[BOOTSTRAP] {message}"));
}

pub fn log_bootstrap_retry(attempt: u32, max_attempts: u32, delay_ms: u64) {
    write_error(&format!(
        "[BOOTSTRAP] Connection refused (attempt {attempt}/{max_attempts}), retrying in {delay_ms} ms"
    ));
}

pub fn log_bootstrap_fatal(message: &str) {
    write_error(&format!("[FATAL] {message}"));
}
