// Configuration types module
// Defines the application configuration structure

use serde::Deserialize;

/// Main configuration structure
///
/// Flat on purpose: every field maps 1:1 to an environment variable
/// (uppercased field name), with `config.toml` as an optional override
/// layer underneath.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Connection string for the spatial store; its last path segment
    /// is the target database name ensured at bootstrap.
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Latitude of the default seed area's center.
    pub circle_lat: f64,
    /// Longitude of the default seed area's center.
    pub circle_lon: f64,
    /// Name of the default seed area.
    pub circle_name: String,
    /// Bootstrap connection attempts before giving up.
    pub db_connect_attempts: u32,
    /// Fixed delay between bootstrap connection attempts.
    pub db_connect_delay_ms: u64,
    /// Upper bound on the sqlx connection pool.
    pub max_db_connections: u32,
    /// Log one access line per request.
    pub access_log: bool,
}
