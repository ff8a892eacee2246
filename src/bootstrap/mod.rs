//! Bootstrap module
//!
//! Startup sequence: Disconnected → DatabaseEnsured → MigrationsApplied
//! → Listening. The listener is only bound after the target database
//! exists and the migrations have run; any failure here is fatal and
//! terminates the process before the port is ever opened.

use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::time::Duration;

use crate::config::Config;
use crate::logger;

/// The three migration statements, in execution order. The seed insert
/// takes `(name, lon, lat)` as parameters and is guarded by name so a
/// restart does not duplicate the default area.
pub const MIGRATIONS: [&str; 3] = [
    "CREATE EXTENSION IF NOT EXISTS postgis",
    "CREATE TABLE IF NOT EXISTS polygon_areas (\
        id SERIAL PRIMARY KEY, \
        name TEXT NOT NULL, \
        geom GEOMETRY(POLYGON, 4326) NOT NULL\
     )",
    "INSERT INTO polygon_areas (name, geom) \
     SELECT $1, ST_Buffer(ST_SetSRID(ST_MakePoint($2, $3), 4326)::geography, 1000)::geometry \
     WHERE NOT EXISTS (SELECT 1 FROM polygon_areas WHERE name = $1)",
];

/// Connect to the administrative database and create the target
/// database if it does not exist yet.
///
/// Connection-refused is retried in a bounded loop with a fixed delay
/// (attempts and delay come from config). Any other error, or running
/// out of attempts, propagates and aborts startup.
pub async fn ensure_database_exists(config: &Config) -> Result<(), sqlx::Error> {
    let mut conn = connect_admin_with_retry(config).await?;

    let name = config.database_name();
    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(name)
        .fetch_optional(&mut conn)
        .await?;

    if exists.is_none() {
        logger::log_bootstrap_step(&format!("Creating database \"{name}\""));
        // Identifiers cannot be bound as parameters; escape embedded quotes
        let create = format!("CREATE DATABASE \"{}\"", name.replace('"', "\"\""));
        conn.execute(create.as_str()).await?;
    } else {
        logger::log_bootstrap_step(&format!("Database \"{name}\" already exists"));
    }

    conn.close().await?;
    Ok(())
}

async fn connect_admin_with_retry(config: &Config) -> Result<PgConnection, sqlx::Error> {
    let admin_url = config.admin_url();
    let mut attempt: u32 = 1;

    loop {
        match PgConnection::connect(&admin_url).await {
            Ok(conn) => return Ok(conn),
            Err(err) if is_connection_refused(&err) && attempt < config.db_connect_attempts => {
                logger::log_bootstrap_retry(
                    attempt,
                    config.db_connect_attempts,
                    config.db_connect_delay_ms,
                );
                tokio::time::sleep(Duration::from_millis(config.db_connect_delay_ms)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn is_connection_refused(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Io(io) if io.kind() == std::io::ErrorKind::ConnectionRefused)
}

/// Open the connection pool against the target database.
pub async fn connect_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_db_connections)
        .connect(&config.database_url)
        .await
}

/// Apply the migration statements in order.
///
/// Three independent statements, no rollback on partial failure: if the
/// table was created but the seed fails, startup aborts and the table
/// is left in place for the next attempt.
pub async fn run_migrations(pool: &PgPool, config: &Config) -> Result<(), sqlx::Error> {
    let [extension, table, seed] = MIGRATIONS;

    logger::log_bootstrap_step("Enabling spatial extension");
    sqlx::query(extension).execute(pool).await?;

    logger::log_bootstrap_step("Ensuring polygon_areas table");
    sqlx::query(table).execute(pool).await?;

    logger::log_bootstrap_step(&format!(
        "Seeding default area \"{}\" at ({}, {})",
        config.circle_name, config.circle_lat, config.circle_lon
    ));
    sqlx::query(seed)
        .bind(&config.circle_name)
        .bind(config.circle_lon)
        .bind(config.circle_lat)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_order() {
        assert_eq!(MIGRATIONS.len(), 3);
        assert!(MIGRATIONS[0].starts_with("CREATE EXTENSION IF NOT EXISTS postgis"));
        assert!(MIGRATIONS[1].starts_with("CREATE TABLE IF NOT EXISTS polygon_areas"));
        assert!(MIGRATIONS[2].starts_with("INSERT INTO polygon_areas"));
    }

    #[test]
    fn test_migrations_are_idempotent_where_possible() {
        assert!(MIGRATIONS[0].contains("IF NOT EXISTS"));
        assert!(MIGRATIONS[1].contains("IF NOT EXISTS"));
        // Seed insert is guarded by name instead
        assert!(MIGRATIONS[2].contains("WHERE NOT EXISTS"));
    }

    #[test]
    fn test_seed_uses_geography_buffer() {
        // 1000 meters in the geography measure around the configured center
        assert!(MIGRATIONS[2].contains("ST_Buffer"));
        assert!(MIGRATIONS[2].contains("::geography, 1000"));
        assert!(MIGRATIONS[2].contains("ST_SetSRID(ST_MakePoint($2, $3), 4326)"));
    }

    #[test]
    fn test_connection_refused_detection() {
        let refused = sqlx::Error::Io(std::io::Error::from(std::io::ErrorKind::ConnectionRefused));
        assert!(is_connection_refused(&refused));

        let other_io = sqlx::Error::Io(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert!(!is_connection_refused(&other_io));

        assert!(!is_connection_refused(&sqlx::Error::RowNotFound));
    }
}
