//! Spatial store module
//!
//! The store abstraction over the PostGIS-backed polygon table. All
//! geometric computation (containment predicates, geography buffers)
//! happens inside the database; this module only issues parameterized
//! statements and maps rows back.

use async_trait::async_trait;
use sqlx::PgPool;

pub type StoreResult<T> = Result<T, sqlx::Error>;

/// Query-execution capability against the polygon table.
///
/// Constructed once at process start and passed into handlers through
/// shared state, so tests can substitute a scripted double.
#[async_trait]
pub trait PolygonStore: Send + Sync {
    /// Return the id of the first stored polygon containing the point
    /// `(lon, lat)`, or `None` if no polygon contains it.
    ///
    /// No explicit ordering is applied: which polygon wins among
    /// overlapping areas is store-defined.
    async fn find_containing(&self, lon: f64, lat: f64) -> StoreResult<Option<i32>>;

    /// Insert a named polygon from its WKT ring encoding and return the
    /// id assigned by the store.
    async fn insert_polygon(&self, name: &str, wkt: &str) -> StoreResult<i32>;
}

/// `PostGIS` implementation over an sqlx connection pool.
///
/// The pool is the only shared mutable resource in the process; each
/// operation is a single statement, atomic by the store's own
/// guarantee. Statement timeouts are left at driver defaults.
pub struct PgPolygonStore {
    pool: PgPool,
}

impl PgPolygonStore {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PolygonStore for PgPolygonStore {
    async fn find_containing(&self, lon: f64, lat: f64) -> StoreResult<Option<i32>> {
        let id: Option<i32> = sqlx::query_scalar(
            "SELECT id FROM polygon_areas \
             WHERE ST_Contains(geom, ST_SetSRID(ST_MakePoint($1, $2), 4326)) \
             LIMIT 1",
        )
        .bind(lon)
        .bind(lat)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    async fn insert_polygon(&self, name: &str, wkt: &str) -> StoreResult<i32> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO polygon_areas (name, geom) \
             VALUES ($1, ST_SetSRID(ST_GeomFromText($2), 4326)) \
             RETURNING id",
        )
        .bind(name)
        .bind(wkt)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}
