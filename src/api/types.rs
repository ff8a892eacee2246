// API request/response types module
// Typed JSON bodies; serde does the shape validation

use serde::{Deserialize, Serialize};

use crate::geometry::Coordinate;

/// Body of POST /check-location.
///
/// `lat`/`lon` are named explicitly here; the store's axis order is
/// (lon, lat), the handler swaps them before querying.
#[derive(Debug, Deserialize)]
pub struct CheckLocationRequest {
    pub lat: f64,
    pub lon: f64,
}

/// Body of POST /polygons.
///
/// Coordinates are `[x, y]` pairs in caller-supplied order; they are
/// stored without relabeling. A pair that is not exactly two numbers
/// fails deserialization.
#[derive(Debug, Deserialize)]
pub struct InsertPolygonRequest {
    pub name: String,
    pub coordinates: Vec<Coordinate>,
}

/// Result of a membership check. `polygonId` is omitted entirely (not
/// null) when the point is outside every stored area.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CheckLocationResponse {
    pub inside: bool,
    #[serde(rename = "polygonId", skip_serializing_if = "Option::is_none")]
    pub polygon_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct InsertPolygonResponse {
    pub id: i32,
}
