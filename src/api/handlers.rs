// Request handlers module
//
// The two domain operations: point membership check and polygon
// insertion. Each handler validates the JSON body, issues exactly one
// store call, and maps the outcome to an HTTP response. Handlers take
// the raw body bytes so they can be driven directly in tests.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::convert::Infallible;

use super::response::{bad_request, json_response, server_error};
use super::types::{
    CheckLocationRequest, CheckLocationResponse, InsertPolygonRequest, InsertPolygonResponse,
};
use crate::geometry;
use crate::logger;
use crate::store::PolygonStore;

/// POST /check-location
///
/// Asks the store whether any polygon contains the point. The request
/// carries (lat, lon); storage axis order is (lon, lat), so the
/// arguments are swapped here. First returned row wins; among
/// overlapping polygons the choice is store-defined.
pub async fn handle_check_location(
    body: &[u8],
    store: &dyn PolygonStore,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let request: CheckLocationRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(_) => return Ok(bad_request("lat and lon are required and must be numbers")),
    };

    match store.find_containing(request.lon, request.lat).await {
        Ok(polygon_id) => json_response(
            StatusCode::OK,
            &CheckLocationResponse {
                inside: polygon_id.is_some(),
                polygon_id,
            },
        ),
        Err(err) => {
            logger::log_store_error("point lookup", &err);
            Ok(server_error())
        }
    }
}

/// POST /polygons
///
/// Validates the ring (≥ 3 pairs of exactly two numbers each), encodes
/// it as closed-ring WKT and inserts it. Coordinates are taken in the
/// caller-supplied `[x, y]` order. Duplicate names and overlapping
/// areas are allowed.
pub async fn handle_insert_polygon(
    body: &[u8],
    store: &dyn PolygonStore,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let request: InsertPolygonRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(_) => {
            return Ok(bad_request(
                "name and coordinates (an array of [x, y] number pairs) are required",
            ))
        }
    };

    if request.coordinates.len() < 3 {
        return Ok(bad_request("coordinates must contain at least 3 points"));
    }

    let wkt = geometry::ring_to_wkt(&request.coordinates);

    match store.insert_polygon(&request.name, &wkt).await {
        Ok(id) => json_response(StatusCode::CREATED, &InsertPolygonResponse { id }),
        Err(err) => {
            logger::log_store_error("polygon insert", &err);
            Ok(server_error())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreResult;
    use async_trait::async_trait;
    use http_body_util::BodyExt;
    use std::sync::Mutex;

    /// Scripted store double: returns canned results and records what
    /// the handlers asked for.
    #[derive(Default)]
    struct MockStore {
        containing: Option<i32>,
        inserted_id: i32,
        fail: bool,
        checked_points: Mutex<Vec<(f64, f64)>>,
        inserted: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl PolygonStore for MockStore {
        async fn find_containing(&self, lon: f64, lat: f64) -> StoreResult<Option<i32>> {
            if self.fail {
                return Err(sqlx::Error::PoolClosed);
            }
            self.checked_points.lock().unwrap().push((lon, lat));
            Ok(self.containing)
        }

        async fn insert_polygon(&self, name: &str, wkt: &str) -> StoreResult<i32> {
            if self.fail {
                return Err(sqlx::Error::PoolClosed);
            }
            self.inserted
                .lock()
                .unwrap()
                .push((name.to_string(), wkt.to_string()));
            Ok(self.inserted_id)
        }
    }

    async fn body_json(response: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_check_location_inside() {
        let store = MockStore {
            containing: Some(1),
            ..MockStore::default()
        };
        let response = handle_check_location(br#"{"lat": 10, "lon": 20}"#, &store)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({"inside": true, "polygonId": 1}));

        // The store sees (lon, lat) axis order
        assert_eq!(*store.checked_points.lock().unwrap(), vec![(20.0, 10.0)]);
    }

    #[tokio::test]
    async fn test_check_location_outside_omits_polygon_id() {
        let store = MockStore::default();
        let response = handle_check_location(br#"{"lat": 10, "lon": 20}"#, &store)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({"inside": false}));
        assert!(json.get("polygonId").is_none());
    }

    #[tokio::test]
    async fn test_check_location_string_lat_is_rejected() {
        let store = MockStore::default();
        let response = handle_check_location(br#"{"lat": "10", "lon": 20}"#, &store)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.checked_points.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_check_location_missing_lon_is_rejected() {
        let store = MockStore::default();
        let response = handle_check_location(br#"{"lat": 10}"#, &store)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.checked_points.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_check_location_store_failure_is_generic_500() {
        let store = MockStore {
            fail: true,
            ..MockStore::default()
        };
        let response = handle_check_location(br#"{"lat": 10, "lon": 20}"#, &store)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({"error": "server error"}));
    }

    #[tokio::test]
    async fn test_insert_polygon_closes_ring_and_returns_id() {
        let store = MockStore {
            inserted_id: 5,
            ..MockStore::default()
        };
        let body = br#"{"name": "test", "coordinates": [[0, 0], [1, 0], [1, 1]]}"#;
        let response = handle_insert_polygon(body, &store).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({"id": 5}));

        let inserted = store.inserted.lock().unwrap();
        assert_eq!(
            *inserted,
            vec![(
                "test".to_string(),
                "POLYGON((0 0, 1 0, 1 1, 0 0))".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_insert_polygon_two_pairs_rejected_before_store() {
        let store = MockStore::default();
        let body = br#"{"name": "test", "coordinates": [[0, 0], [1, 1]]}"#;
        let response = handle_insert_polygon(body, &store).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_polygon_short_pair_rejected() {
        let store = MockStore::default();
        let body = br#"{"name": "test", "coordinates": [[0, 0], [1, 0], [0]]}"#;
        let response = handle_insert_polygon(body, &store).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_polygon_missing_name_rejected() {
        let store = MockStore::default();
        let body = br#"{"coordinates": [[0, 0], [1, 0], [1, 1]]}"#;
        let response = handle_insert_polygon(body, &store).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_polygon_store_failure_is_generic_500() {
        let store = MockStore {
            fail: true,
            ..MockStore::default()
        };
        let body = br#"{"name": "test", "coordinates": [[0, 0], [1, 0], [1, 1]]}"#;
        let response = handle_insert_polygon(body, &store).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
