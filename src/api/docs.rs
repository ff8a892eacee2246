// API docs - interactive documentation for the two routes

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Serve the interactive documentation page
pub fn serve_docs() -> Response<Full<Bytes>> {
    let html = include_str!("docs.html");

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::from(html.to_string())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Docs"))))
}

/// Serve the OpenAPI document backing the docs page
pub fn serve_openapi() -> Response<Full<Bytes>> {
    let doc = openapi_document();

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(doc.to_string())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("{}"))))
}

fn openapi_document() -> serde_json::Value {
    serde_json::json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Geofence API",
            "description": "Stores named polygon areas and answers point-in-polygon membership queries.",
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": {
            "/check-location": {
                "post": {
                    "summary": "Check whether a point lies inside any stored polygon",
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": {
                            "type": "object",
                            "required": ["lat", "lon"],
                            "properties": {
                                "lat": { "type": "number" },
                                "lon": { "type": "number" }
                            }
                        }}}
                    },
                    "responses": {
                        "200": {
                            "description": "Membership result; polygonId is present only when inside",
                            "content": { "application/json": { "schema": {
                                "type": "object",
                                "required": ["inside"],
                                "properties": {
                                    "inside": { "type": "boolean" },
                                    "polygonId": { "type": "integer" }
                                }
                            }}}
                        },
                        "400": { "description": "lat/lon missing or non-numeric" },
                        "500": { "description": "Spatial store error" }
                    }
                }
            },
            "/polygons": {
                "post": {
                    "summary": "Insert a named polygon area",
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": {
                            "type": "object",
                            "required": ["name", "coordinates"],
                            "properties": {
                                "name": { "type": "string" },
                                "coordinates": {
                                    "type": "array",
                                    "minItems": 3,
                                    "items": {
                                        "type": "array",
                                        "minItems": 2,
                                        "maxItems": 2,
                                        "items": { "type": "number" }
                                    },
                                    "description": "[x, y] pairs; an open ring is closed automatically"
                                }
                            }
                        }}}
                    },
                    "responses": {
                        "201": {
                            "description": "Polygon stored",
                            "content": { "application/json": { "schema": {
                                "type": "object",
                                "properties": { "id": { "type": "integer" } }
                            }}}
                        },
                        "400": { "description": "Malformed name/coordinates or fewer than 3 pairs" },
                        "500": { "description": "Spatial store error" }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_covers_both_routes() {
        let doc = openapi_document();
        assert!(doc["paths"]["/check-location"]["post"].is_object());
        assert!(doc["paths"]["/polygons"]["post"].is_object());
        assert_eq!(doc["openapi"], "3.0.3");
    }

    #[test]
    fn test_docs_page_served_as_html() {
        let response = serve_docs();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["Content-Type"],
            "text/html; charset=utf-8"
        );
    }
}
