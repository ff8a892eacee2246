// API module entry
// Routes requests to the two domain handlers and the docs pages

mod docs;
mod handlers;
mod response;
mod types;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::logger;
use response::{bad_request, not_found};

/// HTTP route handler
///
/// Dispatches based on request path and method. Every request gets one
/// access line (when enabled) with the final status code.
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match (&method, path.as_str()) {
        (&Method::POST, "/check-location") => match read_body(req).await {
            Ok(body) => handlers::handle_check_location(&body, state.store.as_ref()).await?,
            Err(response) => response,
        },
        (&Method::POST, "/polygons") => match read_body(req).await {
            Ok(body) => handlers::handle_insert_polygon(&body, state.store.as_ref()).await?,
            Err(response) => response,
        },
        (&Method::GET, "/api-docs") => docs::serve_docs(),
        (&Method::GET, "/api-docs/openapi.json") => docs::serve_openapi(),
        _ => not_found(),
    };

    if state.config.access_log {
        logger::log_request(method.as_str(), &path, response.status().as_u16());
    }

    Ok(response)
}

/// Collect the request body, mapping read failures to a 400.
async fn read_body(
    req: Request<hyper::body::Incoming>,
) -> Result<Bytes, Response<Full<Bytes>>> {
    match req.collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(_) => Err(bad_request("Failed to read request body")),
    }
}
