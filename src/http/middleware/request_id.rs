//! Request ID middleware.
//!
//! Tags every request with an `x-request-id` (UUID v4) when the caller did
//! not supply one, and echoes it on the response for correlation.

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

pub async fn request_id_middleware(mut req: Request<Body>, next: Next) -> Response {
    let id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    match HeaderValue::from_str(&id) {
        Ok(value) => {
            req.headers_mut().insert(X_REQUEST_ID, value.clone());
            let mut response = next.run(req).await;
            response.headers_mut().insert(X_REQUEST_ID, value);
            response
        }
        Err(_) => next.run(req).await,
    }
}
