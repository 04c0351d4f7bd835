//! Request-path middleware.
//!
//! Applied outside the dispatch handler: request IDs for correlation, and
//! the CORS/preflight surface.

pub mod cors;
pub mod request_id;

pub use cors::{cors_middleware, CorsState};
pub use request_id::{request_id_middleware, X_REQUEST_ID};
