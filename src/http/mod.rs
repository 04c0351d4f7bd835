//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, dispatch entry point)
//!     → middleware/ (request ID, CORS, preflight short-circuit)
//!     → context.rs (cookies + query + body merged into one view)
//!     → [route table picks the handler]
//!     → response.rs (shape outcome, cookie policy, failure masking)
//!     → Send to client
//! ```

pub mod context;
pub mod cookies;
pub mod handler;
pub mod middleware;
pub mod response;
pub mod server;

pub use context::RequestContext;
pub use handler::RouteHandler;
pub use response::{HandlerFailure, HandlerOutcome, HandlerResult};
pub use server::HttpServer;
