//! Upstream API subsystem.
//!
//! # Data Flow
//! ```text
//! Handler
//!     → RequestFactory (binds the caller's normalized IP)
//!     → UpstreamClient (base URL join, identity headers, send)
//!     → reshape: body JSON, Set-Cookie values domain-stripped
//!     → UpstreamResponse → HandlerResult / HandlerFailure
//! ```

pub mod client;
pub mod types;

pub use client::{RequestFactory, UpstreamClient};
pub use types::{OutboundRequest, UpstreamError, UpstreamResponse, UpstreamResult};
