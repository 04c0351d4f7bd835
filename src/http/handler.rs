//! The route handler contract.

use async_trait::async_trait;

use crate::http::context::RequestContext;
use crate::http::response::HandlerOutcome;
use crate::upstream::RequestFactory;

/// A unit of relay logic bound to one URL path.
///
/// Handlers receive the merged request context plus the upstream request
/// capability and produce a result or failure that the dispatcher shapes
/// onto the transport. Handlers own upstream semantics (parameter
/// defaults, envelope crypto); the dispatcher owns everything else.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    /// Registration name. The mount path derives from it unless overridden.
    fn name(&self) -> &'static str;

    /// Serve one request.
    async fn handle(&self, ctx: &RequestContext, request: &RequestFactory) -> HandlerOutcome;
}
