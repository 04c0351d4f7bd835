//! Newest-albums catalogue relay.

use async_trait::async_trait;
use serde_json::json;

use crate::http::context::RequestContext;
use crate::http::handler::RouteHandler;
use crate::http::response::HandlerOutcome;
use crate::upstream::{OutboundRequest, RequestFactory};

pub struct AlbumNew;

#[async_trait]
impl RouteHandler for AlbumNew {
    fn name(&self) -> &'static str {
        "album_new"
    }

    async fn handle(&self, ctx: &RequestContext, request: &RequestFactory) -> HandlerOutcome {
        let data = json!({
            "area": ctx.param_or("area", "ALL"),
            "limit": ctx.param_or("limit", "30"),
            "offset": ctx.param_or("offset", "0"),
            "total": true,
        });

        let response = request
            .send(OutboundRequest::post("/api/album/new", data).with_cookies(ctx.cookies.clone()))
            .await?;
        Ok(response.into())
    }
}
