//! Track playback URL relay.

use async_trait::async_trait;
use serde_json::json;

use crate::http::context::RequestContext;
use crate::http::handler::RouteHandler;
use crate::http::response::{HandlerFailure, HandlerOutcome};
use crate::upstream::{OutboundRequest, RequestFactory};

pub struct SongUrl;

#[async_trait]
impl RouteHandler for SongUrl {
    fn name(&self) -> &'static str {
        "song_url"
    }

    async fn handle(&self, ctx: &RequestContext, request: &RequestFactory) -> HandlerOutcome {
        let ids: Vec<&str> = ctx
            .param_or("id", "")
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            return Err(HandlerFailure::with_body(
                400,
                json!({ "code": 400, "msg": "id is required" }),
            ));
        }

        let data = json!({
            // The upstream wants the id list as a JSON array literal.
            "ids": format!("[{}]", ids.join(",")),
            "br": ctx.param_or("br", "999000"),
        });

        let response = request
            .send(
                OutboundRequest::post("/api/song/enhance/player/url", data)
                    .with_cookies(ctx.cookies.clone()),
            )
            .await?;
        Ok(response.into())
    }
}
