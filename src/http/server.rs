//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, CORS)
//! - Bind server to listener
//! - Normalize each request into a handler context
//! - Dispatch through the route table and shape the outcome
//! - Observability (metrics, correlation IDs)

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::http::context::{parse_body, parse_query, RequestContext};
use crate::http::cookies::parse_cookie_header;
use crate::http::middleware::cors::{cors_middleware, CorsState};
use crate::http::middleware::request_id::request_id_middleware;
use crate::http::response::{not_found_envelope, respond_failure, respond_success};
use crate::observability::metrics;
use crate::routing::RouteTable;
use crate::upstream::{RequestFactory, UpstreamClient};

/// Maximum buffered request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub upstream: Arc<UpstreamClient>,
}

/// HTTP server hosting the dispatch pipeline.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server over a built route table.
    pub fn new(config: ProxyConfig, table: RouteTable, upstream: UpstreamClient) -> Self {
        let state = AppState {
            table: Arc::new(table),
            upstream: Arc::new(upstream),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let cors = CorsState {
            allow_origin: config.cors.allow_origin.clone(),
        };
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(axum::middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(axum::middleware::from_fn_with_state(cors, cors_middleware))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        // Serve with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main dispatch handler.
/// Normalizes the request, looks up the route, invokes the handler, and
/// shapes the outcome.
async fn dispatch(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let path = request.uri().path().to_string();
    let method_str = request.method().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method_str,
        path = %path,
        "Dispatching request"
    );

    // 1. Match route
    let Some(route) = state.table.lookup(&path) else {
        tracing::debug!(request_id = %request_id, path = %path, "No route mounted");
        metrics::record_request(&method_str, 404, "none", start_time);
        return (StatusCode::NOT_FOUND, Json(not_found_envelope())).into_response();
    };

    // 2. Normalize transport inputs before the body consumes the request
    let secure = is_secure(request.headers());
    let client_ip = client_ip(request.headers(), peer);
    let header_cookies = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(parse_cookie_header)
        .unwrap_or_default();
    let query = parse_query(request.uri().query());
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let body_bytes = match axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!(request_id = %request_id, path = %path, "Request body over limit");
            metrics::record_request(&method_str, 413, route.name, start_time);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    // 3. Build the handler context and invoke
    let body = parse_body(content_type.as_deref(), &body_bytes);
    let ctx = RequestContext::new(header_cookies, query, body);
    let factory = RequestFactory::new(Arc::clone(&state.upstream), client_ip);

    let response = match route.handler.handle(&ctx, &factory).await {
        Ok(result) => {
            tracing::info!(
                request_id = %request_id,
                path = %path,
                status = result.status,
                "Request relayed"
            );
            respond_success(result, secure, ctx.no_cookie)
        }
        Err(failure) => {
            // The real cause is logged here; the wire may carry a mask.
            tracing::warn!(
                request_id = %request_id,
                path = %path,
                status = failure.status,
                body = ?failure.body,
                "Request failed"
            );
            respond_failure(failure)
        }
    };

    metrics::record_request(&method_str, response.status().as_u16(), route.name, start_time);
    response
}

/// True when the inbound hop was made over TLS, per the leftmost forwarded
/// protocol entry. TLS terminates at the edge in front of this service.
fn is_secure(headers: &HeaderMap) -> bool {
    headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().eq_ignore_ascii_case("https"))
        .unwrap_or(false)
}

/// Caller IP: leftmost X-Forwarded-For entry when present, otherwise the
/// socket peer, with any IPv4-mapped-IPv6 prefix stripped.
fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    let raw = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| peer.ip().to_string());

    match raw.strip_prefix("::ffff:") {
        Some(stripped) => stripped.to_string(),
        None => raw,
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
