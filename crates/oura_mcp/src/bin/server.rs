use axum::debug_handler;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use oura_client::http_client::ReqwestClientFactory;
use oura_mcp::OuraMcpHandler;
use oura_mcp::config::ServerConfig;

struct AppState {
    metrics: PrometheusHandle,
}

#[debug_handler]
async fn root() -> impl IntoResponse {
    // Static payload for platform proxies probing the root path.
    Json(serde_json::json!({
        "message": "Oura MCP server is running. Use the /mcp endpoint for the MCP protocol."
    }))
}

#[debug_handler]
async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[debug_handler]
async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = state.metrics.render();
    ([("content-type", "text/plain; version=0.0.4")], body)
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Configure logging from env var `OURA_MCP_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("OURA_MCP_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(log_env.clone())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,rmcp=warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!(%log_env, "oura_mcp:http: log filter");

    let builder = PrometheusBuilder::new();
    let handle = builder.install_recorder()?;

    let config = ServerConfig::from_env();
    let factory = Arc::new(ReqwestClientFactory::new(config.base_url.clone()));
    let handler = OuraMcpHandler::new(factory, config.validate_token);
    let state = Arc::new(AppState {
        metrics: handle.clone(),
    });

    // Build rmcp StreamableHttpService mounted at /mcp
    let mcp_handler = handler.clone();
    let factory = move || -> Result<_, std::io::Error> { Ok(mcp_handler.clone()) };
    let session = std::sync::Arc::new(
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default(),
    );
    let mcp_service = rmcp::transport::streamable_http_server::tower::StreamableHttpService::new(
        factory,
        session,
        rmcp::transport::streamable_http_server::tower::StreamableHttpServerConfig::default(),
    );

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .nest_service("/mcp", mcp_service)
        .with_state(state.clone());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(%addr, tools = handler.tool_count(), "starting HTTP server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {addr}: {e}");
            std::process::exit(1);
        }
    };

    let server = axum::serve(listener, app.into_make_service());
    if let Err(e) = server
        .with_graceful_shutdown(async {
            signal::ctrl_c()
                .await
                .expect("failed to install ctrl+c handler");
        })
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
