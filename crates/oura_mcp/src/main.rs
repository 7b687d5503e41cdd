use std::sync::Arc;

use oura_client::http_client::ReqwestClientFactory;
use oura_mcp::OuraMcpHandler;
use oura_mcp::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configure logging from env var `OURA_MCP_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("OURA_MCP_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    // Append per-target overrides to keep rmcp internals quiet by default
    let combined_filter = format!("{},rmcp=warn,serve_inner=warn", log_env);
    let env_filter = tracing_subscriber::EnvFilter::try_new(combined_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,rmcp=warn,serve_inner=warn"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::info!("oura_mcp: log filter: {}", log_env);

    let config = ServerConfig::from_env();
    let factory = Arc::new(ReqwestClientFactory::new(config.base_url.clone()));
    let handler = OuraMcpHandler::new(factory, config.validate_token);

    tracing::info!(
        "oura_mcp: registered {} tools (token validation: {})",
        handler.tool_count(),
        config.validate_token
    );

    // Start RMCP server over stdio transport so it's immediately usable with MCP clients
    tracing::info!("oura_mcp: starting stdio MCP server...");

    use rmcp::serve_server;
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let server = serve_server(handler, transport).await?;

    tracing::info!("oura_mcp: service initialized as server");

    server.waiting().await?;

    Ok(())
}
