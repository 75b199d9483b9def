use anyhow::Result;
use creative_orientation::{config::Config, server::CreativeOrientationServer};
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    // stdout carries the MCP transport; logs go to stderr
    if !config.runtime.mcp_no_log {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(&config.runtime.log_level))
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .init();
    }

    info!("Starting creative-orientation MCP server");
    info!(
        "Configuration loaded: generation={} model={} charts={}",
        config.generation.enabled, config.generation.model, config.charts.store
    );

    let server = CreativeOrientationServer::new(config).map_err(|e| {
        eprintln!("Failed to create server: {}", e);
        anyhow::anyhow!(e)
    })?;

    let service = server.serve(stdio()).await.map_err(|e| {
        eprintln!("Failed to start MCP service: {}", e);
        e
    })?;

    info!("MCP server ready, waiting for requests");
    service.waiting().await?;

    Ok(())
}
