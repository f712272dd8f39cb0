//! Daemon entry point for the gene knowledge MCP server.
//!
//! Loads configuration from the environment, opens the store, runs any
//! configured startup ingestion, and serves the MCP protocol over stdio or
//! streamable HTTP.

mod config;
mod db;

use genekg_core::control::GenekgControlPlane;
use genekg_core::parsers::GafSource;
use genekg_core::store::SurrealGeneStore;
use genekg_mcp::{QueryLimits, server};
use tracing_subscriber::EnvFilter;

use crate::config::GenekgConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Logs go to stderr; stdout belongs to the stdio MCP transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = GenekgConfig::from_args()?;
    let db = db::connect(&config).await?;
    let control = GenekgControlPlane::new(SurrealGeneStore::new(db));
    control.define_schema().await?;

    if let Some(dir) = &config.kgml_dir {
        let report = control.ingest_kgml_dir(dir).await?;
        tracing::info!(
            ingested = report.ingested.len(),
            failed = report.failed.len(),
            "startup KGML ingestion complete"
        );
    }
    if let Some(path) = &config.gaf_path {
        let report = control.ingest_gaf(GafSource::new(path)).await?;
        tracing::info!(
            associations = report.association_count,
            skipped = report.skipped_line_count,
            "startup GAF ingestion complete"
        );
    }

    let limits = QueryLimits {
        default_depth: config.default_traversal_depth,
        max_depth: config.max_traversal_depth,
    };

    if config.enable_stdio {
        server::serve_stdio(control, limits).await?;
    } else if config.mcp_serve {
        tracing::info!(addr = %config.mcp_http_addr, "serving MCP over streamable HTTP");
        let http_config = server::McpHttpServerConfig::new(config.mcp_http_addr);
        server::serve_streamable_http(control, limits, http_config).await?;
    }
    Ok(())
}
