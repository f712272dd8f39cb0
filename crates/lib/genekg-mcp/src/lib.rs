//! MCP server implementation for genekg-mcp.
//!
//! This crate wires the control plane into rmcp tool handlers and exposes the
//! MCP-facing API surface for ingestion and query.

mod helpers;
mod tools;
pub mod server;

use genekg_core::control::GenekgControlPlane;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use surrealdb::Connection;

const SERVER_INSTRUCTIONS: &str = r"genekg-mcp provides MCP tools for querying a gene knowledge store built from KEGG pathways and Gene Ontology annotations.

Workflow:
1. Ingest source files (usually done at startup, but also available as tools):
   - `ingest_kgml` for a single KEGG KGML pathway document (pass `xml` or `xml_path`, optionally `disease`).
   - `ingest_kgml_dir` for a directory of KGML files.
   - `ingest_gaf` for a Gene Ontology Association File.
2. Query the store:
   - `gene_diseases` lists the diseases linked to a gene through its pathways.
   - `gene_go_terms` lists the Gene Ontology terms annotated on a gene.
   - `downstream_analysis` walks the interaction graph from a gene (optional `depth`, default 1).
   - `store_stats` reports row counts for all tables.

Notes:
- KEGG gene ids look like `hsa:10213`; GAF genes are keyed by symbol (e.g. `NUDT4B`).
- An unknown gene id is not an error: results carry `known_gene: false` and empty lists.
- Use `help`, `ingestion_help`, `kgml_help`, and `gaf_help` for detailed guidance.
- `health` returns `ok`.";

/// Depth limits applied to downstream traversal requests.
#[derive(Debug, Clone, Copy)]
pub struct QueryLimits {
    pub default_depth: usize,
    pub max_depth: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_depth: 1,
            max_depth: 5,
        }
    }
}

/// MCP server wrapper around the control plane and tool routers.
pub struct GenekgMcp<C: Connection> {
    tool_router: ToolRouter<Self>,
    control: GenekgControlPlane<C>,
    limits: QueryLimits,
}

impl<C: Connection> Clone for GenekgMcp<C> {
    fn clone(&self) -> Self {
        Self {
            tool_router: self.tool_router.clone(),
            control: self.control.clone(),
            limits: self.limits,
        }
    }
}

impl<C: Connection> GenekgMcp<C> {
    /// Creates a new server over a control plane.
    #[must_use]
    pub fn new(control: GenekgControlPlane<C>, limits: QueryLimits) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_ingest()
            + Self::tool_router_query()
            + Self::tool_router_context();
        Self {
            tool_router,
            control,
            limits,
        }
    }

    pub(crate) const fn control(&self) -> &GenekgControlPlane<C> {
        &self.control
    }

    /// Resolves a requested traversal depth against the configured limits.
    pub(crate) fn clamp_depth(&self, requested: Option<usize>) -> usize {
        clamp_depth(self.limits, requested)
    }
}

fn clamp_depth(limits: QueryLimits, requested: Option<usize>) -> usize {
    requested
        .unwrap_or(limits.default_depth)
        .clamp(1, limits.max_depth)
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl<C: Connection> GenekgMcp<C> {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl<C: Connection> ServerHandler for GenekgMcp<C> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
