use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ErrorCode},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;

use crate::{GenekgMcp, helpers};

/// Parameters for gene-keyed lookups.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GeneQueryParams {
    /// Gene identifier: a KEGG id such as `hsa:10213` or a GAF symbol such
    /// as `NUDT4B`.
    pub gene_id: String,
}

/// Parameters for downstream interaction traversal.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DownstreamParams {
    pub gene_id: String,
    /// Traversal depth. Defaults to the configured depth and is clamped to
    /// the configured maximum.
    pub depth: Option<usize>,
}

#[tool_router(router = tool_router_query, vis = "pub")]
impl<C: Connection> GenekgMcp<C> {
    #[tool(description = "List the diseases linked to a gene through its pathway memberships.")]
    async fn gene_diseases(
        &self,
        Parameters(params): Parameters<GeneQueryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let gene_id = require_gene_id(&params.gene_id)?;
        let result = self
            .control()
            .gene_diseases(gene_id)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(result)?]))
    }

    #[tool(description = "List the Gene Ontology terms annotated on a gene.")]
    async fn gene_go_terms(
        &self,
        Parameters(params): Parameters<GeneQueryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let gene_id = require_gene_id(&params.gene_id)?;
        let result = self
            .control()
            .gene_go_terms(gene_id)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(result)?]))
    }

    #[tool(description = "Walk the interaction graph downstream from a gene. Optional depth, default 1.")]
    async fn downstream_analysis(
        &self,
        Parameters(params): Parameters<DownstreamParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let gene_id = require_gene_id(&params.gene_id)?;
        let depth = self.clamp_depth(params.depth);
        let result = self
            .control()
            .downstream_analysis(gene_id, depth)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(result)?]))
    }

    #[tool(description = "Report row counts for every table in the store.")]
    async fn store_stats(&self) -> Result<CallToolResult, ErrorData> {
        let stats = self
            .control()
            .store_stats()
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(stats)?]))
    }
}

fn require_gene_id(gene_id: &str) -> Result<&str, ErrorData> {
    let trimmed = gene_id.trim();
    if trimmed.is_empty() {
        return Err(helpers::mcp_err(
            ErrorCode::INVALID_PARAMS,
            "gene_id is required",
        ));
    }
    Ok(trimmed)
}
