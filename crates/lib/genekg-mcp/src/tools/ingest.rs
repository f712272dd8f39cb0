use genekg_core::parsers::{GafSource, KgmlParseOptions};
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

/// Parameters for ingesting one KGML pathway document.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct KgmlIngestParams {
    /// Raw KGML text. Provide this or `xml_path`.
    pub xml: Option<String>,
    /// Path to a KGML file on the server host.
    pub xml_path: Option<String>,
    /// Disease label for the pathway. Defaults to the pathway title.
    pub disease: Option<String>,
}

/// Parameters for ingesting a directory of KGML files.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct KgmlDirIngestParams {
    /// Directory containing `.xml` or `.kgml` pathway files.
    pub dir: String,
}

/// Parameters for ingesting a Gene Ontology Association File.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GafIngestParams {
    /// Path to a GAF 2.x file on the server host.
    pub gaf_path: String,
}

#[tool_router(router = tool_router_ingest, vis = "pub")]
impl<C: Connection> GenekgMcp<C> {
    #[tool(description = "Ingest a KEGG KGML pathway document. Provide xml or xml_path; optionally a disease label.")]
    async fn ingest_kgml(
        &self,
        Parameters(params): Parameters<KgmlIngestParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let xml = normalize_payload(params.xml);
        let xml_path = normalize_payload(params.xml_path);
        let mut options = KgmlParseOptions::new();
        if let Some(disease) = normalize_payload(params.disease) {
            options = options.with_disease(disease);
        }

        let report = match (xml, xml_path) {
            (Some(xml), _) => self
                .control()
                .ingest_kgml(xml, options)
                .await
                .map_err(helpers::map_err)?,
            (None, Some(path)) => self
                .control()
                .ingest_kgml_file(&path, options)
                .await
                .map_err(helpers::map_err)?,
            (None, None) => {
                return Err(helpers::mcp_err(
                    ErrorCode::INVALID_PARAMS,
                    "xml is required (provide xml or xml_path)",
                ));
            }
        };
        Ok(CallToolResult::success(vec![Content::json(report)?]))
    }

    #[tool(description = "Ingest every KGML file under a directory. Bad files are skipped and reported.")]
    async fn ingest_kgml_dir(
        &self,
        Parameters(params): Parameters<KgmlDirIngestParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let Some(dir) = normalize_payload(Some(params.dir)) else {
            return Err(helpers::mcp_err(
                ErrorCode::INVALID_PARAMS,
                "dir is required",
            ));
        };
        let report = self
            .control()
            .ingest_kgml_dir(&dir)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(report)?]))
    }

    #[tool(description = "Ingest a Gene Ontology Association File (GAF 2.x).")]
    async fn ingest_gaf(
        &self,
        Parameters(params): Parameters<GafIngestParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let Some(path) = normalize_payload(Some(params.gaf_path)) else {
            return Err(helpers::mcp_err(
                ErrorCode::INVALID_PARAMS,
                "gaf_path is required",
            ));
        };
        let report = self
            .control()
            .ingest_gaf(GafSource::new(path))
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(report)?]))
    }
}

fn normalize_payload(value: Option<String>) -> Option<String> {
    value.and_then(|payload| {
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(payload)
        }
    })
}
