use rmcp::{
    ErrorData,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;

use crate::GenekgMcp;

/// Payload listing context-focused MCP commands.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HelpCommands {
    pub commands: Vec<String>,
}

impl Default for HelpCommands {
    fn default() -> Self {
        Self {
            commands: vec![
                "help - List MCP commands to get context with how this MCP server works."
                    .to_string(),
                "ingestion_help - Details how to load pathway and annotation files into the store."
                    .to_string(),
                "ingest_kgml - Ingest a KEGG KGML pathway document."
                    .to_string(),
                "ingest_kgml_dir - Ingest every KGML file under a directory."
                    .to_string(),
                "ingest_gaf - Ingest a Gene Ontology Association File."
                    .to_string(),
                "gene_diseases - List the diseases linked to a gene through its pathways."
                    .to_string(),
                "gene_go_terms - List the Gene Ontology terms annotated on a gene."
                    .to_string(),
                "downstream_analysis - Walk the interaction graph downstream from a gene."
                    .to_string(),
                "store_stats - Report row counts for every table in the store."
                    .to_string(),
                "kgml_help - Describes how KEGG KGML pathway files are processed."
                    .to_string(),
                "gaf_help - Describes how GAF annotation files are processed."
                    .to_string(),
            ],
        }
    }
}

#[tool_router(router = tool_router_context, vis = "pub")]
impl<C: Connection> GenekgMcp<C> {
    #[tool(description = "List the MCP commands to get context with how this MCP server works.")]
    async fn help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(HelpCommands::default())?]))
    }

    #[tool(description = "Details how to load pathway and annotation files into the store.")]
    async fn ingestion_help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text(
r"
1. Use the MCP ingestion tools to load source files into the store.
2. Tool choices:
    - ingest_kgml: one KEGG KGML pathway document. Provide the raw text as `xml`
      or a host path as `xml_path`. An optional `disease` label overrides the
      pathway title.
    - ingest_kgml_dir: a directory of `.xml`/`.kgml` files. Files that fail to
      parse are skipped and listed in the report; the rest commit normally.
    - ingest_gaf: a Gene Ontology Association File (GAF 2.x) given by `gaf_path`.
3. Every ingest is idempotent: replaying the same file changes nothing, and a
   file that fails mid-way leaves no partial rows behind.
4. After ingestion, use gene_diseases, gene_go_terms, and downstream_analysis
   to query the store.
"
        )]))
    }

    #[tool(description = "Describes how KEGG KGML pathway files are processed.")]
    async fn kgml_help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text(
r"
1.  KGML is the XML export of a KEGG pathway map, downloadable from the KEGG
    REST API (e.g. https://rest.kegg.jp/get/hsa05010/kgml).
2.  During ingestion:
    - `entry` elements of type `gene` become gene rows; a single entry may name
      several KEGG ids (e.g. `hsa:5594 hsa:5595`) and each becomes its own row.
    - Compound and map entries carry no gene mapping and are skipped.
    - `relation` elements become directed gene-to-gene edges, one per subtype.
      Relations that point at `group` entries are expanded to the group's
      component genes, so the stored graph has no group nodes.
    - The pathway itself is stored with its title and a disease label. The
      label defaults to the title; pass `disease` to override it (useful for
      disease-focused maps such as hsa05010, Alzheimer disease).
3.  Gene rows are shared across pathways: ingesting two maps that mention the
    same KEGG id yields one gene with two pathway memberships.
"
        )]))
    }

    #[tool(description = "Describes how GAF annotation files are processed.")]
    async fn gaf_help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text(
r"
1.  GAF (Gene Ontology Association File) is the tab-delimited annotation format
    published by the GO Consortium, e.g. goa_human.gaf.
2.  During ingestion:
    - Lines starting with `!` are header comments and are skipped.
    - Each data line needs at least 15 columns; the gene symbol (column 3),
      GO id (column 5), and aspect (column 9) are extracted.
    - The aspect letter maps to a namespace: P = biological_process,
      F = molecular_function, C = cellular_component.
    - Malformed lines are skipped and counted in the report, never fatal.
3.  GAF genes are keyed by symbol (e.g. NUDT4B). Repeated annotations of the
    same gene/term pair collapse to one association row.
"
        )]))
    }
}
