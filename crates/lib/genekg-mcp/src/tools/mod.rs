//! MCP tool modules.
//!
//! Tools are grouped by domain: source-file ingestion, store queries, and
//! contextual help for the supported file formats.

pub mod ingest;
pub mod query;
mod context;
