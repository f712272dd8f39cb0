//! Data model and schema helpers for genekg-mcp.
//!
//! This crate defines the canonical records shared by parsers, the ingestion
//! control plane, and the storage backend.

pub mod models;
pub mod schema;

pub use models::*;
