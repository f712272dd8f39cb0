//! Core types and services for genekg-mcp.
//!
//! This crate owns the parsers for KGML pathway documents and GAF association
//! files, the ingestion control plane that normalizes both into the store, the
//! query operations served to agents, and the `SurrealDB` backing store.

pub mod control;
pub mod parsers;
pub mod store;
