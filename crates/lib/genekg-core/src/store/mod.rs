//! `SurrealDB`-backed storage for the gene knowledge store.

mod surreal;

pub use surreal::{StoreError, StoreResult, SurrealGeneStore};
