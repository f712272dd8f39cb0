//! Control plane over the gene knowledge store.
//!
//! The control plane owns the store handle and exposes the two halves of the
//! system: ingestion of KGML and GAF source files, and the query operations
//! served to agents.

use std::{error::Error, fmt, sync::Arc};

use surrealdb::{Connection, Surreal};

use crate::parsers::KgmlParseError;
use crate::store::{StoreError, SurrealGeneStore};

pub mod ingest;
pub mod query;

pub use ingest::{
    GafIngestReport,
    KgmlBatchReport,
    KgmlFileFailure,
    KgmlIngestReport,
};
pub use query::{
    DiseaseQueryResult,
    DownstreamQueryResult,
    DownstreamRelation,
    GoTermQueryResult,
    GoTermSummary,
    StoreStats,
};

#[derive(Debug)]
pub enum ControlError {
    Parse(KgmlParseError),
    Io(std::io::Error),
    Store(StoreError),
    Task(tokio::task::JoinError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Task(err) => write!(f, "Background task failed: {err}"),
        }
    }
}

impl Error for ControlError {}

impl From<KgmlParseError> for ControlError {
    fn from(err: KgmlParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for ControlError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<StoreError> for ControlError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<tokio::task::JoinError> for ControlError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err)
    }
}

pub type ControlResult<T> = Result<T, ControlError>;

pub struct GenekgControlPlane<C: Connection> {
    store: SurrealGeneStore<C>,
}

impl<C: Connection> Clone for GenekgControlPlane<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<C: Connection> GenekgControlPlane<C> {
    #[must_use]
    pub const fn new(store: SurrealGeneStore<C>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn from_db(db: Arc<Surreal<C>>) -> Self {
        Self {
            store: SurrealGeneStore::from_arc(db),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &SurrealGeneStore<C> {
        &self.store
    }

    /// Creates the store schema if it does not exist.
    ///
    /// # Errors
    /// Returns `ControlError` if schema setup fails.
    pub async fn define_schema(&self) -> ControlResult<()> {
        self.store.define_schema().await?;
        Ok(())
    }
}
