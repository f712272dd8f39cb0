//! Database connection setup for the daemon.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::config::GenekgConfig;

/// Opens the embedded database and selects the configured namespace.
///
/// A configured `db_path` opens an on-disk store that persists across runs;
/// otherwise the store lives in memory for the lifetime of the process.
///
/// # Errors
/// Returns `surrealdb::Error` if the engine cannot be opened or the
/// namespace selection fails.
pub async fn connect(config: &GenekgConfig) -> Result<Surreal<Db>, surrealdb::Error> {
    let db = match &config.db_path {
        Some(path) => Surreal::new::<RocksDb>(path.as_path()).await?,
        None => Surreal::new::<Mem>(()).await?,
    };
    db.use_ns(&config.db_namespace)
        .use_db(&config.db_name)
        .await?;
    Ok(db)
}
