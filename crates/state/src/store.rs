//! `SQLite`-backed result sink

use crate::{create_pool, queries, run_migrations};
use async_trait::async_trait;
use sheetcheck_errors::{Error, StorageError};
use sheetcheck_processor::ResultSink;
use sheetcheck_types::{CheckResult, EntityId, VersionRecord};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use tracing::{debug, info};

/// Result store over a `SQLite` database
#[derive(Debug, Clone)]
pub struct SqliteResultStore {
    pool: Pool<Sqlite>,
}

impl SqliteResultStore {
    /// Open (creating if needed) the database at `path` and apply migrations
    ///
    /// # Errors
    /// Returns an error if the parent directory cannot be created, the
    /// database cannot be opened, or a migration fails.
    pub async fn open(path: &Path) -> Result<Self, Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io_with_path(&e, parent))?;
        }
        let pool = create_pool(path).await?;
        run_migrations(&pool).await?;
        info!(path = %path.display(), "opened result store");
        Ok(Self { pool })
    }

    /// Wrap an existing, migrated pool
    #[must_use]
    pub fn with_pool(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Version records derived from stored results, for warming the cache
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored row is malformed.
    pub async fn version_history(&self) -> Result<Vec<VersionRecord>, Error> {
        queries::version_history(&self.pool).await
    }

    /// Stored results for an entity, optionally for one version only
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored row is malformed.
    pub async fn results_for_entity(
        &self,
        entity: &EntityId,
        version: Option<u32>,
    ) -> Result<Vec<CheckResult>, Error> {
        queries::results_for_entity(&self.pool, entity, version).await
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn count_results(&self) -> Result<u64, Error> {
        queries::count_results(&self.pool).await
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn entities(&self) -> Result<Vec<EntityId>, Error> {
        queries::entities(&self.pool).await
    }
}

#[async_trait]
impl ResultSink for SqliteResultStore {
    async fn write(&self, results: &[CheckResult]) -> Result<usize, Error> {
        let write_failed = |e: sqlx::Error| -> Error {
            StorageError::WriteFailed {
                count: results.len(),
                message: e.to_string(),
            }
            .into()
        };

        let mut tx = self.pool.begin().await.map_err(write_failed)?;
        let mut inserted = 0u64;
        for result in results {
            inserted += queries::insert_result(&mut tx, result)
                .await
                .map_err(write_failed)?;
        }
        tx.commit().await.map_err(write_failed)?;

        debug!(
            submitted = results.len(),
            inserted, "stored check results"
        );
        Ok(usize::try_from(inserted).unwrap_or(usize::MAX))
    }
}
