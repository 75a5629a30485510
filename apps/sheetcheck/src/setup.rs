//! Component wiring from configuration

use crate::error::CliError;
use sheetcheck_cache::VersionCache;
use sheetcheck_checks::CheckRegistry;
use sheetcheck_config::Config;
use sheetcheck_events::EventSender;
use sheetcheck_processor::{
    DirectorySource, DocumentProcessor, ResultSink, SeparatorExtractor,
};
use sheetcheck_state::SqliteResultStore;
use sheetcheck_types::BusinessMetadata;
use sheetcheck_workbook::SpreadsheetReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Builds stores, caches and processors from the effective configuration
pub struct SystemSetup {
    config: Config,
}

impl SystemSetup {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn database_path(&self) -> PathBuf {
        self.config.database_path()
    }

    /// Open the result database, creating it if needed
    pub async fn open_store(&self) -> Result<SqliteResultStore, CliError> {
        let path = self.database_path();
        debug!(path = %path.display(), "opening result database");
        SqliteResultStore::open(&path).await.map_err(|e| {
            CliError::Setup(format!(
                "failed to open result database {}: {e}",
                path.display()
            ))
        })
    }

    /// Open the result database only if it already exists
    pub async fn existing_store(&self) -> Result<Option<SqliteResultStore>, CliError> {
        let path = self.database_path();
        if tokio::fs::try_exists(&path).await? {
            Ok(Some(self.open_store().await?))
        } else {
            debug!(path = %path.display(), "no result database yet");
            Ok(None)
        }
    }

    /// Version cache rebuilt from stored results
    pub async fn warm_cache(
        &self,
        store: Option<&SqliteResultStore>,
    ) -> Result<Arc<VersionCache>, CliError> {
        let cache = Arc::new(VersionCache::new());
        if let Some(store) = store {
            let history = store.version_history().await?;
            let loaded = cache
                .load_history(history)
                .map_err(sheetcheck_errors::Error::from)?;
            info!(records = loaded, "loaded version history");
        }
        Ok(cache)
    }

    pub fn entity_extractor(&self) -> SeparatorExtractor {
        SeparatorExtractor::new(self.config.processing.entity_separators.iter())
    }

    /// Processor with the built-in checks and the configured processing options
    pub fn processor(
        &self,
        cache: Arc<VersionCache>,
        sink: Arc<dyn ResultSink>,
        tx: EventSender,
    ) -> DocumentProcessor {
        let reader =
            SpreadsheetReader::new().with_extensions(self.config.source.extensions.iter());
        DocumentProcessor::new(
            Arc::new(CheckRegistry::with_defaults()),
            Arc::new(reader),
            sink,
        )
        .with_cache(cache)
        .with_force(self.config.processing.force_reprocess)
        .with_concurrency(self.config.processing.concurrency)
        .with_entity_extractor(Arc::new(self.entity_extractor()))
        .with_event_sender(tx)
    }

    /// Directory source over `dir`, or the configured input directory
    pub fn source(&self, dir: Option<&Path>, metadata: BusinessMetadata) -> DirectorySource {
        let dir = dir.map_or_else(|| self.config.input_dir(), Path::to_path_buf);
        DirectorySource::new(dir)
            .with_extensions(self.config.source.extensions.iter())
            .with_metadata(metadata)
    }
}
