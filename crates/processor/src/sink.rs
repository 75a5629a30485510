//! Result sinks

use async_trait::async_trait;
use sheetcheck_errors::Error;
use sheetcheck_types::{CheckResult, EntityId, VersionRecord};
use std::collections::{BTreeSet, HashSet};
use std::sync::Mutex;

/// Destination for completed check results
///
/// Implementations must accept a whole document's results in one call and
/// are responsible for deduplicating on the result's natural key. Errors are
/// returned to the batch caller.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Store a batch of results, returning how many were newly stored
    ///
    /// # Errors
    /// Returns a storage error if the batch could not be persisted.
    async fn write(&self, results: &[CheckResult]) -> Result<usize, Error>;
}

/// In-memory sink for tests and dry runs
#[derive(Debug, Default)]
pub struct MemorySink {
    results: Mutex<Vec<CheckResult>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored results in write order
    ///
    /// # Errors
    /// Returns an internal error if the store lock is poisoned.
    pub fn results(&self) -> Result<Vec<CheckResult>, Error> {
        Ok(self.lock()?.clone())
    }

    /// Distinct version records derived from stored results
    ///
    /// # Errors
    /// Returns an internal error if the store lock is poisoned.
    pub fn version_history(&self) -> Result<Vec<VersionRecord>, Error> {
        let records: BTreeSet<_> = self
            .lock()?
            .iter()
            .map(|r| {
                (
                    r.entity.clone(),
                    r.document.clone(),
                    r.version,
                    r.fingerprint.clone(),
                )
            })
            .collect();
        Ok(records
            .into_iter()
            .map(|(entity, document, version, fingerprint)| VersionRecord {
                entity,
                document,
                fingerprint,
                version,
            })
            .collect())
    }

    /// Results for one entity, optionally restricted to a version
    ///
    /// # Errors
    /// Returns an internal error if the store lock is poisoned.
    pub fn results_for_entity(
        &self,
        entity: &EntityId,
        version: Option<u32>,
    ) -> Result<Vec<CheckResult>, Error> {
        Ok(self
            .lock()?
            .iter()
            .filter(|r| r.entity == *entity && version.is_none_or(|v| r.version == v))
            .cloned()
            .collect())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<CheckResult>>, Error> {
        self.results
            .lock()
            .map_err(|_| Error::internal("result store lock poisoned"))
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn write(&self, results: &[CheckResult]) -> Result<usize, Error> {
        let mut stored = self.lock()?;
        let mut seen: HashSet<(EntityId, String, u32, String)> = stored
            .iter()
            .map(|r| (r.entity.clone(), r.document.clone(), r.version, r.check.clone()))
            .collect();

        let mut inserted = 0;
        for result in results {
            let key = (
                result.entity.clone(),
                result.document.clone(),
                result.version,
                result.check.clone(),
            );
            if seen.insert(key) {
                stored.push(result.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sheetcheck_hash::Fingerprint;

    fn result(entity: &str, version: u32, check: &str) -> CheckResult {
        CheckResult {
            entity: EntityId::new(entity),
            document: format!("{entity}_a.xlsx"),
            fingerprint: Fingerprint::from_data(&version.to_le_bytes()),
            version,
            check: check.to_string(),
            passed: true,
            value: None,
            description: "ok".to_string(),
            processed_at: Utc::now(),
            business_case: None,
            reporting_year: None,
        }
    }

    #[tokio::test]
    async fn test_write_ignores_duplicate_natural_keys() {
        let sink = MemorySink::new();
        let batch = vec![result("INS1", 1, "a"), result("INS1", 1, "b")];

        assert_eq!(sink.write(&batch).await.unwrap(), 2);
        assert_eq!(sink.write(&batch).await.unwrap(), 0);
        assert_eq!(sink.results().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_history_and_entity_queries() {
        let sink = MemorySink::new();
        sink.write(&[
            result("INS1", 1, "a"),
            result("INS1", 1, "b"),
            result("INS1", 2, "a"),
            result("INS2", 1, "a"),
        ])
        .await
        .unwrap();

        let history = sink.version_history().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].entity.as_str(), "INS1");
        assert_eq!(history[0].version, 1);
        assert_eq!(history[1].version, 2);

        let ins1 = EntityId::new("INS1");
        assert_eq!(sink.results_for_entity(&ins1, None).unwrap().len(), 3);
        assert_eq!(sink.results_for_entity(&ins1, Some(2)).unwrap().len(), 1);
    }
}
