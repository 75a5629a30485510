#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Content-addressed version cache
//!
//! Maps each logical document `(entity, document)` to an ordered table of
//! fingerprint → version. A fingerprint is assigned a version exactly once;
//! new content for the same document receives `max + 1`.
//!
//! Assigning a version and storing results are two steps. A version is
//! reserved by [`VersionCache::resolve_version`] and only counts as completed
//! once [`VersionCache::mark_completed`] confirms its results were stored, so
//! content whose results were lost is processed again under the same version.
//!
//! Every operation on a single document key runs under that key's shard lock,
//! so concurrent callers resolving the same document are serialized while
//! different documents proceed in parallel.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sheetcheck_errors::VersionError;
use sheetcheck_hash::Fingerprint;
use sheetcheck_types::{DocumentKey, EntityId, ResolvedVersion, VersionRecord};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Snapshot of what the cache knows about one `(entity, document, fingerprint)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatus {
    /// Whether this exact content already has a version
    pub processed: bool,
    /// Whether results for this content have been stored
    pub completed: bool,
    /// Version assigned to this content, if any
    pub version: Option<u32>,
    /// Highest version recorded for the document
    pub latest_version: Option<u32>,
}

/// Aggregate counts over the whole cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatistics {
    pub entities: usize,
    pub documents: usize,
    pub versions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VersionSlot {
    version: u32,
    completed: bool,
}

type VersionTable = BTreeMap<Fingerprint, VersionSlot>;

fn latest(versions: &VersionTable) -> Option<u32> {
    versions.values().map(|slot| slot.version).max()
}

/// Version cache keyed by `(entity, document)`
#[derive(Debug, Default)]
pub struct VersionCache {
    entries: DashMap<DocumentKey, VersionTable>,
}

impl VersionCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the version for this content, reserving the next one if unseen
    ///
    /// Existing fingerprints always map back to their original version, so
    /// re-running unchanged content never inflates version numbers.
    ///
    /// # Errors
    /// Returns [`VersionError::Exhausted`] if the document already holds
    /// version `u32::MAX`.
    pub fn resolve_version(
        &self,
        entity: &EntityId,
        document: &str,
        fingerprint: &Fingerprint,
    ) -> Result<ResolvedVersion, VersionError> {
        let key = DocumentKey::new(entity.clone(), document);
        let mut versions = self.entries.entry(key).or_default();

        if let Some(slot) = versions.get(fingerprint) {
            debug!(
                entity = %entity,
                document,
                version = slot.version,
                completed = slot.completed,
                fingerprint = %fingerprint.short(),
                "content already versioned"
            );
            return Ok(ResolvedVersion {
                version: slot.version,
                is_new: false,
                completed: slot.completed,
            });
        }

        let version = latest(&versions)
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| VersionError::Exhausted {
                entity: entity.to_string(),
                document: document.to_string(),
            })?;
        versions.insert(
            fingerprint.clone(),
            VersionSlot {
                version,
                completed: false,
            },
        );
        debug!(
            entity = %entity,
            document,
            version,
            fingerprint = %fingerprint.short(),
            "reserved new version"
        );
        Ok(ResolvedVersion {
            version,
            is_new: true,
            completed: false,
        })
    }

    /// Record that results for this content were stored
    ///
    /// Returns `false` if the content has no version.
    pub fn mark_completed(
        &self,
        entity: &EntityId,
        document: &str,
        fingerprint: &Fingerprint,
    ) -> bool {
        let key = DocumentKey::new(entity.clone(), document);
        let Some(mut versions) = self.entries.get_mut(&key) else {
            return false;
        };
        match versions.get_mut(fingerprint) {
            Some(slot) => {
                slot.completed = true;
                true
            }
            None => false,
        }
    }

    /// True iff this exact `(entity, document, fingerprint)` has a version
    #[must_use]
    pub fn is_processed(
        &self,
        entity: &EntityId,
        document: &str,
        fingerprint: &Fingerprint,
    ) -> bool {
        self.version_of(entity, document, fingerprint).is_some()
    }

    /// True iff results for this exact content have been stored
    #[must_use]
    pub fn is_completed(
        &self,
        entity: &EntityId,
        document: &str,
        fingerprint: &Fingerprint,
    ) -> bool {
        let key = DocumentKey::new(entity.clone(), document);
        self.entries
            .get(&key)
            .and_then(|versions| versions.get(fingerprint).map(|slot| slot.completed))
            .unwrap_or(false)
    }

    /// Version assigned to this content, if any
    #[must_use]
    pub fn version_of(
        &self,
        entity: &EntityId,
        document: &str,
        fingerprint: &Fingerprint,
    ) -> Option<u32> {
        let key = DocumentKey::new(entity.clone(), document);
        self.entries
            .get(&key)
            .and_then(|versions| versions.get(fingerprint).map(|slot| slot.version))
    }

    /// Highest version recorded for a document
    #[must_use]
    pub fn latest_version(&self, entity: &EntityId, document: &str) -> Option<u32> {
        let key = DocumentKey::new(entity.clone(), document);
        self.entries.get(&key).and_then(|versions| latest(&versions))
    }

    #[must_use]
    pub fn cache_status(
        &self,
        entity: &EntityId,
        document: &str,
        fingerprint: &Fingerprint,
    ) -> CacheStatus {
        let key = DocumentKey::new(entity.clone(), document);
        match self.entries.get(&key) {
            Some(versions) => {
                let slot = versions.get(fingerprint).copied();
                CacheStatus {
                    processed: slot.is_some(),
                    completed: slot.is_some_and(|s| s.completed),
                    version: slot.map(|s| s.version),
                    latest_version: latest(&versions),
                }
            }
            None => CacheStatus {
                processed: false,
                completed: false,
                version: None,
                latest_version: None,
            },
        }
    }

    /// Import previously persisted version records
    ///
    /// Imported content counts as completed, since history is rebuilt from
    /// stored results. Re-importing a record that is already present is a
    /// no-op apart from marking it completed. Returns the number of records
    /// that were new to the cache.
    ///
    /// # Errors
    /// Returns [`VersionError::InvalidRecord`] if a record has version 0, maps a
    /// known fingerprint to a different version, or reuses a version already
    /// held by other content. Records before the offending one stay imported.
    pub fn load_history<I>(&self, records: I) -> Result<usize, VersionError>
    where
        I: IntoIterator<Item = VersionRecord>,
    {
        let mut imported = 0;

        for record in records {
            let invalid = |message: String| VersionError::InvalidRecord {
                entity: record.entity.to_string(),
                document: record.document.clone(),
                message,
            };

            if record.version == 0 {
                return Err(invalid("versions start at 1".to_string()));
            }

            let mut versions = self.entries.entry(record.key()).or_default();

            if let Some(slot) = versions.get_mut(&record.fingerprint) {
                if slot.version != record.version {
                    return Err(invalid(format!(
                        "fingerprint {} already has version {}, record claims {}",
                        record.fingerprint.short(),
                        slot.version,
                        record.version
                    )));
                }
                slot.completed = true;
                continue;
            }

            if versions.values().any(|slot| slot.version == record.version) {
                return Err(invalid(format!(
                    "version {} already belongs to different content",
                    record.version
                )));
            }

            versions.insert(
                record.fingerprint,
                VersionSlot {
                    version: record.version,
                    completed: true,
                },
            );
            imported += 1;
        }

        info!(imported, "loaded version history");
        Ok(imported)
    }

    /// Drop every document of an entity. Returns how many documents were removed.
    ///
    /// Versions assigned after invalidation start again at 1 unless history is
    /// reloaded first.
    pub fn invalidate_entity(&self, entity: &EntityId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.entity != *entity);
        // concurrent inserts during `retain` can grow the map
        let removed = before.saturating_sub(self.entries.len());
        info!(entity = %entity, removed, "invalidated entity cache");
        removed
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn statistics(&self) -> CacheStatistics {
        let mut entities = std::collections::BTreeSet::new();
        let mut stats = CacheStatistics::default();
        for entry in &self.entries {
            entities.insert(entry.key().entity.clone());
            stats.documents += 1;
            stats.versions += entry.value().len();
        }
        stats.entities = entities.len();
        stats
    }

    /// Export every version record, ordered by document then version
    ///
    /// Reserved versions whose results were never stored are included.
    #[must_use]
    pub fn records(&self) -> Vec<VersionRecord> {
        let mut records: Vec<VersionRecord> = self
            .entries
            .iter()
            .flat_map(|entry| {
                let key = entry.key().clone();
                entry
                    .value()
                    .iter()
                    .map(|(fingerprint, slot)| VersionRecord {
                        entity: key.entity.clone(),
                        document: key.document.clone(),
                        fingerprint: fingerprint.clone(),
                        version: slot.version,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        records.sort_by(|a, b| {
            (&a.entity, &a.document, a.version).cmp(&(&b.entity, &b.document, b.version))
        });
        records
    }
}
