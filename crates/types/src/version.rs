//! Version bookkeeping types

use crate::document::{DocumentKey, EntityId};
use serde::{Deserialize, Serialize};
use sheetcheck_hash::Fingerprint;

/// A persisted (entity, document, fingerprint) -> version assignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionRecord {
    pub entity: EntityId,
    pub document: String,
    pub fingerprint: Fingerprint,
    pub version: u32,
}

impl VersionRecord {
    #[must_use]
    pub fn key(&self) -> DocumentKey {
        DocumentKey::new(self.entity.clone(), self.document.clone())
    }
}

/// Answer of the version cache for one fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVersion {
    pub version: u32,
    /// `true` when this call assigned the version
    pub is_new: bool,
    /// `true` once results for this content have been stored
    pub completed: bool,
}
