//! Document identity and batch input types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Identifier of the organisation that submitted a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A logical document across all of its revisions: (entity, document name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentKey {
    pub entity: EntityId,
    pub document: String,
}

impl DocumentKey {
    pub fn new(entity: impl Into<EntityId>, document: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            document: document.into(),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity, self.document)
    }
}

/// Optional business fields a document source may attach to a submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessMetadata {
    /// Business case number of the submission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_case: Option<String>,
    /// Reporting year the submission covers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_year: Option<i32>,
}

/// One entry yielded by a document source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Document name as submitted (used for entity extraction and identity)
    pub name: String,
    /// Where the document content lives on disk
    pub path: PathBuf,
    #[serde(default)]
    pub metadata: BusinessMetadata,
}

impl DocumentInput {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            metadata: BusinessMetadata::default(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: BusinessMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}
