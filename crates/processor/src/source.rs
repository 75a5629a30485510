//! Document sources

use async_trait::async_trait;
use sheetcheck_errors::Error;
use sheetcheck_types::{BusinessMetadata, DocumentInput};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Ordered supply of documents for a batch
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// List the documents to process, in processing order
    ///
    /// # Errors
    /// Returns an error if the source cannot be enumerated.
    async fn documents(&self) -> Result<Vec<DocumentInput>, Error>;
}

#[async_trait]
impl DocumentSource for Vec<DocumentInput> {
    async fn documents(&self) -> Result<Vec<DocumentInput>, Error> {
        Ok(self.clone())
    }
}

/// Spreadsheets in one directory, sorted by file name
///
/// Office lock files (`~$name.xlsx`) and hidden files are ignored.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    extensions: Vec<String>,
    metadata: BusinessMetadata,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extensions: ["xlsx", "xlsm", "xltx", "xltm"]
                .into_iter()
                .map(String::from)
                .collect(),
            metadata: BusinessMetadata::default(),
        }
    }

    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| Into::<String>::into(e).trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Business metadata attached to every document from this source
    #[must_use]
    pub fn with_metadata(mut self, metadata: BusinessMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    fn wanted(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if name.starts_with("~$") || name.starts_with('.') {
            return false;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
    }
}

#[async_trait]
impl DocumentSource for DirectorySource {
    async fn documents(&self) -> Result<Vec<DocumentInput>, Error> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| Error::io_with_path(&e, &self.dir))?;

        let mut documents = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::io_with_path(&e, &self.dir))?
        {
            let path = entry.path();
            let is_file = entry
                .file_type()
                .await
                .map_err(|e| Error::io_with_path(&e, &path))?
                .is_file();
            if !is_file || !self.wanted(&path) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            documents.push(DocumentInput::new(name, path).with_metadata(self.metadata.clone()));
        }

        documents.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(dir = %self.dir.display(), count = documents.len(), "enumerated documents");
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_lists_spreadsheets_sorted() {
        let dir = tempdir().unwrap();
        for name in ["INS2_b.xlsx", "INS1_a.XLSM", "notes.txt", "~$INS1_a.xlsx", ".hidden.xlsx"] {
            fs::write(dir.path().join(name), b"x").await.unwrap();
        }
        fs::create_dir(dir.path().join("nested.xlsx")).await.unwrap();

        let source = DirectorySource::new(dir.path()).with_metadata(BusinessMetadata {
            business_case: None,
            reporting_year: Some(2024),
        });
        let documents = source.documents().await.unwrap();

        let names: Vec<_> = documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["INS1_a.XLSM", "INS2_b.xlsx"]);
        assert_eq!(documents[0].metadata.reporting_year, Some(2024));
    }

    #[tokio::test]
    async fn test_missing_directory_is_error() {
        let dir = tempdir().unwrap();
        let source = DirectorySource::new(dir.path().join("absent"));
        assert!(source.documents().await.is_err());
    }
}
