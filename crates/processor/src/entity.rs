//! Entity identification from document names

use sheetcheck_types::EntityId;
use std::path::Path;

/// Derives the submitting entity from a document name
pub trait EntityExtractor: Send + Sync {
    fn extract(&self, document_name: &str) -> EntityId;
}

impl<F> EntityExtractor for F
where
    F: Fn(&str) -> EntityId + Send + Sync,
{
    fn extract(&self, document_name: &str) -> EntityId {
        self(document_name)
    }
}

/// Leading token of the file stem, cut at the first separator that occurs
///
/// Separators are tried in order; the first one present in the stem wins.
/// A stem with none of them is the entity as a whole.
#[derive(Debug, Clone)]
pub struct SeparatorExtractor {
    separators: Vec<String>,
}

impl Default for SeparatorExtractor {
    fn default() -> Self {
        Self::new(["_", "-", " "])
    }
}

impl SeparatorExtractor {
    pub fn new<I, S>(separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            separators: separators
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }
}

impl EntityExtractor for SeparatorExtractor {
    fn extract(&self, document_name: &str) -> EntityId {
        let stem = Path::new(document_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(document_name);

        for separator in &self.separators {
            if let Some((head, _)) = stem.split_once(separator.as_str()) {
                return EntityId::new(head);
            }
        }
        EntityId::new(stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_separators() {
        let extractor = SeparatorExtractor::default();
        assert_eq!(extractor.extract("INS1_orsa_2024.xlsx").as_str(), "INS1");
        assert_eq!(extractor.extract("INS2-report.xlsx").as_str(), "INS2");
        assert_eq!(extractor.extract("INS3 final.xlsm").as_str(), "INS3");
        assert_eq!(extractor.extract("INS4.xlsx").as_str(), "INS4");
    }

    #[test]
    fn test_separator_priority_follows_order() {
        let extractor = SeparatorExtractor::default();
        // "_" is tried before "-" even though "-" appears first
        assert_eq!(extractor.extract("A-B_C.xlsx").as_str(), "A-B");
    }

    #[test]
    fn test_custom_separators() {
        let extractor = SeparatorExtractor::new(["."]);
        assert_eq!(extractor.extract("CH.123.report.xlsx").as_str(), "CH");
    }

    #[test]
    fn test_closure_extractor() {
        let fixed = |_: &str| EntityId::new("FIXED");
        assert_eq!(fixed.extract("anything.xlsx").as_str(), "FIXED");
    }
}
