//! Multi-language sheet name resolution
//!
//! Report templates ship in German, English and French. Checks refer to
//! sheets by their German reference name; [`SheetNameMapper`] detects the
//! workbook's language and resolves the reference to the sheet actually
//! present.

use crate::model::{Workbook, Worksheet};
use std::fmt;
use tracing::{debug, warn};

/// German reference name → (English, French)
pub const SHEET_NAME_MAPPING: &[(&str, &str, &str)] = &[
    ("Mgmt. Summary", "Mgmt. summary", "Mgmt. summary"),
    ("Auswertung", "General details", "Info. générales"),
    ("Allgem. Angaben", "Risks", "Risques"),
    ("Risiken", "Measures", "Mesures"),
    ("Massnahmen", "Scenarios", "Scénarios"),
    ("Szenarien", "Results_ISO-FINMA", "Résultats_OS-FINMA"),
    ("Ergebnisse_AVO-FINMA", "Results_ISO-FINMA", "Résultats_OS-FINMA"),
    ("Ergebnisse_IFRS", "Results_IFRS", "Résultats_IFRS"),
    (
        "Qual. & langfr. Risiken",
        "Qual. & long-term risks",
        "Risques qual. & à long terme",
    ),
    (
        "Schlussfolgerungen, Dokument.",
        "Conclusions, documentation",
        "Conclusions, document.",
    ),
    ("Drop-downs", "Drop-downs", "Drop-Downs"),
];

/// Template language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    German,
    English,
    French,
}

impl Language {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::German => "DE",
            Self::English => "EN",
            Self::French => "FR",
        }
    }

    fn translate(self, entry: &(&'static str, &'static str, &'static str)) -> &'static str {
        match self {
            Self::German => entry.0,
            Self::English => entry.1,
            Self::French => entry.2,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Resolves German reference sheet names against one workbook
#[derive(Debug)]
pub struct SheetNameMapper<'a> {
    workbook: &'a Workbook,
    language: Language,
}

impl<'a> SheetNameMapper<'a> {
    #[must_use]
    pub fn new(workbook: &'a Workbook) -> Self {
        let language = detect_language(&workbook.sheet_names());
        debug!(language = %language, "detected workbook language");
        Self { workbook, language }
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Actual sheet name for a German reference name, if present
    #[must_use]
    pub fn sheet_name(&self, german_reference: &str) -> Option<&'a str> {
        let names = self.workbook.sheet_names();

        if self.language == Language::German {
            return names.into_iter().find(|name| *name == german_reference);
        }

        let Some(entry) = SHEET_NAME_MAPPING
            .iter()
            .find(|entry| entry.0 == german_reference)
        else {
            warn!(reference = german_reference, "unknown reference sheet name");
            return None;
        };

        let translated = self.language.translate(entry);
        let found = names.into_iter().find(|name| *name == translated);
        if found.is_none() {
            warn!(
                sheet = translated,
                language = %self.language,
                "translated sheet name not found in workbook"
            );
        }
        found
    }

    #[must_use]
    pub fn sheet(&self, german_reference: &str) -> Option<&'a Worksheet> {
        self.sheet_name(german_reference)
            .and_then(|name| self.workbook.sheet(name))
    }

    #[must_use]
    pub fn has_sheet(&self, german_reference: &str) -> bool {
        self.sheet_name(german_reference).is_some()
    }

    /// Every reference name that resolves, paired with its actual name
    #[must_use]
    pub fn mapped_sheets(&self) -> Vec<(&'static str, &'a str)> {
        SHEET_NAME_MAPPING
            .iter()
            .filter_map(|entry| self.sheet_name(entry.0).map(|actual| (entry.0, actual)))
            .collect()
    }
}

/// Language with the most matching sheet names; ties favour German, then English
fn detect_language(sheet_names: &[&str]) -> Language {
    let mut counts = [0usize; 3];
    for entry in SHEET_NAME_MAPPING {
        for (slot, language) in [Language::German, Language::English, Language::French]
            .into_iter()
            .enumerate()
        {
            if sheet_names.contains(&language.translate(entry)) {
                counts[slot] += 1;
            }
        }
    }

    let [de, en, fr] = counts;
    if de >= en && de >= fr {
        Language::German
    } else if en >= fr {
        Language::English
    } else {
        Language::French
    }
}
