//! Reading spreadsheet files with calamine

use crate::model::{CellValue, Workbook, Worksheet};
use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError};
use sheetcheck_errors::DocumentError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

/// Extensions accepted by [`SpreadsheetReader`] by default
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xltx", "xltm"];

/// Opens documents into the owned workbook model
///
/// Implementations are called from blocking threads.
pub trait DocumentReader: Send + Sync {
    /// Load the document at `path`
    ///
    /// # Errors
    /// Returns a [`DocumentError`] if the file is missing, unreadable, of an
    /// unsupported type, or cannot be parsed.
    fn open(&self, path: &Path) -> Result<Workbook, DocumentError>;
}

/// Office Open XML spreadsheet reader
#[derive(Debug, Clone)]
pub struct SpreadsheetReader {
    extensions: Vec<String>,
}

impl Default for SpreadsheetReader {
    fn default() -> Self {
        Self {
            extensions: SUPPORTED_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
        }
    }
}

impl SpreadsheetReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict accepted extensions (case-insensitive, without the dot)
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

    /// Whether the path carries an accepted extension
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
    }
}

impl DocumentReader for SpreadsheetReader {
    fn open(&self, path: &Path) -> Result<Workbook, DocumentError> {
        std::fs::metadata(path).map_err(|e| DocumentError::from_io_with_path(&e, path))?;

        if !self.accepts(path) {
            return Err(DocumentError::UnsupportedFormat {
                path: path.display().to_string(),
                extension: path
                    .extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            });
        }

        let corrupt = |message: String| DocumentError::Corrupt {
            path: path.display().to_string(),
            message,
        };

        let mut xlsx: Xlsx<BufReader<File>> =
            open_workbook(path).map_err(|e: XlsxError| corrupt(e.to_string()))?;

        let merged_loaded = match xlsx.load_merged_regions() {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "merged regions unavailable");
                false
            }
        };

        let names = xlsx.sheet_names();
        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let range = xlsx
                .worksheet_range(&name)
                .map_err(|e| corrupt(format!("sheet '{name}': {e}")))?;
            let mut sheet = Worksheet::new(name.clone(), anchored_rows(&range));
            if merged_loaded {
                sheet = sheet.with_merged_regions(xlsx.merged_regions_by_sheet(&name).len());
            }
            sheets.push(sheet);
        }

        debug!(path = %path.display(), sheets = sheets.len(), "loaded workbook");
        Ok(Workbook::new(sheets))
    }
}

/// Expand a used range into rows starting at A1
fn anchored_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(CellValue::from));
        rows.push(cells);
    }
    rows
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Self::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Self::String(s.clone()),
            Data::Float(v) => Self::Float(*v),
            Data::Int(v) => Self::Int(*v),
            Data::Bool(v) => Self::Bool(*v),
            Data::DateTime(v) => Self::DateTime(v.as_f64()),
            Data::Error(e) => Self::Error(e.to_string()),
        }
    }
}
