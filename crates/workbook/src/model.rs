//! In-memory workbook model

use std::fmt;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    String(String),
    Float(f64),
    Int(i64),
    Bool(bool),
    /// Serial date as stored by the spreadsheet
    DateTime(f64),
    Error(String),
}

impl CellValue {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Empty, or text consisting only of whitespace
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::String(s) | Self::Error(s) => f.write_str(s),
            Self::Float(v) | Self::DateTime(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// One worksheet, with rows anchored at A1
#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
    merged_regions: Option<usize>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
            merged_regions: None,
        }
    }

    /// Worksheet with no cells
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    #[must_use]
    pub fn with_merged_regions(mut self, count: usize) -> Self {
        self.merged_regions = Some(count);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows up to the last used one
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell at a zero-based position; cells outside the used area are `None`
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    /// Whether any of the first `max_rows` rows holds a value
    #[must_use]
    pub fn has_data_within(&self, max_rows: usize) -> bool {
        self.rows
            .iter()
            .take(max_rows)
            .any(|cells| cells.iter().any(|cell| !cell.is_empty()))
    }

    /// Merged cell ranges, when the file format reports them
    #[must_use]
    pub fn merged_regions(&self) -> Option<usize> {
        self.merged_regions
    }
}

/// A loaded workbook
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
}

impl Workbook {
    #[must_use]
    pub fn new(sheets: Vec<Worksheet>) -> Self {
        Self { sheets }
    }

    #[must_use]
    pub fn sheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    /// Sheet names in workbook order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Worksheet::name).collect()
    }

    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    #[must_use]
    pub fn first_sheet(&self) -> Option<&Worksheet> {
        self.sheets.first()
    }

    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_cells() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::from("   ").is_blank());
        assert!(!CellValue::from("   ").is_empty());
        assert!(!CellValue::from(0.0).is_blank());
    }

    #[test]
    fn test_has_data_within_limits_scan() {
        let mut rows = vec![vec![CellValue::Empty; 3]; 150];
        rows[120][1] = CellValue::from("late");
        let sheet = Worksheet::new("Data", rows);

        assert!(!sheet.has_data_within(100));
        assert!(sheet.has_data_within(200));
        assert_eq!(sheet.row_count(), 150);
    }

    #[test]
    fn test_workbook_lookup() {
        let workbook = Workbook::new(vec![
            Worksheet::new("Auswertung", vec![vec![CellValue::from("Titel")]]),
            Worksheet::empty("Risiken"),
        ]);

        assert_eq!(workbook.sheet_names(), vec!["Auswertung", "Risiken"]);
        assert_eq!(workbook.first_sheet().map(Worksheet::name), Some("Auswertung"));
        assert_eq!(
            workbook.sheet("Auswertung").and_then(|s| s.cell(0, 0)),
            Some(&CellValue::from("Titel"))
        );
        assert!(workbook.sheet("Risiken").and_then(|s| s.cell(0, 0)).is_none());
    }
}
