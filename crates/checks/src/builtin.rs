//! Built-in workbook checks

#![allow(clippy::cast_precision_loss)]

use crate::CheckRegistry;
use sheetcheck_errors::CheckError;
use sheetcheck_types::{CheckContext, CheckVerdict};
use sheetcheck_workbook::Workbook;
use std::collections::HashSet;
use tracing::warn;

/// Rows scanned per sheet when looking for data
pub const EMPTY_SHEET_SCAN_ROWS: usize = 100;

/// Largest row count considered reasonable
pub const MAX_REASONABLE_ROWS: usize = 1_000_000;

/// Register the built-in checks in their canonical order
pub fn register_defaults(registry: &mut CheckRegistry) {
    registry
        .register("has_sheets", has_sheets)
        .register("no_empty_sheets", no_empty_sheets)
        .register("first_sheet_has_data", first_sheet_has_data)
        .register("sheet_names_unique", sheet_names_unique)
        .register("row_count_reasonable", row_count_reasonable)
        .register("has_expected_headers", has_expected_headers)
        .register("no_merged_cells", no_merged_cells);
}

/// The workbook contains at least one sheet
///
/// # Errors
/// Never fails.
pub fn has_sheets(workbook: &Workbook, _: &CheckContext) -> Result<CheckVerdict, CheckError> {
    let count = workbook.sheet_count();
    Ok(CheckVerdict::new(
        count > 0,
        Some(count as f64),
        format!("Workbook contains {count} sheet(s)"),
    ))
}

/// No sheet is empty within its first rows
///
/// # Errors
/// Never fails.
pub fn no_empty_sheets(workbook: &Workbook, _: &CheckContext) -> Result<CheckVerdict, CheckError> {
    let mut empty = 0usize;
    for sheet in workbook.sheets() {
        if !sheet.has_data_within(EMPTY_SHEET_SCAN_ROWS) {
            warn!(sheet = sheet.name(), "empty sheet found");
            empty += 1;
        }
    }

    let description = if empty > 0 {
        format!("Found {empty} empty sheet(s)")
    } else {
        "All sheets contain data".to_string()
    };
    Ok(CheckVerdict::new(empty == 0, Some(empty as f64), description))
}

/// Cell A1 of the first sheet holds a value
///
/// # Errors
/// Never fails.
pub fn first_sheet_has_data(
    workbook: &Workbook,
    _: &CheckContext,
) -> Result<CheckVerdict, CheckError> {
    let Some(sheet) = workbook.first_sheet() else {
        return Ok(CheckVerdict::fail("No worksheets found"));
    };

    let has_data = sheet.cell(0, 0).is_some_and(|cell| !cell.is_empty());
    let description = if has_data {
        format!("First sheet '{}' has data in A1", sheet.name())
    } else {
        format!("First sheet '{}' has no data in A1", sheet.name())
    };
    Ok(CheckVerdict::new(has_data, None, description))
}

/// Sheet names are unique
///
/// # Errors
/// Never fails.
pub fn sheet_names_unique(
    workbook: &Workbook,
    _: &CheckContext,
) -> Result<CheckVerdict, CheckError> {
    let names = workbook.sheet_names();
    let unique: HashSet<&str> = names.iter().copied().collect();
    let passed = names.len() == unique.len();

    let description = if passed {
        "All sheet names are unique".to_string()
    } else {
        format!(
            "Duplicate sheet names found: {} total, {} unique",
            names.len(),
            unique.len()
        )
    };
    Ok(CheckVerdict::new(passed, Some(unique.len() as f64), description))
}

/// No sheet exceeds [`MAX_REASONABLE_ROWS`]
///
/// # Errors
/// Never fails.
pub fn row_count_reasonable(
    workbook: &Workbook,
    _: &CheckContext,
) -> Result<CheckVerdict, CheckError> {
    let max_rows = workbook
        .sheets()
        .iter()
        .map(sheetcheck_workbook::Worksheet::row_count)
        .max()
        .unwrap_or(0);
    let passed = max_rows <= MAX_REASONABLE_ROWS;

    let description = if passed {
        format!("Maximum row count is {} (within limit)", thousands(max_rows))
    } else {
        format!(
            "Maximum row count is {} (exceeds limit of {})",
            thousands(max_rows),
            thousands(MAX_REASONABLE_ROWS)
        )
    };
    Ok(CheckVerdict::new(passed, Some(max_rows as f64), description))
}

/// The first row of the first sheet has at least one non-blank header
///
/// # Errors
/// Never fails.
pub fn has_expected_headers(
    workbook: &Workbook,
    _: &CheckContext,
) -> Result<CheckVerdict, CheckError> {
    let Some(sheet) = workbook.first_sheet() else {
        return Ok(CheckVerdict::fail("No worksheets found").with_value(0.0));
    };
    let Some(header) = sheet.rows().first() else {
        return Ok(CheckVerdict::fail(format!("Sheet '{}' is empty", sheet.name())).with_value(0.0));
    };

    let count = header.iter().filter(|cell| !cell.is_blank()).count();
    let description = if count > 0 {
        format!("Found {count} non-empty header cell(s) in first row")
    } else {
        "No headers found in first row".to_string()
    };
    Ok(CheckVerdict::new(count > 0, Some(count as f64), description))
}

/// No sheet contains merged cells
///
/// Passes without a value when the reader could not report merged regions.
///
/// # Errors
/// Never fails.
pub fn no_merged_cells(workbook: &Workbook, _: &CheckContext) -> Result<CheckVerdict, CheckError> {
    let mut merged = 0usize;
    for sheet in workbook.sheets() {
        let Some(count) = sheet.merged_regions() else {
            warn!(sheet = sheet.name(), "merged regions not reported");
            return Ok(CheckVerdict::pass(
                "Merged cells check skipped (merged regions unavailable)",
            ));
        };
        merged += count;
    }

    let description = if merged == 0 {
        "No merged cells found".to_string()
    } else {
        format!("Found {merged} merged cell range(s)")
    };
    Ok(CheckVerdict::new(merged == 0, Some(merged as f64), description))
}

fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetcheck_types::EntityId;
    use sheetcheck_workbook::{CellValue, Worksheet};

    fn ctx() -> CheckContext {
        CheckContext {
            entity: EntityId::new("INS1"),
            document: "INS1_a.xlsx".to_string(),
            version: 1,
        }
    }

    fn sheet(name: &str, rows: &[&[&str]]) -> Worksheet {
        Worksheet::new(
            name,
            rows.iter()
                .map(|row| row.iter().map(|v| CellValue::from(*v)).collect())
                .collect(),
        )
        .with_merged_regions(0)
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_000_000), "1,000,000");
        assert_eq!(thousands(12_345_678), "12,345,678");
    }

    #[test]
    fn test_healthy_workbook_passes_everything() {
        let workbook = Workbook::new(vec![
            sheet("Auswertung", &[&["Name", "Wert"], &["a", "1"]]),
            sheet("Risiken", &[&["Risiko"]]),
        ]);

        let registry = CheckRegistry::with_defaults();
        let outcomes = registry.run_all(&workbook, &ctx());
        assert_eq!(outcomes.len(), 7);
        for outcome in &outcomes {
            assert!(outcome.passed(), "{} failed: {}", outcome.check, outcome.verdict.description);
        }
    }

    #[test]
    fn test_empty_sheet_detected() {
        let workbook = Workbook::new(vec![
            sheet("Data", &[&["x"]]),
            Worksheet::empty("Blank").with_merged_regions(0),
        ]);
        let verdict = no_empty_sheets(&workbook, &ctx()).unwrap();
        assert!(!verdict.passed);
        assert_eq!(verdict.value, Some(1.0));
        assert_eq!(verdict.description, "Found 1 empty sheet(s)");
    }

    #[test]
    fn test_first_sheet_without_a1() {
        let workbook = Workbook::new(vec![Worksheet::new(
            "Data",
            vec![vec![CellValue::Empty, CellValue::from("B1 only")]],
        )]);

        let verdict = first_sheet_has_data(&workbook, &ctx()).unwrap();
        assert!(!verdict.passed);
        assert_eq!(verdict.description, "First sheet 'Data' has no data in A1");
    }

    #[test]
    fn test_duplicate_sheet_names() {
        let workbook = Workbook::new(vec![sheet("A", &[&["x"]]), sheet("A", &[&["y"]])]);
        let verdict = sheet_names_unique(&workbook, &ctx()).unwrap();
        assert!(!verdict.passed);
        assert_eq!(verdict.value, Some(1.0));
    }

    #[test]
    fn test_row_limit() {
        let rows = vec![vec![CellValue::from("x")]; MAX_REASONABLE_ROWS + 1];
        let workbook = Workbook::new(vec![Worksheet::new("Huge", rows)]);
        let verdict = row_count_reasonable(&workbook, &ctx()).unwrap();
        assert!(!verdict.passed);
        assert_eq!(
            verdict.description,
            "Maximum row count is 1,000,001 (exceeds limit of 1,000,000)"
        );
    }

    #[test]
    fn test_blank_headers() {
        let workbook = Workbook::new(vec![sheet("Data", &[&["  ", ""], &["value"]])]);
        let verdict = has_expected_headers(&workbook, &ctx()).unwrap();
        assert!(!verdict.passed);
        assert_eq!(verdict.value, Some(0.0));
    }

    #[test]
    fn test_merged_cells() {
        let merged = Workbook::new(vec![sheet("Data", &[&["x"]]).with_merged_regions(3)]);
        let verdict = no_merged_cells(&merged, &ctx()).unwrap();
        assert!(!verdict.passed);
        assert_eq!(verdict.value, Some(3.0));

        let unknown = Workbook::new(vec![Worksheet::new("Data", vec![vec![CellValue::from("x")]])]);
        let verdict = no_merged_cells(&unknown, &ctx()).unwrap();
        assert!(verdict.passed);
        assert_eq!(verdict.value, None);
        assert!(verdict.description.contains("skipped"));
    }
}
