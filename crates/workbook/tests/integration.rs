//! Integration tests for the spreadsheet reader

#[cfg(test)]
mod tests {
    use sheetcheck_errors::DocumentError;
    use sheetcheck_workbook::*;
    use std::io::Write;
    use std::path::Path;
    use tempfile::{tempdir, NamedTempFile};
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

    const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Auswertung" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

    const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

    /// Used range B2:C3 with B2:C2 merged
    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><dimension ref="B2:C3"/><sheetData><row r="2"><c r="B2" t="inlineStr"><is><t>Kennzahl</t></is></c></row><row r="3"><c r="B3" t="b"><v>1</v></c><c r="C3"><v>42.5</v></c></row></sheetData><mergeCells count="1"><mergeCell ref="B2:C2"/></mergeCells></worksheet>"#;

    fn write_xlsx(path: &Path) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, body) in [
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", ROOT_RELS),
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/worksheets/sheet1.xml", SHEET),
        ] {
            zip.start_file(name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_used_range_is_anchored_at_a1() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("INS1_report.xlsx");
        write_xlsx(&path);

        let workbook = SpreadsheetReader::new().open(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Auswertung"]);

        let sheet = workbook.first_sheet().unwrap();
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.rows()[0], Vec::<CellValue>::new());
        assert_eq!(sheet.cell(1, 0), Some(&CellValue::Empty));
        assert_eq!(sheet.cell(1, 1), Some(&CellValue::String("Kennzahl".into())));
        assert_eq!(sheet.cell(1, 2), Some(&CellValue::Empty));
        assert_eq!(sheet.cell(2, 0), Some(&CellValue::Empty));
        assert_eq!(sheet.cell(2, 1), Some(&CellValue::Bool(true)));
        assert_eq!(sheet.cell(2, 2), Some(&CellValue::Float(42.5)));
        assert_eq!(sheet.cell(3, 1), None);
        assert!(sheet.has_data_within(2));
        assert!(!sheet.has_data_within(1));
    }

    #[test]
    fn test_merged_regions_are_counted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("INS1_report.xlsx");
        write_xlsx(&path);

        let workbook = SpreadsheetReader::new().open(&path).unwrap();
        assert_eq!(workbook.sheet("Auswertung").unwrap().merged_regions(), Some(1));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("INS1_missing.xlsx");

        let err = SpreadsheetReader::new().open(&path).unwrap_err();
        assert!(matches!(err, DocumentError::NotFound { .. }));
    }

    #[test]
    fn test_wrong_extension_is_unsupported() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(b"a,b,c\n").unwrap();

        let err = SpreadsheetReader::new().open(file.path()).unwrap_err();
        match err {
            DocumentError::UnsupportedFormat { extension, .. } => assert_eq!(extension, "csv"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_garbage_bytes_are_corrupt() {
        let mut file = NamedTempFile::with_suffix(".xlsx").unwrap();
        file.write_all(b"this is not a zip archive").unwrap();

        let err = SpreadsheetReader::new().open(file.path()).unwrap_err();
        assert!(matches!(err, DocumentError::Corrupt { .. }));
    }
}
