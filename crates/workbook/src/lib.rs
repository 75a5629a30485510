#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Spreadsheet access for sheetcheck
//!
//! Workbooks are loaded eagerly into an owned [`Workbook`] model. Once
//! [`DocumentReader::open`] returns, the underlying file is closed; dropping
//! the [`Workbook`] releases everything else, so every exit path of a check
//! run frees the document.

mod model;
mod reader;
mod sheet_names;

pub use model::{CellValue, Workbook, Worksheet};
pub use reader::{DocumentReader, SpreadsheetReader, SUPPORTED_EXTENSIONS};
pub use sheet_names::{Language, SheetNameMapper, SHEET_NAME_MAPPING};
