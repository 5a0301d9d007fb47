// ! Spreadsheet importer for the monthly indicator workbook

pub mod workbook_importer;

// Re-export commonly used items
pub use workbook_importer::{RawTable, WorkbookImportError, WorkbookImporter};
