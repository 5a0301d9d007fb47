use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::models::Cell;

#[derive(Error, Debug)]
pub enum WorkbookImportError {
    #[error("Arquivo '{}' não foi encontrado", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    #[error("Workbook has no worksheets")]
    NoSheets,

    #[error("Failed to read first worksheet: {0}")]
    SheetRead(String),

    #[error("First worksheet has no header row")]
    EmptySheet,
}

/// Header row plus data rows of the first worksheet
///
/// All rows have the same width as the header.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub header: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Build a table, padding short rows with empty cells
    pub fn new(header: Vec<Cell>, rows: Vec<Vec<Cell>>) -> Self {
        let width = header.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { header, rows }
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Drop data rows that are entirely blank and columns whose data cells
    /// are entirely blank (header cells are not considered).
    ///
    /// Both sets are computed on the original table and applied once.
    pub fn drop_blank(self) -> Self {
        let width = self.width();
        let keep_columns: Vec<bool> = (0..width)
            .map(|col| {
                self.rows
                    .iter()
                    .any(|row| row.get(col).is_some_and(|cell| !cell.is_blank()))
            })
            .collect();

        let rows_before = self.rows.len();
        let rows: Vec<Vec<Cell>> = self
            .rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.is_blank()))
            .map(|row| retain_columns(row, &keep_columns))
            .collect();
        let header = retain_columns(self.header, &keep_columns);

        debug!(
            "Dropped {} blank rows and {} blank columns",
            rows_before - rows.len(),
            width - header.len()
        );

        Self { header, rows }
    }
}

fn retain_columns(row: Vec<Cell>, keep: &[bool]) -> Vec<Cell> {
    row.into_iter()
        .zip(keep)
        .filter_map(|(cell, keep)| keep.then_some(cell))
        .collect()
}

/// Reader for the monthly indicator workbook (first sheet, first row as header)
pub struct WorkbookImporter {
    workbook_path: PathBuf,
}

impl WorkbookImporter {
    pub fn new(workbook_path: impl Into<PathBuf>) -> Self {
        Self {
            workbook_path: workbook_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.workbook_path
    }

    /// Load the first worksheet and drop blank rows and columns
    ///
    /// # Expected Sheet Structure:
    /// ```text
    /// Row 1: Indicador | Janeiro | (Zebu) | Fevereiro | (Zebu) | ...
    /// Row 2+: <indicator name> | hybrid value | zebu value | ...
    /// ```
    #[instrument(skip(self), fields(path = %self.workbook_path.display()))]
    pub fn load_first_sheet(&self) -> Result<RawTable, WorkbookImportError> {
        if !self.workbook_path.is_file() {
            return Err(WorkbookImportError::NotFound(self.workbook_path.clone()));
        }

        // Synchronous; async callers should use spawn_blocking
        let mut workbook = open_workbook_auto(&self.workbook_path)
            .map_err(|e| WorkbookImportError::WorkbookOpen(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or(WorkbookImportError::NoSheets)?
            .map_err(|e| WorkbookImportError::SheetRead(e.to_string()))?;

        let table = Self::range_to_table(&range)?;
        info!(
            "Loaded first sheet: {} columns, {} data rows",
            table.width(),
            table.rows.len()
        );

        Ok(table.drop_blank())
    }

    fn range_to_table(range: &Range<Data>) -> Result<RawTable, WorkbookImportError> {
        let mut rows = range.rows();
        let header: Vec<Cell> = rows
            .next()
            .ok_or(WorkbookImportError::EmptySheet)?
            .iter()
            .map(convert_cell)
            .collect();

        if header.is_empty() {
            return Err(WorkbookImportError::EmptySheet);
        }

        let data = rows
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();

        Ok(RawTable::new(header, data))
    }
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Empty => Cell::Empty,
        other => Cell::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_workbook_importer_creation() {
        let importer = WorkbookImporter::new("rip.xlsx");
        assert_eq!(importer.path(), Path::new("rip.xlsx"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let importer = WorkbookImporter::new("/nonexistent/rip.xlsx");
        match importer.load_first_sheet() {
            Err(WorkbookImportError::NotFound(path)) => {
                assert_eq!(path, PathBuf::from("/nonexistent/rip.xlsx"));
            }
            other => panic!("Expected NotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_table_pads_short_rows() {
        let table = RawTable::new(
            vec![text("Indicador"), text("Jan"), text("")],
            vec![vec![text("Peso")]],
        );
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[0][2], Cell::Empty);
    }

    #[test]
    fn test_drop_blank_rows_and_columns() {
        let table = RawTable::new(
            vec![text("Indicador"), text("Jan"), text("Vazia"), text("")],
            vec![
                vec![text("Peso"), Cell::Number(1.0), Cell::Empty, Cell::Number(2.0)],
                vec![Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty],
                vec![text("GMD"), Cell::Empty, text(""), Cell::Number(3.0)],
            ],
        )
        .drop_blank();

        assert_eq!(table.header, vec![text("Indicador"), text("Jan"), text("")]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.rows[1],
            vec![text("GMD"), Cell::Empty, Cell::Number(3.0)]
        );
    }

    #[test]
    fn test_drop_blank_tolerates_unpadded_rows() {
        let table = RawTable {
            header: vec![text("Indicador"), text("Jan"), text("")],
            rows: vec![vec![text("Peso")], vec![text("GMD"), Cell::Number(2.0)]],
        }
        .drop_blank();

        assert_eq!(table.header, vec![text("Indicador"), text("Jan")]);
        assert_eq!(table.rows[0], vec![text("Peso")]);
        assert_eq!(table.rows[1], vec![text("GMD"), Cell::Number(2.0)]);
    }

    #[test]
    fn test_convert_cell_variants() {
        assert_eq!(convert_cell(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(convert_cell(&Data::Float(1.25)), Cell::Number(1.25));
        assert_eq!(convert_cell(&Data::String("x".into())), text("x"));
        assert_eq!(convert_cell(&Data::Bool(false)), Cell::Bool(false));
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
    }
}
