use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::models::{Breed, Cell};
use crate::month::{canonicalize_cell, MonthName};

/// Recoverable problem found while loading the sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadWarning {
    /// Month columns must come in (Hibrido, Zebu) pairs; the odd one out is ignored
    OddMonthColumnCount { dropped_column: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::OddMonthColumnCount { .. } => f.write_str(
                "Número de colunas de meses é ímpar. A última coluna será ignorada.",
            ),
        }
    }
}

/// Renamed header: the indicator column plus `<Month>.<Breed>` columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub indicator_column: String,
    /// One name per raw month column that survived pairing, in sheet order
    pub month_columns: Vec<String>,
    pub warnings: Vec<LoadWarning>,
}

impl ColumnMapping {
    /// Full header, identifier column first
    pub fn column_names(&self) -> Vec<String> {
        std::iter::once(self.indicator_column.clone())
            .chain(self.month_columns.iter().cloned())
            .collect()
    }
}

/// Rename the header of a wide sheet
///
/// The first cell names the indicator column. The remaining cells are read as
/// consecutive pairs, hybrid first and zebu second; each pair is named after
/// the normalized month of its first cell, or `Unnamed: <position>` when that
/// cell is blank. The pairing is positional and the second header of each pair
/// is never inspected. An odd trailing column is dropped with a warning.
pub fn map_column_pairs(header: &[Cell]) -> ColumnMapping {
    let indicator_column = header.first().map(Cell::to_string).unwrap_or_default();
    let mut month_cells = header.get(1..).unwrap_or_default();
    let mut warnings = Vec::new();

    if let Some((last, rest)) = month_cells
        .split_last()
        .filter(|_| month_cells.len() % 2 != 0)
    {
        warn!(
            "Odd number of month columns ({}), ignoring last column '{}'",
            month_cells.len(),
            last
        );
        warnings.push(LoadWarning::OddMonthColumnCount {
            dropped_column: last.to_string(),
        });
        month_cells = rest;
    }

    let mut month_columns = Vec::with_capacity(month_cells.len());
    for (index, pair) in month_cells.chunks_exact(2).enumerate() {
        let month = if pair[0].is_blank() {
            MonthName::Verbatim(format!("Unnamed: {}", 1 + 2 * index))
        } else {
            canonicalize_cell(&pair[0])
        };
        debug!("Month block '{}' -> {}", pair[0], month);
        month_columns.push(format!("{}.{}", month, Breed::Hibrido.label()));
        month_columns.push(format!("{}.{}", month, Breed::Zebu.label()));
    }

    ColumnMapping {
        indicator_column,
        month_columns,
        warnings,
    }
}
