use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::importers::{RawTable, WorkbookImportError, WorkbookImporter};
use crate::models::{Breed, ComparisonTable, LongRecord, Selection};
use crate::month::{CanonicalMonth, MonthName};
use crate::pipeline::{map_column_pairs, pivot, reshape, LoadWarning, SelectionError};
use crate::render::chart;

/// Read-only snapshot of the sheet, loaded once at startup
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Header of the identifier column, verbatim
    pub indicator_column: String,
    /// Renamed header (`Indicador`, `Janeiro.Hibrido`, `Janeiro.Zebu`, ...)
    pub columns: Vec<String>,
    pub records: Vec<LongRecord>,
    pub warnings: Vec<LoadWarning>,
}

impl Dataset {
    /// Load the first worksheet of `path` and reshape it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorkbookImportError> {
        let table = WorkbookImporter::new(path.as_ref()).load_first_sheet()?;
        Ok(Self::from_table(&table))
    }

    /// Rename columns in pairs and melt the table into long-form records
    pub fn from_table(table: &RawTable) -> Self {
        let mapping = map_column_pairs(&table.header);
        let records = reshape(table, &mapping);

        Self {
            columns: mapping.column_names(),
            indicator_column: mapping.indicator_column,
            records,
            warnings: mapping.warnings,
        }
    }

    /// Distinct indicator names, sorted
    pub fn indicators(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.indicator.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Canonical months present in the data, in calendar order
    pub fn months(&self) -> Vec<MonthName> {
        let present: BTreeSet<CanonicalMonth> = self
            .records
            .iter()
            .filter_map(|r| r.month.canonical())
            .collect();
        present.into_iter().map(MonthName::Canonical).collect()
    }

    /// First two indicators, every available month, both breeds
    pub fn default_selection(&self) -> Selection {
        Selection {
            indicators: self.indicators().into_iter().take(2).collect(),
            months: self.months(),
            breeds: Breed::ALL.to_vec(),
        }
    }
}

/// Everything a client needs to build the selection controls
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SelectionOptions {
    pub indicators: Vec<String>,
    #[schema(value_type = Vec<String>)]
    pub months: Vec<MonthName>,
    pub breeds: Vec<Breed>,
    pub defaults: Selection,
    pub warnings: Vec<LoadWarning>,
}

#[derive(Clone)]
pub struct AnalysisService {
    dataset: Arc<Dataset>,
}

impl AnalysisService {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn options(&self) -> SelectionOptions {
        SelectionOptions {
            indicators: self.dataset.indicators(),
            months: self.dataset.months(),
            breeds: Breed::ALL.to_vec(),
            defaults: self.dataset.default_selection(),
            warnings: self.dataset.warnings.clone(),
        }
    }

    /// Build the comparison table for a selection
    #[instrument(skip(self))]
    pub fn compare(&self, selection: &Selection) -> Result<ComparisonTable, SelectionError> {
        let table = pivot(
            &self.dataset.records,
            &selection.indicators,
            &selection.months,
            &selection.breeds,
        )?;
        info!(
            "Comparison ready: {} rows x {} indicators",
            table.rows.len(),
            table.indicators.len()
        );
        Ok(table)
    }

    /// Vega-Lite spec of the line + bar chart for a selection
    pub fn chart(&self, selection: &Selection) -> Result<serde_json::Value, SelectionError> {
        let table = self.compare(selection)?;
        chart::chart_spec(&table).ok_or(SelectionError::NeedsMoreSelection {
            selected: table.indicators.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn dataset() -> Dataset {
        let table = RawTable::new(
            vec![
                text("Indicador"),
                text("Março"),
                text(""),
                text("Janeiro"),
                text(""),
            ],
            vec![
                vec![
                    text("Peso"),
                    Cell::Number(1.0),
                    Cell::Number(2.0),
                    Cell::Number(3.0),
                    Cell::Number(4.0),
                ],
                vec![
                    text("Conversão"),
                    Cell::Number(5.0),
                    Cell::Empty,
                    Cell::Number(6.0),
                    Cell::Number(7.0),
                ],
                vec![
                    text("Área"),
                    Cell::Number(8.0),
                    Cell::Number(9.0),
                    Cell::Empty,
                    Cell::Empty,
                ],
            ],
        );
        Dataset::from_table(&table)
    }

    #[test]
    fn test_dataset_columns_renamed() {
        let data = dataset();
        assert_eq!(
            data.columns,
            vec![
                "Indicador",
                "Marco.Hibrido",
                "Marco.Zebu",
                "Janeiro.Hibrido",
                "Janeiro.Zebu"
            ]
        );
        assert_eq!(data.records.len(), 12);
    }

    #[test]
    fn test_indicators_sorted() {
        assert_eq!(dataset().indicators(), vec!["Conversão", "Peso", "Área"]);
    }

    #[test]
    fn test_months_in_calendar_order() {
        let months: Vec<String> = dataset().months().iter().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["Janeiro", "Marco"]);
    }

    #[test]
    fn test_default_selection() {
        let defaults = dataset().default_selection();
        assert_eq!(defaults.indicators, vec!["Conversão", "Peso"]);
        assert_eq!(defaults.months.len(), 2);
        assert_eq!(defaults.breeds, vec![Breed::Zebu, Breed::Hibrido]);
    }

    #[test]
    fn test_compare_defaults() {
        let service = AnalysisService::new(Arc::new(dataset()));
        let table = service.compare(&service.options().defaults).unwrap();

        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[0].month.as_str(), "Janeiro");
        assert_eq!(table.rows[0].breed, Breed::Hibrido);
        assert_eq!(table.rows[0].values, vec![Some(6.0), Some(3.0)]);
    }

    #[test]
    fn test_chart_requires_two_indicators() {
        let service = AnalysisService::new(Arc::new(dataset()));
        let selection = Selection {
            indicators: vec!["Peso".to_string()],
            ..service.options().defaults
        };
        assert!(matches!(
            service.chart(&selection),
            Err(SelectionError::NeedsMoreSelection { selected: 1 })
        ));
    }
}
