use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::models::{Breed, ComparisonRow, ComparisonTable, LongRecord};
use crate::month::MonthName;
use crate::utils::round2;

/// The chart needs two indicators (line + bars)
pub const MIN_INDICATORS: usize = 2;

/// Expected, user-correctable outcomes of a selection
///
/// Neither is a failure of the program; callers show the message as
/// guidance and skip rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Selecione pelo menos dois indicadores para gerar o gráfico.")]
    NeedsMoreSelection { selected: usize },

    #[error("Nenhum dado corresponde aos filtros selecionados.")]
    EmptyResult,
}

impl SelectionError {
    pub fn code(&self) -> &'static str {
        match self {
            SelectionError::NeedsMoreSelection { .. } => "needs_more_selection",
            SelectionError::EmptyResult => "empty_result",
        }
    }
}

/// Filter long records by the selection and pivot them into a comparison table
///
/// Rows are the full union of (month, breed) keys found for any selected
/// indicator; an indicator without a record for a key gets a blank cell.
/// Rows are ordered by the position of their month in `months` (not the
/// calendar), then by breed. Values are rounded to two decimals.
///
/// Repeated indicators or months in the selection count once. When the
/// sheet holds two records for the same (indicator, month, breed), the
/// first one wins.
#[instrument(skip(records), fields(records = records.len()))]
pub fn pivot(
    records: &[LongRecord],
    indicators: &[String],
    months: &[MonthName],
    breeds: &[Breed],
) -> Result<ComparisonTable, SelectionError> {
    let indicators = dedup(indicators);
    if indicators.len() < MIN_INDICATORS {
        debug!("Only {} indicators selected", indicators.len());
        return Err(SelectionError::NeedsMoreSelection {
            selected: indicators.len(),
        });
    }
    let months = dedup(months);

    let indicator_column: HashMap<&str, usize> = indicators
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    let month_position: HashMap<&MonthName, usize> =
        months.iter().enumerate().map(|(i, m)| (m, i)).collect();

    // (month position, breed) -> per-indicator slot; outer None = no record
    let mut cells: BTreeMap<(usize, Breed), Vec<Option<Option<f64>>>> = BTreeMap::new();
    for record in records {
        let Some(&column) = indicator_column.get(record.indicator.as_str()) else {
            continue;
        };
        let Some(&position) = month_position.get(&record.month) else {
            continue;
        };
        if !breeds.contains(&record.breed) {
            continue;
        }

        let slots = cells
            .entry((position, record.breed))
            .or_insert_with(|| vec![None; indicators.len()]);
        if slots[column].is_none() {
            slots[column] = Some(record.value);
        } else {
            warn!(
                "Duplicate value for {} / {} / {}, keeping the first",
                record.indicator, record.month, record.breed
            );
        }
    }

    if cells.is_empty() {
        debug!("No records match the selection");
        return Err(SelectionError::EmptyResult);
    }

    let rows: Vec<ComparisonRow> = cells
        .into_iter()
        .map(|((position, breed), slots)| ComparisonRow {
            month: months[position].clone(),
            breed,
            values: slots
                .into_iter()
                .map(|slot| slot.flatten().map(round2))
                .collect(),
        })
        .collect();

    info!(
        "Pivoted {} indicators into {} comparison rows",
        indicators.len(),
        rows.len()
    );

    Ok(ComparisonTable {
        indicators,
        months,
        rows,
    })
}

/// Remove repeats, keeping the first occurrence
fn dedup<T: Clone + PartialEq>(items: &[T]) -> Vec<T> {
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(item) {
            unique.push(item.clone());
        }
    }
    unique
}
