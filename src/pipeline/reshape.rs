use tracing::{debug, info};

use crate::importers::RawTable;
use crate::models::{Breed, LongRecord};
use crate::month::MonthName;
use crate::pipeline::ColumnMapping;

/// Split a renamed column on its first `.` into (month, breed label)
pub fn split_column_name(name: &str) -> Option<(&str, &str)> {
    name.split_once('.')
}

/// Melt the wide sheet into one record per (indicator, month column)
///
/// Only columns whose breed suffix is exactly `Hibrido` or `Zebu` produce
/// records. Rows with a blank indicator cell are skipped since they can
/// never be selected. Blank or non-numeric values become null records so
/// the (month, breed) key still exists for the indicator.
pub fn reshape(table: &RawTable, mapping: &ColumnMapping) -> Vec<LongRecord> {
    // Parse the header once; unusable columns map to None
    let keys: Vec<Option<(MonthName, Breed)>> = mapping
        .month_columns
        .iter()
        .map(|name| {
            let (month, breed) = split_column_name(name)?;
            Some((MonthName::from_label(month), Breed::from_label(breed)?))
        })
        .collect();

    let skipped_columns = keys.iter().filter(|k| k.is_none()).count();
    if skipped_columns > 0 {
        debug!("{} columns have no recognized breed suffix", skipped_columns);
    }

    let mut records = Vec::with_capacity(table.rows.len() * keys.len());
    for (row_idx, row) in table.rows.iter().enumerate() {
        let Some(indicator_cell) = row.first() else {
            continue;
        };
        if indicator_cell.is_blank() {
            debug!("Row {} has no indicator name, skipping", row_idx);
            continue;
        }
        let indicator = indicator_cell.to_string();

        for (col_idx, key) in keys.iter().enumerate() {
            let Some((month, breed)) = key else {
                continue;
            };
            let cell = row.get(col_idx + 1);
            let value = cell.and_then(|c| c.as_number());
            if let Some(c) = cell.filter(|c| !c.is_blank() && value.is_none()) {
                debug!(
                    "Non-numeric value '{}' for {} / {} / {}, treating as blank",
                    c, indicator, month, breed
                );
            }

            records.push(LongRecord {
                indicator: indicator.clone(),
                month: month.clone(),
                breed: *breed,
                value,
            });
        }
    }

    info!(
        "Reshaped {} rows into {} long-form records",
        table.rows.len(),
        records.len()
    );
    records
}
