use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::month::MonthName;
use crate::utils::strip_accents;

// Raw spreadsheet cell, decoupled from the workbook reader
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Dates, error cells and other values kept only in printed form
    Other(String),
    Empty,
}

impl Cell {
    /// Blank cells count as missing when dropping empty rows and columns
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Numeric value of the cell, if it has one
    ///
    /// Numeric text is accepted with either `.` or `,` as decimal separator.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed
                    .replace(',', ".")
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
            }
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Other(text) => f.write_str(text),
            Cell::Empty => Ok(()),
        }
    }
}

/// Cattle breed group; every indicator is split by these two
///
/// Declaration order is the secondary sort key of comparison rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
pub enum Breed {
    Hibrido,
    Zebu,
}

impl Breed {
    /// Default selection order
    pub const ALL: [Breed; 2] = [Breed::Zebu, Breed::Hibrido];

    pub fn label(self) -> &'static str {
        match self {
            Breed::Hibrido => "Hibrido",
            Breed::Zebu => "Zebu",
        }
    }

    /// Exact label match, as used when parsing column suffixes
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Hibrido" => Some(Breed::Hibrido),
            "Zebu" => Some(Breed::Zebu),
            _ => None,
        }
    }
}

impl fmt::Display for Breed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown breed: {0} (expected Zebu or Hibrido)")]
pub struct UnknownBreed(pub String);

/// Lenient parsing for user input: case and accents are ignored
impl FromStr for Breed {
    type Err = UnknownBreed;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match strip_accents(s).trim().to_lowercase().as_str() {
            "hibrido" => Ok(Breed::Hibrido),
            "zebu" => Ok(Breed::Zebu),
            _ => Err(UnknownBreed(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Breed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// One (indicator, month, breed, value) fact from the melted spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRecord {
    pub indicator: String,
    pub month: MonthName,
    pub breed: Breed,
    pub value: Option<f64>,
}

/// User choice of indicators, months and breeds
///
/// Indicator order matters: the first two drive the chart. Month order is
/// the row order of the comparison table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Selection {
    pub indicators: Vec<String>,
    #[schema(value_type = Vec<String>)]
    pub months: Vec<MonthName>,
    pub breeds: Vec<Breed>,
}

/// One (month, breed) row with a value per selected indicator
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ComparisonRow {
    #[schema(value_type = String)]
    pub month: MonthName,
    pub breed: Breed,
    /// Aligned with `ComparisonTable::indicators`, rounded to 2 decimals
    pub values: Vec<Option<f64>>,
}

/// Wide comparison table produced by the pivot
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ComparisonTable {
    pub indicators: Vec<String>,
    #[schema(value_type = Vec<String>)]
    pub months: Vec<MonthName>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn column_of(&self, indicator: &str) -> Option<usize> {
        self.indicators.iter().position(|i| i == indicator)
    }

    /// Value of `indicator` in `row`, `None` if blank or not selected
    pub fn value(&self, row: &ComparisonRow, indicator: &str) -> Option<f64> {
        self.column_of(indicator)
            .and_then(|col| row.values.get(col).copied().flatten())
    }

    /// (month, breed, value) triples of one indicator, in row order
    pub fn series(&self, indicator: &str) -> Vec<(&MonthName, Breed, Option<f64>)> {
        self.rows
            .iter()
            .map(|row| (&row.month, row.breed, self.value(row, indicator)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::CanonicalMonth;

    #[test]
    fn test_cell_is_blank() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::Text(String::new()).is_blank());
        assert!(!Cell::Text(" ".to_string()).is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }

    #[test]
    fn test_cell_as_number() {
        assert_eq!(Cell::Number(10.456).as_number(), Some(10.456));
        assert_eq!(Cell::Text(" 12,5 ".to_string()).as_number(), Some(12.5));
        assert_eq!(Cell::Text("n/a".to_string()).as_number(), None);
        assert_eq!(Cell::Bool(true).as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
    }

    #[test]
    fn test_breed_ordering_and_labels() {
        assert!(Breed::Hibrido < Breed::Zebu);
        assert_eq!(Breed::from_label("Zebu"), Some(Breed::Zebu));
        assert_eq!(Breed::from_label("zebu"), None);
        assert_eq!(Breed::from_label("Nelore"), None);
    }

    #[test]
    fn test_breed_from_str_lenient() {
        assert_eq!("híbrido".parse::<Breed>().unwrap(), Breed::Hibrido);
        assert_eq!(" ZEBU ".parse::<Breed>().unwrap(), Breed::Zebu);
        assert!("Angus".parse::<Breed>().is_err());
    }

    #[test]
    fn test_breed_deserialize_matches_from_str() {
        let breeds: Vec<Breed> = serde_json::from_str(r#"["zebu", "HÍBRIDO", "Zebu"]"#).unwrap();
        assert_eq!(breeds, vec![Breed::Zebu, Breed::Hibrido, Breed::Zebu]);
        assert!(serde_json::from_str::<Breed>(r#""Angus""#).is_err());
        assert_eq!(serde_json::to_string(&Breed::Hibrido).unwrap(), r#""Hibrido""#);
    }

    #[test]
    fn test_comparison_table_lookup() {
        let table = ComparisonTable {
            indicators: vec!["Peso".to_string(), "GMD".to_string()],
            months: vec![CanonicalMonth::Janeiro.into()],
            rows: vec![ComparisonRow {
                month: CanonicalMonth::Janeiro.into(),
                breed: Breed::Zebu,
                values: vec![Some(1.5), None],
            }],
        };

        let row = &table.rows[0];
        assert_eq!(table.value(row, "Peso"), Some(1.5));
        assert_eq!(table.value(row, "GMD"), None);
        assert_eq!(table.value(row, "Outro"), None);
        assert_eq!(table.series("Peso").len(), 1);
    }
}
