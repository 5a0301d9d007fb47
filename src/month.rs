// Month normalization
//
// Spreadsheet headers spell months in many ways ("JANEIRO", "Janeiro ",
// "janéiro", "Mar/25"). Every header is reduced to one of twelve canonical
// Portuguese names by its first three accent-stripped, lower-cased letters.
// Headers whose prefix matches nothing are kept verbatim.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::models::Cell;
use crate::utils::strip_accents;

/// One of the twelve canonical month names, ordered by the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalMonth {
    Janeiro,
    Fevereiro,
    Marco,
    Abril,
    Maio,
    Junho,
    Julho,
    Agosto,
    Setembro,
    Outubro,
    Novembro,
    Dezembro,
}

impl CanonicalMonth {
    pub const ALL: [CanonicalMonth; 12] = [
        CanonicalMonth::Janeiro,
        CanonicalMonth::Fevereiro,
        CanonicalMonth::Marco,
        CanonicalMonth::Abril,
        CanonicalMonth::Maio,
        CanonicalMonth::Junho,
        CanonicalMonth::Julho,
        CanonicalMonth::Agosto,
        CanonicalMonth::Setembro,
        CanonicalMonth::Outubro,
        CanonicalMonth::Novembro,
        CanonicalMonth::Dezembro,
    ];

    /// Canonical display name (no accents, so "Marco" rather than "Março")
    pub fn name(self) -> &'static str {
        match self {
            CanonicalMonth::Janeiro => "Janeiro",
            CanonicalMonth::Fevereiro => "Fevereiro",
            CanonicalMonth::Marco => "Marco",
            CanonicalMonth::Abril => "Abril",
            CanonicalMonth::Maio => "Maio",
            CanonicalMonth::Junho => "Junho",
            CanonicalMonth::Julho => "Julho",
            CanonicalMonth::Agosto => "Agosto",
            CanonicalMonth::Setembro => "Setembro",
            CanonicalMonth::Outubro => "Outubro",
            CanonicalMonth::Novembro => "Novembro",
            CanonicalMonth::Dezembro => "Dezembro",
        }
    }

    /// Three-letter lookup key
    pub fn prefix(self) -> &'static str {
        match self {
            CanonicalMonth::Janeiro => "jan",
            CanonicalMonth::Fevereiro => "fev",
            CanonicalMonth::Marco => "mar",
            CanonicalMonth::Abril => "abr",
            CanonicalMonth::Maio => "mai",
            CanonicalMonth::Junho => "jun",
            CanonicalMonth::Julho => "jul",
            CanonicalMonth::Agosto => "ago",
            CanonicalMonth::Setembro => "set",
            CanonicalMonth::Outubro => "out",
            CanonicalMonth::Novembro => "nov",
            CanonicalMonth::Dezembro => "dez",
        }
    }

    /// Calendar number, 1 = Janeiro
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.prefix() == prefix)
    }

    /// Exact match on the canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

impl fmt::Display for CanonicalMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A month label after normalization: either canonical or the original text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MonthName {
    Canonical(CanonicalMonth),
    Verbatim(String),
}

impl MonthName {
    pub fn as_str(&self) -> &str {
        match self {
            MonthName::Canonical(month) => month.name(),
            MonthName::Verbatim(label) => label,
        }
    }

    pub fn canonical(&self) -> Option<CanonicalMonth> {
        match self {
            MonthName::Canonical(month) => Some(*month),
            MonthName::Verbatim(_) => None,
        }
    }

    /// Interpret an already-normalized label (e.g. the month half of
    /// "Marco.Zebu"): canonical names map back to their month, anything
    /// else stays verbatim.
    pub fn from_label(label: &str) -> Self {
        match CanonicalMonth::from_name(label) {
            Some(month) => MonthName::Canonical(month),
            None => MonthName::Verbatim(label.to_string()),
        }
    }
}

impl From<CanonicalMonth> for MonthName {
    fn from(month: CanonicalMonth) -> Self {
        MonthName::Canonical(month)
    }
}

impl fmt::Display for MonthName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MonthName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Month names arriving from users are normalized like spreadsheet headers
impl<'de> Deserialize<'de> for MonthName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(canonicalize(&raw))
    }
}

/// Normalize a month header
///
/// Accents are stripped, surrounding whitespace trimmed and the text
/// lower-cased; the first three characters are then looked up among the
/// twelve month prefixes. This is a prefix match only: "january" maps to
/// Janeiro and "marte" to Marco. Unrecognized input is returned unchanged.
///
/// # Examples
///
/// ```
/// use rip_analysis::month::{canonicalize, CanonicalMonth, MonthName};
///
/// assert_eq!(canonicalize("JANEIRO"), MonthName::Canonical(CanonicalMonth::Janeiro));
/// assert_eq!(canonicalize("Março"), MonthName::Canonical(CanonicalMonth::Marco));
/// assert_eq!(canonicalize("Total"), MonthName::Verbatim("Total".to_string()));
/// ```
pub fn canonicalize(name: &str) -> MonthName {
    let normalized = strip_accents(name).trim().to_lowercase();
    let key: String = normalized.chars().take(3).collect();

    match CanonicalMonth::from_prefix(&key) {
        Some(month) => MonthName::Canonical(month),
        None => MonthName::Verbatim(name.to_string()),
    }
}

/// Normalize a header cell; non-text cells are stringified and never matched
pub fn canonicalize_cell(cell: &Cell) -> MonthName {
    match cell {
        Cell::Text(text) => canonicalize(text),
        other => MonthName::Verbatim(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_is_calendar_order() {
        let mut shuffled = vec![
            CanonicalMonth::Dezembro,
            CanonicalMonth::Marco,
            CanonicalMonth::Janeiro,
        ];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![
                CanonicalMonth::Janeiro,
                CanonicalMonth::Marco,
                CanonicalMonth::Dezembro
            ]
        );
        assert_eq!(CanonicalMonth::Janeiro.number(), 1);
        assert_eq!(CanonicalMonth::Dezembro.number(), 12);
    }

    #[test]
    fn test_canonicalize_spellings() {
        for spelling in ["JANEIRO", "Janeiro ", "janéiro", "  jan", "Jan/25"] {
            assert_eq!(
                canonicalize(spelling),
                MonthName::Canonical(CanonicalMonth::Janeiro),
                "spelling {spelling:?}"
            );
        }
    }

    #[test]
    fn test_canonicalize_every_prefix() {
        for month in CanonicalMonth::ALL {
            assert_eq!(canonicalize(month.name()), MonthName::Canonical(month));
            assert_eq!(
                canonicalize(&month.prefix().to_uppercase()),
                MonthName::Canonical(month)
            );
        }
    }

    #[test]
    fn test_canonicalize_accented_march() {
        assert_eq!(canonicalize("MARÇO").as_str(), "Marco");
        assert_eq!(canonicalize("março").as_str(), "Marco");
    }

    #[test]
    fn test_canonicalize_prefix_collision_is_accepted() {
        assert_eq!(canonicalize("january").as_str(), "Janeiro");
        assert_eq!(canonicalize("outro").as_str(), "Outubro");
    }

    #[test]
    fn test_canonicalize_unrecognized_is_identity() {
        for label in ["Total", " Média ", "Unnamed: 3", "", "ja"] {
            assert_eq!(canonicalize(label), MonthName::Verbatim(label.to_string()));
        }
    }

    #[test]
    fn test_canonicalize_cell_non_text_not_matched() {
        assert_eq!(
            canonicalize_cell(&Cell::Number(1.0)),
            MonthName::Verbatim("1".to_string())
        );
        assert_eq!(
            canonicalize_cell(&Cell::Text("Abril".to_string())),
            MonthName::Canonical(CanonicalMonth::Abril)
        );
    }

    #[test]
    fn test_month_name_from_label() {
        assert_eq!(
            MonthName::from_label("Marco"),
            MonthName::Canonical(CanonicalMonth::Marco)
        );
        assert_eq!(
            MonthName::from_label("marco"),
            MonthName::Verbatim("marco".to_string())
        );
    }

    #[test]
    fn test_month_name_serde() {
        let json = serde_json::to_string(&MonthName::Canonical(CanonicalMonth::Maio)).unwrap();
        assert_eq!(json, "\"Maio\"");

        let parsed: MonthName = serde_json::from_str("\"fevereiro\"").unwrap();
        assert_eq!(parsed, MonthName::Canonical(CanonicalMonth::Fevereiro));
    }
}
