use std::fmt::Write;

use crate::models::{Breed, ComparisonTable};
use crate::utils::{escape_html, format_value};

pub const MONTH_HEADER: &str = "Mês";
pub const BREED_HEADER: &str = "Raça";

/// Row striping colour per breed
pub fn breed_background(breed: Breed) -> &'static str {
    match breed {
        Breed::Zebu => "#e6f2ff",
        Breed::Hibrido => "#fff2e6",
    }
}

/// A comparison row ready for display: two-decimal strings, blanks for nulls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub month: String,
    pub breed: Breed,
    pub cells: Vec<String>,
    pub background: &'static str,
}

pub fn display_rows(table: &ComparisonTable) -> Vec<DisplayRow> {
    table
        .rows
        .iter()
        .map(|row| DisplayRow {
            month: row.month.to_string(),
            breed: row.breed,
            cells: row.values.iter().map(|v| format_value(*v)).collect(),
            background: breed_background(row.breed),
        })
        .collect()
}

/// Styles shared by every rendered table
pub const TABLE_CSS: &str = "\
table.comparison { border-collapse: collapse; }
table.comparison th { text-align: center; background-color: #f2f2f2; color: black; padding: 4px 10px; }
table.comparison td { text-align: center; color: black; padding: 4px 10px; }";

/// Render the comparison table as an HTML `<table>`
pub fn render_table_html(table: &ComparisonTable) -> String {
    let mut html = String::from("<table class=\"comparison\">\n<thead><tr>");
    let _ = write!(html, "<th>{MONTH_HEADER}</th><th>{BREED_HEADER}</th>");
    for indicator in &table.indicators {
        let _ = write!(html, "<th>{}</th>", escape_html(indicator));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in display_rows(table) {
        let _ = write!(
            html,
            "<tr style=\"background-color: {};\"><td>{}</td><td>{}</td>",
            row.background,
            escape_html(&row.month),
            row.breed
        );
        for cell in &row.cells {
            let _ = write!(html, "<td>{cell}</td>");
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>");
    html
}
