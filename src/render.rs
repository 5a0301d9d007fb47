// Presentation: pure mapping of comparison rows to display rows, plus the
// HTML table, chart spec and page renderers built on top of it.

pub mod chart;
pub mod page;
pub mod table;

pub use chart::chart_spec;
pub use page::{render_page, PageContext};
pub use table::{display_rows, render_table_html, DisplayRow};
