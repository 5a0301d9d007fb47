use chrono::{DateTime, Local};
use std::fmt::Write;

use crate::models::{ComparisonTable, Selection};
use crate::month::MonthName;
use crate::pipeline::SelectionError;
use crate::render::chart::{chart_spec, chart_title};
use crate::render::table::{render_table_html, TABLE_CSS};
use crate::services::SelectionOptions;
use crate::utils::escape_html;

const VEGA_SCRIPTS: &str = r#"<script src="https://cdn.jsdelivr.net/npm/vega@5"></script>
<script src="https://cdn.jsdelivr.net/npm/vega-lite@5"></script>
<script src="https://cdn.jsdelivr.net/npm/vega-embed@6"></script>"#;

const PAGE_CSS: &str = "\
body { font-family: sans-serif; margin: 2rem; }
.warning { background: #fff8db; border-left: 4px solid #f0b400; padding: 0.6rem 1rem; margin: 1rem 0; }
.controls { display: flex; gap: 2rem; align-items: flex-start; }
.controls label { display: block; font-weight: bold; margin-bottom: 0.3rem; }
.table-wrapper { max-height: 600px; overflow: auto; }
#chart { width: 100%; }";

/// Inputs of one page render
pub struct PageContext<'a> {
    pub title: &'a str,
    pub options: &'a SelectionOptions,
    pub selection: &'a Selection,
    pub outcome: &'a Result<ComparisonTable, SelectionError>,
    /// Show the selection form (server) or a read-only summary (report)
    pub interactive: bool,
    pub generated_at: Option<DateTime<Local>>,
}

/// Render the full HTML page: controls, warnings, table and chart
pub fn render_page(ctx: &PageContext<'_>) -> String {
    let title = escape_html(ctx.title);
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n{VEGA_SCRIPTS}\n<style>\n{PAGE_CSS}\n{TABLE_CSS}\n</style>\n\
         </head>\n<body>\n<h1>📊 {title}</h1>\n"
    );

    for warning in &ctx.options.warnings {
        push_warning(&mut html, warning);
    }

    if ctx.interactive {
        render_form(&mut html, ctx.options, ctx.selection);
    } else {
        render_summary(&mut html, ctx.selection);
    }

    match ctx.outcome {
        Ok(table) => render_results(&mut html, table),
        Err(condition) => push_warning(&mut html, condition),
    }

    if let Some(at) = ctx.generated_at {
        let _ = write!(
            html,
            "<p><small>Gerado em {}</small></p>\n",
            at.format("%d/%m/%Y %H:%M")
        );
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn push_warning(html: &mut String, message: &dyn std::fmt::Display) {
    let _ = writeln!(
        html,
        "<div class=\"warning\">⚠️ {}</div>",
        escape_html(&message.to_string())
    );
}

fn render_results(html: &mut String, table: &ComparisonTable) {
    html.push_str("<h2>Tabela comparativa com múltiplos indicadores</h2>\n");
    html.push_str("<div class=\"table-wrapper\">\n");
    html.push_str(&render_table_html(table));
    html.push_str("\n</div>\n");

    if let (Some(spec), [line, bars, ..]) = (chart_spec(table), table.indicators.as_slice()) {
        let _ = writeln!(html, "<h2>{}</h2>", escape_html(&chart_title(line, bars)));
        // "</" inside a script block would end it early
        let spec = spec.to_string().replace("</", "<\\/");
        let _ = write!(
            html,
            "<div id=\"chart\"></div>\n<script>vegaEmbed('#chart', {spec}, {{actions: false}});</script>\n"
        );
    }
}

fn render_form(html: &mut String, options: &SelectionOptions, selection: &Selection) {
    html.push_str("<form method=\"get\" action=\"/\">\n<input type=\"hidden\" name=\"submitted\" value=\"1\">\n<div class=\"controls\">\n");

    let indicators: Vec<(String, bool)> = options
        .indicators
        .iter()
        .map(|i| (i.clone(), selection.indicators.contains(i)))
        .collect();
    push_select(
        html,
        "indicator",
        "Escolha indicadores para a tabela (os 2 primeiros serão usados no gráfico)",
        &indicators,
    );

    // Explicitly chosen months outside the available list stay visible
    let mut month_choices: Vec<&MonthName> = options.months.iter().collect();
    for month in &selection.months {
        if !month_choices.contains(&month) {
            month_choices.push(month);
        }
    }
    let months: Vec<(String, bool)> = month_choices
        .into_iter()
        .map(|m| (m.to_string(), selection.months.contains(m)))
        .collect();
    push_select(html, "month", "Meses", &months);

    let breeds: Vec<(String, bool)> = options
        .breeds
        .iter()
        .map(|b| (b.to_string(), selection.breeds.contains(b)))
        .collect();
    push_select(html, "breed", "Raças", &breeds);

    html.push_str("</div>\n<p><button type=\"submit\">Atualizar</button></p>\n</form>\n");
}

fn push_select(html: &mut String, name: &str, label: &str, choices: &[(String, bool)]) {
    let size = choices.len().clamp(2, 12);
    let _ = write!(
        html,
        "<div><label for=\"{name}\">{}</label>\n<select id=\"{name}\" name=\"{name}\" multiple size=\"{size}\">\n",
        escape_html(label)
    );
    for (value, selected) in choices {
        let value = escape_html(value);
        let selected = if *selected { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{value}\"{selected}>{value}</option>");
    }
    html.push_str("</select></div>\n");
}

fn render_summary(html: &mut String, selection: &Selection) {
    let join = |items: Vec<String>| escape_html(&items.join(", "));
    let _ = write!(
        html,
        "<ul>\n<li><b>Indicadores:</b> {}</li>\n<li><b>Meses:</b> {}</li>\n<li><b>Raças:</b> {}</li>\n</ul>\n",
        join(selection.indicators.clone()),
        join(selection.months.iter().map(|m| m.to_string()).collect()),
        join(selection.breeds.iter().map(|b| b.to_string()).collect()),
    );
}
