// Dual-axis chart as a Vega-Lite specification
//
// Indicator #1 is drawn as a line with point markers, indicator #2 as bars
// grouped by breed. Both layers share the month axis and keep independent
// y scales.

use serde_json::{json, Value};

use crate::models::{Breed, ComparisonTable};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

pub fn breed_color(breed: Breed) -> &'static str {
    match breed {
        Breed::Zebu => "#6BAED6",
        Breed::Hibrido => "#FDAE6B",
    }
}

/// Chart title for the first two selected indicators
pub fn chart_title(line: &str, bars: &str) -> String {
    format!("Gráfico: {line} (linha de tendência) + {bars} (barras)")
}

fn series_values(table: &ComparisonTable, indicator: &str) -> Vec<Value> {
    table
        .series(indicator)
        .into_iter()
        .map(|(month, breed, value)| {
            json!({
                "Mes": month.as_str(),
                "Raca": breed.label(),
                "Valor": value,
            })
        })
        .collect()
}

/// Build the layered chart; `None` when fewer than two indicators are selected
pub fn chart_spec(table: &ComparisonTable) -> Option<Value> {
    let [line, bars, ..] = table.indicators.as_slice() else {
        return None;
    };

    let month_order: Vec<&str> = table.months.iter().map(|m| m.as_str()).collect();
    let color_scale = json!({
        "domain": Breed::ALL.iter().map(|b| b.label()).collect::<Vec<_>>(),
        "range": Breed::ALL.iter().map(|b| breed_color(*b)).collect::<Vec<_>>(),
    });
    let tooltip = json!([
        {"field": "Mes", "type": "nominal", "title": "Mês"},
        {"field": "Raca", "type": "nominal", "title": "Raça"},
        {"field": "Valor", "type": "quantitative", "format": ".2f"},
    ]);

    let bar_layer = json!({
        "data": {"values": series_values(table, bars)},
        "mark": {"type": "bar", "opacity": 0.7},
        "encoding": {
            "x": {"field": "Mes", "type": "nominal", "sort": month_order, "title": "Mês"},
            "xOffset": {"field": "Raca", "type": "nominal", "scale": {"padding": 0.2}},
            "y": {"field": "Valor", "type": "quantitative", "title": format!("{bars} (barras)")},
            "color": {
                "field": "Raca",
                "type": "nominal",
                "scale": color_scale,
                "legend": {"title": "Raça"},
            },
            "tooltip": tooltip,
        },
    });

    let line_layer = json!({
        "data": {"values": series_values(table, line)},
        "mark": {"type": "line", "point": true, "size": 3},
        "encoding": {
            "x": {"field": "Mes", "type": "nominal", "sort": month_order},
            "y": {"field": "Valor", "type": "quantitative", "title": format!("{line} (linha)")},
            "color": {"field": "Raca", "type": "nominal", "scale": color_scale, "legend": null},
            "tooltip": tooltip,
        },
    });

    Some(json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": chart_title(line, bars),
        "width": "container",
        "height": 400,
        "layer": [bar_layer, line_layer],
        "resolve": {"scale": {"y": "independent"}},
    }))
}
