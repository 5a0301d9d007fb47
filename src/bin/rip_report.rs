use chrono::Local;
use clap::Parser;
use rip_analysis::config::{DEFAULT_REPORT_TITLE, DEFAULT_WORKBOOK_PATH};
use rip_analysis::models::{Breed, Selection};
use rip_analysis::month::canonicalize;
use rip_analysis::render::{render_page, PageContext};
use rip_analysis::services::{AnalysisService, Dataset};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "rip-report")]
#[command(about = "Render a standalone HTML comparison of RIP indicators by month and breed", long_about = None)]
struct Cli {
    /// Workbook with the monthly indicators (first sheet is read)
    #[arg(long, env = "RIP_WORKBOOK_PATH", default_value = DEFAULT_WORKBOOK_PATH)]
    file: PathBuf,

    /// Indicator to compare; repeat for more. The first two are charted.
    /// Defaults to the first two indicators in the sheet.
    #[arg(short, long = "indicator")]
    indicators: Vec<String>,

    /// Month to include, any spelling ("mar", "Março"); repeat for more.
    /// Row order follows the order given. Defaults to every month present.
    #[arg(short, long = "month")]
    months: Vec<String>,

    /// Breed to include (Zebu, Hibrido); repeat for more. Defaults to both.
    #[arg(short, long = "breed")]
    breeds: Vec<Breed>,

    /// Page title
    #[arg(long, env = "RIP_REPORT_TITLE", default_value = DEFAULT_REPORT_TITLE)]
    title: String,

    /// Where to write the HTML report
    #[arg(short, long, default_value = "rip_report.html")]
    output: PathBuf,

    /// Print the available indicators and months and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let dataset = match Dataset::load(&cli.file) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };
    for warning in &dataset.warnings {
        warn!("{}", warning);
    }

    let service = AnalysisService::new(Arc::new(dataset));
    let options = service.options();

    if cli.list {
        println!("Indicadores:");
        for indicator in &options.indicators {
            println!("  {indicator}");
        }
        println!("Meses:");
        for month in &options.months {
            println!("  {month}");
        }
        return Ok(());
    }

    let defaults = &options.defaults;
    let selection = Selection {
        indicators: if cli.indicators.is_empty() {
            defaults.indicators.clone()
        } else {
            cli.indicators
        },
        months: if cli.months.is_empty() {
            defaults.months.clone()
        } else {
            cli.months.iter().map(|m| canonicalize(m)).collect()
        },
        breeds: if cli.breeds.is_empty() {
            defaults.breeds.clone()
        } else {
            cli.breeds
        },
    };
    info!("Rendering report for {:?}", selection);

    let outcome = service.compare(&selection);
    if let Err(condition) = &outcome {
        // Guidance, not a failure: the report still shows the message
        warn!("{}", condition);
    }

    let html = render_page(&PageContext {
        title: &cli.title,
        options: &options,
        selection: &selection,
        outcome: &outcome,
        interactive: false,
        generated_at: Some(Local::now()),
    });
    std::fs::write(&cli.output, html)?;

    info!("Report written to {}", cli.output.display());
    println!("✅ Report written to {}", cli.output.display());
    Ok(())
}
