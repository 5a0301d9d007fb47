use std::sync::Arc;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::services::{AnalysisService, Dataset};

/// Application with the spawned HTTP server
///
/// The dataset is loaded once in `build` and shared read-only by every
/// request.
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
}

impl Application {
    /// Load the workbook and start the HTTP server
    ///
    /// A missing or unreadable workbook aborts startup.
    pub async fn build(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Loading workbook {}", config.workbook_path.display());

        let path = config.workbook_path.clone();
        let dataset = tokio::task::spawn_blocking(move || Dataset::load(path)).await??;
        for warning in &dataset.warnings {
            warn!("{}", warning);
        }
        info!(
            "Dataset ready: {} indicators, {} months, {} records",
            dataset.indicators().len(),
            dataset.months().len(),
            dataset.records.len()
        );

        let analysis_service = AnalysisService::new(Arc::new(dataset));
        let app_state = AppState {
            analysis_service,
            title: config.report_title.clone(),
        };
        let app = create_router(app_state).layer(TraceLayer::new_for_http());

        let addr = config.server_addr();
        info!("Starting HTTP server on {}", addr);

        let server_handle = tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await
        });

        Ok(Self { server_handle })
    }

    /// Run until the server stops
    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}
