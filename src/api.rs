use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use utoipa::{OpenApi, ToSchema};

use crate::models::{Breed, ComparisonRow, ComparisonTable, Selection};
use crate::month::canonicalize;
use crate::pipeline::{LoadWarning, SelectionError};
use crate::render::{render_page, PageContext};
use crate::services::{AnalysisService, SelectionOptions};

#[derive(Clone)]
pub struct AppState {
    pub analysis_service: AnalysisService,
    pub title: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Body returned when a selection cannot be rendered
#[derive(Debug, Serialize, ToSchema)]
pub struct ConditionResponse {
    /// `needs_more_selection` or `empty_result`
    pub condition: String,
    pub message: String,
}

impl From<&SelectionError> for ConditionResponse {
    fn from(error: &SelectionError) -> Self {
        Self {
            condition: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

type ConditionRejection = (StatusCode, Json<ConditionResponse>);

fn reject(error: SelectionError) -> ConditionRejection {
    warn!("Selection rejected: {}", error);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ConditionResponse::from(&error)),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(health, get_options, post_comparison, post_chart),
    components(schemas(
        HealthResponse,
        ConditionResponse,
        SelectionOptions,
        Selection,
        ComparisonTable,
        ComparisonRow,
        Breed,
        LoadWarning
    )),
    tags((name = "rip", description = "Monthly livestock weighing indicators by breed"))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/options", get(get_options))
        .route("/comparison", post(post_comparison))
        .route("/chart", post(post_chart));

    Router::new()
        .route("/", get(index))
        .nest("/api/v1", api_routes)
        .with_state(state)
}

/// Build a selection from the page query string
///
/// Keys are repeated per value (`?indicator=a&indicator=b`). Without the
/// `submitted` marker, keys that are absent fall back to the defaults; once
/// the form has been submitted an absent key means nothing was chosen.
/// Unknown breeds and parameters are ignored.
pub fn selection_from_query(query: Option<&str>, defaults: &Selection) -> Selection {
    let mut submitted = false;
    let mut indicators = Vec::new();
    let mut months = Vec::new();
    let mut breeds = Vec::new();
    let (mut has_indicators, mut has_months, mut has_breeds) = (false, false, false);

    for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        match key.as_ref() {
            "submitted" => submitted = true,
            "indicator" => {
                has_indicators = true;
                indicators.push(value.into_owned());
            }
            "month" => {
                has_months = true;
                months.push(canonicalize(&value));
            }
            "breed" => {
                has_breeds = true;
                match value.parse::<Breed>() {
                    Ok(breed) => breeds.push(breed),
                    Err(e) => debug!("{}, ignoring", e),
                }
            }
            other => debug!("Ignoring query parameter '{}'", other),
        }
    }

    Selection {
        indicators: if submitted || has_indicators {
            indicators
        } else {
            defaults.indicators.clone()
        },
        months: if submitted || has_months {
            months
        } else {
            defaults.months.clone()
        },
        breeds: if submitted || has_breeds {
            breeds
        } else {
            defaults.breeds.clone()
        },
    }
}

#[instrument(skip(state))]
async fn index(State(state): State<AppState>, RawQuery(query): RawQuery) -> Html<String> {
    let options = state.analysis_service.options();
    let selection = selection_from_query(query.as_deref(), &options.defaults);
    debug!("Rendering page for {:?}", selection);

    let outcome = state.analysis_service.compare(&selection);
    if let Err(condition) = &outcome {
        info!("Page rendered without results: {}", condition);
    }

    Html(render_page(&PageContext {
        title: &state.title,
        options: &options,
        selection: &selection,
        outcome: &outcome,
        interactive: true,
        generated_at: None,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "rip",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
#[instrument(skip(_state))]
async fn health(State(_state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    let response = HealthResponse {
        status: "healthy".to_string(),
    };
    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/options",
    tag = "rip",
    responses((status = 200, description = "Available choices and defaults", body = SelectionOptions))
)]
#[instrument(skip(state))]
async fn get_options(State(state): State<AppState>) -> Json<SelectionOptions> {
    let options = state.analysis_service.options();
    info!(
        "Options: {} indicators, {} months",
        options.indicators.len(),
        options.months.len()
    );
    Json(options)
}

#[utoipa::path(
    post,
    path = "/api/v1/comparison",
    tag = "rip",
    request_body = Selection,
    responses(
        (status = 200, description = "Comparison table", body = ComparisonTable),
        (status = 422, description = "Too few indicators or no matching data", body = ConditionResponse)
    )
)]
#[instrument(skip(state))]
async fn post_comparison(
    State(state): State<AppState>,
    Json(selection): Json<Selection>,
) -> Result<Json<ComparisonTable>, ConditionRejection> {
    let table = state
        .analysis_service
        .compare(&selection)
        .map_err(reject)?;
    Ok(Json(table))
}

#[utoipa::path(
    post,
    path = "/api/v1/chart",
    tag = "rip",
    request_body = Selection,
    responses(
        (status = 200, description = "Vega-Lite specification of the line + bar chart"),
        (status = 422, description = "Too few indicators or no matching data", body = ConditionResponse)
    )
)]
#[instrument(skip(state))]
async fn post_chart(
    State(state): State<AppState>,
    Json(selection): Json<Selection>,
) -> Result<Json<serde_json::Value>, ConditionRejection> {
    let spec = state.analysis_service.chart(&selection).map_err(reject)?;
    Ok(Json(spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::{CanonicalMonth, MonthName};

    fn defaults() -> Selection {
        Selection {
            indicators: vec!["A".to_string(), "B".to_string()],
            months: vec![CanonicalMonth::Janeiro.into(), CanonicalMonth::Fevereiro.into()],
            breeds: Breed::ALL.to_vec(),
        }
    }

    #[test]
    fn test_no_query_uses_defaults() {
        assert_eq!(selection_from_query(None, &defaults()), defaults());
        assert_eq!(selection_from_query(Some(""), &defaults()), defaults());
    }

    #[test]
    fn test_partial_query_fills_defaults() {
        let selection = selection_from_query(Some("month=mar%C3%A7o&month=JAN"), &defaults());
        assert_eq!(selection.indicators, defaults().indicators);
        assert_eq!(
            selection.months,
            vec![
                MonthName::Canonical(CanonicalMonth::Marco),
                MonthName::Canonical(CanonicalMonth::Janeiro)
            ]
        );
        assert_eq!(selection.breeds, Breed::ALL.to_vec());
    }

    #[test]
    fn test_submitted_form_empty_means_none() {
        let selection = selection_from_query(
            Some("submitted=1&indicator=Ganho+de+Peso&breed=Zebu&breed=Angus"),
            &defaults(),
        );
        assert_eq!(selection.indicators, vec!["Ganho de Peso"]);
        assert!(selection.months.is_empty());
        assert_eq!(selection.breeds, vec![Breed::Zebu]);
    }

    #[test]
    fn test_condition_response() {
        let body = ConditionResponse::from(&SelectionError::EmptyResult);
        assert_eq!(body.condition, "empty_result");
        assert!(body.message.starts_with("Nenhum dado"));
    }

    #[test]
    fn test_openapi_lists_paths() {
        let spec = generate_openapi_spec();
        let json = serde_json::to_value(&spec).unwrap();
        assert!(json["paths"]["/api/v1/comparison"]["post"].is_object());
        assert!(json["paths"]["/api/v1/options"]["get"].is_object());
    }
}
