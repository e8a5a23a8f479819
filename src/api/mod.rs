use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Json, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::AppConfig;
use crate::core::{
    BatchSummary, ConcernId, ConcernInstance, ConcernOption, DiagnosisResult, ProjectionYear,
    Rating, Round, Scenario, run_batch,
};
use crate::error::AppError;

const DEFAULT_BATCH_ROUNDS: usize = 1_000;

#[derive(Debug, Clone)]
pub struct ApiState {
    pub batch_limit: usize,
}

impl From<&AppConfig> for ApiState {
    fn from(config: &AppConfig) -> Self {
        Self {
            batch_limit: config.batch_limit,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// A fresh round as the player first sees it: no applicability, no evidence.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResponse<'a> {
    pub scenario: &'a Scenario,
    pub projection: &'a [ProjectionYear],
    pub concern_options: Vec<ConcernOption>,
}

impl<'a> RoundResponse<'a> {
    pub fn new(round: &'a Round) -> Self {
        Self {
            scenario: &round.scenario,
            projection: &round.projection,
            concern_options: Round::concern_options(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProjectionResponse {
    projection: Vec<ProjectionYear>,
}

#[derive(Debug, Serialize)]
struct ConcernsResponse {
    concerns: Vec<ConcernInstance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosisPayload {
    scenario: Scenario,
    #[serde(default)]
    selected_concern_ids: Vec<String>,
}

/// Scored diagnosis plus the whole catalog, so false positives can be shown
/// next to their evidence.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResponse {
    #[serde(flatten)]
    pub result: DiagnosisResult,
    pub rating: Rating,
    pub rating_label: &'static str,
    pub perfect: bool,
    pub concerns: Vec<ConcernInstance>,
}

impl DiagnosisResponse {
    pub fn new(round: &Round, selected: &BTreeSet<ConcernId>) -> Self {
        let result = round.diagnose(selected);
        let rating = result.rating();
        Self {
            rating,
            rating_label: rating.label(),
            perfect: result.is_perfect(),
            concerns: round.concerns(),
            result,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct BatchParams {
    rounds: Option<usize>,
}

/// Parses wire identifiers; duplicates collapse, unknown ids are an error.
pub fn parse_concern_ids<S: AsRef<str>>(ids: &[S]) -> Result<BTreeSet<ConcernId>, AppError> {
    ids.iter()
        .map(|id| id.as_ref().parse::<ConcernId>().map_err(AppError::from))
        .collect()
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/api/round", get(round_handler))
        .route("/api/projection", post(projection_handler))
        .route("/api/concerns", post(concerns_handler))
        .route("/api/diagnosis", post(diagnosis_handler))
        .route("/api/batch", get(batch_handler))
        .fallback(not_found_handler)
        .with_state(Arc::new(state))
}

pub async fn run_http_server(addr: SocketAddr, state: ApiState) -> Result<(), AppError> {
    let app = router(state);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "reality check API listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn round_handler() -> Response {
    let round = Round::generate();
    json_response(StatusCode::OK, RoundResponse::new(&round))
}

async fn projection_handler(
    payload: Result<Json<Scenario>, JsonRejection>,
) -> Result<Response, AppError> {
    let scenario = scenario_from_body(payload)?;
    let round = Round::new(scenario);
    Ok(json_response(
        StatusCode::OK,
        ProjectionResponse {
            projection: round.projection,
        },
    ))
}

async fn concerns_handler(
    payload: Result<Json<Scenario>, JsonRejection>,
) -> Result<Response, AppError> {
    let round = Round::new(scenario_from_body(payload)?);
    Ok(json_response(
        StatusCode::OK,
        ConcernsResponse {
            concerns: round.concerns(),
        },
    ))
}

async fn diagnosis_handler(
    payload: Result<Json<DiagnosisPayload>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::InvalidBody(rejection.body_text()))?;
    payload.scenario.validate()?;
    let selected = parse_concern_ids(payload.selected_concern_ids.as_slice())?;

    let round = Round::new(payload.scenario);
    Ok(json_response(
        StatusCode::OK,
        DiagnosisResponse::new(&round, &selected),
    ))
}

async fn batch_handler(
    State(state): State<Arc<ApiState>>,
    params: Result<Query<BatchParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(params) = params.map_err(|rejection| AppError::InvalidBody(rejection.body_text()))?;
    let limit = state.batch_limit;
    let rounds = params.rounds.unwrap_or(DEFAULT_BATCH_ROUNDS.min(limit));
    if rounds == 0 || rounds > limit {
        return Err(AppError::BatchSize {
            requested: rounds,
            limit,
        });
    }

    let summary: BatchSummary =
        tokio::task::spawn_blocking(move || run_batch(rounds, &mut rand::thread_rng())).await?;
    Ok(json_response(StatusCode::OK, summary))
}

fn scenario_from_body(payload: Result<Json<Scenario>, JsonRejection>) -> Result<Scenario, AppError> {
    let Json(scenario) = payload.map_err(|rejection| AppError::InvalidBody(rejection.body_text()))?;
    scenario.validate()?;
    Ok(scenario)
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
