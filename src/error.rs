use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::config::ConfigError;
use crate::core::{ScenarioError, UnknownConcernId};
use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("invalid scenario: {0}")]
    Scenario(#[from] ScenarioError),
    #[error(transparent)]
    UnknownConcern(#[from] UnknownConcernId),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("rounds must be between 1 and {limit}, got {requested}")]
    BatchSize { requested: usize, limit: usize },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Scenario(_)
            | AppError::UnknownConcern(_)
            | AppError::InvalidBody(_)
            | AppError::BatchSize { .. } => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Encode(_)
            | AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, [(header::CACHE_CONTROL, "no-store")], body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_mistakes_map_to_bad_request() {
        let err = AppError::from(UnknownConcernId("nope".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "unknown concern id 'nope'");

        let err = AppError::from(ScenarioError::NoSchoolTime);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("invalid scenario: "));

        let err = AppError::BatchSize {
            requested: 0,
            limit: 100,
        };
        assert_eq!(err.to_string(), "rounds must be between 1 and 100, got 0");
    }

    #[tokio::test]
    async fn failed_background_task_is_an_internal_error() {
        let join_err = tokio::task::spawn_blocking(|| -> usize { panic!("batch worker died") })
            .await
            .expect_err("task panicked");
        let err = AppError::from(join_err);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("background task failed"));
    }

    #[test]
    fn server_faults_map_to_internal_error() {
        let err = AppError::from(ConfigError::InvalidPort("x".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(&b"no-store"[..])
        );
    }
}
