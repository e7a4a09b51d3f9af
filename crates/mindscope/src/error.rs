use crate::assessment::{
    AssessmentServiceError, BulkError, CacheError, CatalogError, ConfigurationError, SessionError,
};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Catalog(CatalogError),
    Scoring(ConfigurationError),
    Assessment(AssessmentServiceError),
    Session(SessionError),
    Cache(CacheError),
    Bulk(BulkError),
    Input(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Catalog(err) => write!(f, "catalog error: {}", err),
            AppError::Scoring(err) => write!(f, "scoring configuration error: {}", err),
            AppError::Assessment(err) => write!(f, "assessment error: {}", err),
            AppError::Session(err) => write!(f, "session error: {}", err),
            AppError::Cache(err) => write!(f, "cache error: {}", err),
            AppError::Bulk(err) => write!(f, "bulk input error: {}", err),
            AppError::Input(err) => write!(f, "invalid input: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Assessment(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::Cache(err) => Some(err),
            AppError::Bulk(err) => Some(err),
            AppError::Input(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Assessment(AssessmentServiceError::NoResults) => StatusCode::NOT_FOUND,
            AppError::Assessment(AssessmentServiceError::Cache(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Assessment(_)
            | AppError::Session(_)
            | AppError::Bulk(_)
            | AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Catalog(_)
            | AppError::Scoring(_)
            | AppError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<ConfigurationError> for AppError {
    fn from(value: ConfigurationError) -> Self {
        Self::Scoring(value)
    }
}

impl From<AssessmentServiceError> for AppError {
    fn from(value: AssessmentServiceError) -> Self {
        Self::Assessment(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<CacheError> for AppError {
    fn from(value: CacheError) -> Self {
        Self::Cache(value)
    }
}

impl From<BulkError> for AppError {
    fn from(value: BulkError) -> Self {
        Self::Bulk(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Input(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        let response = AppError::from(AssessmentServiceError::NoAnswers).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::from(SessionError::Empty).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_results_map_to_not_found() {
        let response = AppError::from(AssessmentServiceError::NoResults).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn load_failures_are_internal() {
        let response = AppError::from(CatalogError::BlankCategory).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let err = AppError::from(ConfigurationError::BlankCategoryKey);
        assert!(err.to_string().starts_with("scoring configuration error"));
    }
}
