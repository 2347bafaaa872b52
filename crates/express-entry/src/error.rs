use crate::config::ConfigError;
use crate::express_entry::{AssessmentServiceError, RepositoryError};
use crate::pnp::CatalogueImportError;
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
    Document(serde_json::Error),
    Assessment(AssessmentServiceError),
    Catalogue(CatalogueImportError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Document(err) => write!(f, "profile document error: {}", err),
            AppError::Assessment(err) => write!(f, "assessment error: {}", err),
            AppError::Catalogue(err) => write!(f, "catalogue error: {}", err),
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
            AppError::Document(err) => Some(err),
            AppError::Assessment(err) => Some(err),
            AppError::Catalogue(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Assessment(AssessmentServiceError::InvalidInput(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Assessment(AssessmentServiceError::Repository(RepositoryError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Document(_) | AppError::Catalogue(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Assessment(_) => StatusCode::INTERNAL_SERVER_ERROR,
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

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Document(value)
    }
}

impl From<AssessmentServiceError> for AppError {
    fn from(value: AssessmentServiceError) -> Self {
        Self::Assessment(value)
    }
}

impl From<CatalogueImportError> for AppError {
    fn from(value: CatalogueImportError) -> Self {
        Self::Catalogue(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::express_entry::{InvalidInput, InvalidInputReason};
    use std::error::Error;

    #[test]
    fn invalid_profile_maps_to_unprocessable_entity() {
        let invalid = InvalidInput {
            field: "age".to_string(),
            reason: InvalidInputReason::AgeOutOfRange { age: 0 },
        };
        let error = AppError::from(AssessmentServiceError::from(invalid));

        assert!(error.source().is_some());
        assert_eq!(error.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn missing_profile_maps_to_not_found() {
        let error = AppError::from(AssessmentServiceError::from(RepositoryError::NotFound));
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn catalogue_failures_are_client_errors() {
        let error = AppError::from(CatalogueImportError::DuplicateProgram("on-001".to_string()));
        assert!(error.to_string().starts_with("catalogue error:"));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
