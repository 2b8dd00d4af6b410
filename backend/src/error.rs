//! Error handling for the dispatch gateway
//!
//! Provides consistent error responses in English and Spanish

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::ReconciliationError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        message_es: String,
    },

    // Request validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_es: String,
    },

    // Dispatch and settlement rules
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Back-office responses
    #[error("Back-office rejected the request: {0}")]
    UpstreamRejected(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    pub fn unauthorized(message: &str) -> Self {
        AppError::Unauthorized {
            message: message.to_string(),
            message_es: "No autorizado".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Reconciliation(
                ReconciliationError::CloseInProgress | ReconciliationError::LoadClosed,
            ) => StatusCode::CONFLICT,
            AppError::Reconciliation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UpstreamRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> ErrorDetail {
        match self {
            AppError::Unauthorized {
                message,
                message_es,
            } => ErrorDetail {
                code: "UNAUTHORIZED".to_string(),
                message_en: message.clone(),
                message_es: message_es.clone(),
                field: None,
            },
            AppError::Validation {
                field,
                message,
                message_es,
            } => ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message_en: message.clone(),
                message_es: message_es.clone(),
                field: Some(field.clone()),
            },
            AppError::Reconciliation(err) => ErrorDetail {
                code: err.code().to_string(),
                message_en: err.to_string(),
                message_es: err.message_es(),
                field: None,
            },
            AppError::NotFound(resource) => ErrorDetail {
                code: "NOT_FOUND".to_string(),
                message_en: format!("{} not found", resource),
                message_es: format!("No se encontró {}", resource),
                field: None,
            },
            AppError::Conflict(msg) => ErrorDetail {
                code: "CONFLICT".to_string(),
                message_en: msg.clone(),
                message_es: format!("Conflicto con el estado actual: {}", msg),
                field: None,
            },
            AppError::UpstreamRejected(msg) => ErrorDetail {
                code: "UPSTREAM_REJECTED".to_string(),
                message_en: format!("The back-office rejected the request: {}", msg),
                message_es: format!("El sistema central rechazó la solicitud: {}", msg),
                field: None,
            },
            AppError::ExternalService(msg) => ErrorDetail {
                code: "EXTERNAL_SERVICE_ERROR".to_string(),
                message_en: format!("External service error: {}", msg),
                message_es: format!("Error del servicio externo: {}", msg),
                field: None,
            },
            AppError::Configuration(msg) => ErrorDetail {
                code: "CONFIGURATION_ERROR".to_string(),
                message_en: format!("Configuration error: {}", msg),
                message_es: "Error de configuración del servidor".to_string(),
                field: None,
            },
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let (field, message) = field_errors
            .iter()
            .next()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            })
            .unwrap_or_else(|| ("request".to_string(), errors.to_string()));

        AppError::Validation {
            message_es: format!("El campo {} no es válido", field),
            field,
            message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_detail = self.detail();

        tracing::error!(code = %error_detail.code, status = %status, "Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
