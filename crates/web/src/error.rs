use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use storage::services::competition_lifecycle::LifecycleError;
use storage::services::time_registration::RegistrationError;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Lifecycle(LifecycleError),
    Registration(RegistrationError),
    BadRequest(String),
    Unauthorized,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Lifecycle(e) => write!(f, "Lifecycle error: {}", e),
            Self::Registration(e) => write!(f, "Registration error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

const INTERNAL_ERROR: &str = "An internal error occurred";

impl WebError {
    fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            Self::Storage(StorageError::NotFound) => {
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }
            Self::Storage(StorageError::ConstraintViolation(msg)) => {
                (StatusCode::CONFLICT, msg.clone())
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
            Self::Lifecycle(LifecycleError::NotFound) => {
                (StatusCode::NOT_FOUND, "Competition not found".to_string())
            }
            Self::Lifecycle(LifecycleError::Storage(e)) => {
                tracing::error!("Storage error during competition transition: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
            Self::Lifecycle(e) => (StatusCode::CONFLICT, e.to_string()),
            Self::Registration(RegistrationError::TeamNotFound(_)) => {
                (StatusCode::BAD_REQUEST, "Equipo no existe.".to_string())
            }
            Self::Registration(RegistrationError::NotAuthorized(_)) => (
                StatusCode::FORBIDDEN,
                "No autorizado para enviar registros para este equipo.".to_string(),
            ),
            Self::Registration(RegistrationError::MissingFields) => (
                StatusCode::BAD_REQUEST,
                RegistrationError::MissingFields.to_string(),
            ),
            Self::Registration(RegistrationError::Storage(e)) => {
                tracing::error!("Storage error during time registration: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status_code, detail) = self.status_and_detail();
        let mut body = json!({ "detail": detail });

        if let Self::Lifecycle(e) = &self {
            body["code"] = json!(e.code());
            if let LifecycleError::AnotherCompetitionRunning { id, name } = e {
                body["competition"] = json!({ "competition_id": id, "name": name });
            }
        }

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<LifecycleError> for WebError {
    fn from(error: LifecycleError) -> Self {
        Self::Lifecycle(error)
    }
}

impl From<RegistrationError> for WebError {
    fn from(error: RegistrationError) -> Self {
        Self::Registration(error)
    }
}
