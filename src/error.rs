//! Error types for the Biblioteca admin client

use reqwest::StatusCode;
use thiserror::Error;

use crate::notice::Notice;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join(", "))
    }
}

impl AppError {
    /// Build an error from a non-success HTTP status and its body
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => AppError::Authentication(body),
            StatusCode::FORBIDDEN => AppError::Authorization(body),
            StatusCode::NOT_FOUND => AppError::NotFound(body),
            _ => AppError::Api { status, message: body },
        }
    }

    /// True when the backend rejected the session token
    pub fn is_session_rejected(&self) -> bool {
        matches!(self, AppError::Authentication(_))
    }

    /// User-facing notification for this error
    pub fn notice(&self) -> Notice {
        match self {
            AppError::Validation(msg) => Notice::error(format!("Formulario inválido: {}", msg)),
            AppError::InvalidCredentials => Notice::error(
                "Credenciales incorrectas. Por favor, verifique sus credenciales e inténtelo nuevamente.",
            ),
            AppError::Authentication(_) | AppError::Authorization(_) => {
                Notice::error("Su sesión no es válida. Inicie sesión nuevamente.")
            }
            AppError::NotFound(_) => Notice::error("El registro solicitado no existe."),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                Notice::error("No se pudo guardar la sesión.")
            }
            AppError::Config(e) => {
                tracing::error!("Configuration error: {:?}", e);
                Notice::error("Configuración inválida.")
            }
            AppError::Unexpected(_)
            | AppError::Api { .. }
            | AppError::Http(_)
            | AppError::Serialization(_) => Notice::error(
                "Ocurrió un error inesperado. Por favor, inténtelo nuevamente más tarde.",
            ),
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
