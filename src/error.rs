//! Errores de los colaboradores externos y del flujo completo.

use serde_json::Value;
use thiserror::Error;

use crate::normalizer::Rejection;

const MAX_ERROR_BODY: usize = 200;

/// Fallos al obtener el requisito (Jira, Confluence o archivo)
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No se encontró '{0}' (404)")]
    NotFound(String),

    #[error("No autorizado (HTTP {0}); revisa el usuario y el token API")]
    Unauthorized(u16),

    #[error("Error de transporte: {message}")]
    Transport { status: Option<u16>, message: String },

    #[error("Respuesta inesperada: {0}")]
    UnexpectedPayload(String),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    pub fn from_status(status: u16, resource: &str, body: &str) -> Self {
        match status {
            404 => FetchError::NotFound(resource.to_string()),
            401 | 403 => FetchError::Unauthorized(status),
            _ => FetchError::Transport {
                status: Some(status),
                message: format!("HTTP {}: {}", status, error_message(body)),
            },
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

/// Fallos del servicio del modelo de lenguaje, distintos de un rechazo de la respuesta
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Falta la clave API; configura {0}")]
    MissingApiKey(&'static str),

    #[error("El servicio del modelo rechazó la clave API (HTTP {0})")]
    Unauthorized(u16),

    #[error("Cuota agotada en el servicio del modelo: {0}")]
    Quota(String),

    #[error("El servicio del modelo respondió HTTP {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Error de red con el servicio del modelo: {0}")]
    Transport(String),

    #[error("El modelo devolvió una respuesta vacía")]
    EmptyResponse,

    #[error("Respuesta inesperada del servicio del modelo: {0}")]
    UnexpectedPayload(String),
}

impl GenerationError {
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = error_message(body);
        match status {
            401 | 403 => GenerationError::Unauthorized(status),
            429 => GenerationError::Quota(message),
            _ => GenerationError::Service { status, message },
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::Transport(e.to_string())
    }
}

/// Fallos al escribir o leer la hoja
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Nombre de hoja inválido: '{0}'")]
    InvalidSheetName(String),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error de CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("No autorizado para escribir en la hoja (HTTP {0})")]
    Unauthorized(u16),

    #[error("Error de transporte con la hoja: {message}")]
    Transport { status: Option<u16>, message: String },
}

impl StoreError {
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => StoreError::Unauthorized(status),
            _ => StoreError::Transport {
                status: Some(status),
                message: format!("HTTP {}: {}", status, error_message(body)),
            },
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Transport {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

/// Error del flujo requisito → modelo → hoja; conserva el origen para que quien llama decida
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Extrae un mensaje legible del cuerpo de una respuesta de error
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(message) = json.pointer("/error/message").and_then(Value::as_str) {
            return message.to_string();
        }
        if let Some(messages) = json.get("errorMessages").and_then(Value::as_array) {
            let joined = messages
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            if !joined.is_empty() {
                return joined;
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "sin detalle".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY).collect()
}
