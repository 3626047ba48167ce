//! Validación y normalización de la respuesta del modelo.
//!
//! La respuesta no es de confianza: o se convierte completa en un
//! `TestCaseBatch`, o se rechaza con el texto original como diagnóstico.
//! Nunca se devuelven lotes parciales.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::{TestCaseBatch, TestCaseRecord, MAX_TEST_CASES};

const KEY_ID: &str = "Test Case ID";
const KEY_DESCRIPTION: &str = "Description";
const KEY_PRECONDITIONS: &str = "Preconditions";
const KEY_STEPS: &str = "Steps";
const KEY_EXPECTED: &str = "Expected Results";

/// Delimitadores del bloque de código con el que el modelo puede envolver el JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FenceConfig {
    #[serde(default = "default_fence_open")]
    pub open: String,
    #[serde(default = "default_fence_close")]
    pub close: String,
}

fn default_fence_open() -> String {
    "```json".to_string()
}

fn default_fence_close() -> String {
    "```".to_string()
}

impl Default for FenceConfig {
    fn default() -> Self {
        Self {
            open: default_fence_open(),
            close: default_fence_close(),
        }
    }
}

/// Motivo por el que se rechaza la respuesta del modelo
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("La respuesta del modelo no es JSON válido: {reason}")]
    MalformedJson { raw: String, reason: String },

    #[error("La respuesta del modelo no es una lista de objetos: {reason}")]
    InvalidShape { raw: String, reason: String },
}

impl Rejection {
    /// Texto original de la respuesta, para diagnóstico
    pub fn raw(&self) -> &str {
        match self {
            Rejection::MalformedJson { raw, .. } | Rejection::InvalidShape { raw, .. } => raw,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResponseNormalizer {
    fence: FenceConfig,
    max_cases: usize,
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self::new(FenceConfig::default(), MAX_TEST_CASES)
    }
}

impl ResponseNormalizer {
    /// `max_cases` nunca supera `MAX_TEST_CASES`
    pub fn new(fence: FenceConfig, max_cases: usize) -> Self {
        Self {
            fence,
            max_cases: max_cases.min(MAX_TEST_CASES),
        }
    }

    pub fn max_cases(&self) -> usize {
        self.max_cases
    }

    /// Convierte la respuesta cruda del modelo en un lote de casos de prueba
    pub fn normalize(&self, raw: &str) -> Result<TestCaseBatch, Rejection> {
        let body = self.strip_fence(raw);

        let parsed: Value = serde_json::from_str(body).map_err(|e| {
            warn!("No se pudo interpretar la respuesta como JSON: {}", e);
            Rejection::MalformedJson {
                raw: raw.to_string(),
                reason: e.to_string(),
            }
        })?;

        let items = validate_shape(&parsed).map_err(|reason| {
            warn!("Respuesta con forma inválida: {}", reason);
            Rejection::InvalidShape {
                raw: raw.to_string(),
                reason,
            }
        })?;

        if items.len() > self.max_cases {
            debug!(
                "Se descartan {} casos por encima del límite de {}",
                items.len() - self.max_cases,
                self.max_cases
            );
        }

        let records = items
            .into_iter()
            .take(self.max_cases)
            .enumerate()
            .map(|(idx, item)| build_record(idx + 1, item))
            .collect();

        Ok(TestCaseBatch::new(records))
    }

    /// Quita exactamente un delimitador inicial y uno final, si el texto empieza con él
    pub fn strip_fence<'a>(&self, raw: &'a str) -> &'a str {
        let trimmed = raw.trim();
        if self.fence.open.is_empty() {
            return trimmed;
        }

        match trimmed.strip_prefix(self.fence.open.as_str()) {
            Some(rest) => {
                if self.fence.close.is_empty() {
                    rest
                } else {
                    rest.strip_suffix(self.fence.close.as_str()).unwrap_or(rest)
                }
            }
            None => trimmed,
        }
    }
}

/// Normaliza con los delimitadores y el límite por defecto
pub fn normalize(raw: &str) -> Result<TestCaseBatch, Rejection> {
    ResponseNormalizer::default().normalize(raw)
}

fn validate_shape(value: &Value) -> Result<Vec<&Map<String, Value>>, String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("se esperaba una lista y llegó {}", kind_of(value)))?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            item.as_object().ok_or_else(|| {
                format!(
                    "el elemento {} es {}, no un objeto",
                    idx + 1,
                    kind_of(item)
                )
            })
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "un booleano",
        Value::Number(_) => "un número",
        Value::String(_) => "un texto",
        Value::Array(_) => "una lista",
        Value::Object(_) => "un objeto",
    }
}

fn build_record(position: usize, item: &Map<String, Value>) -> TestCaseRecord {
    let id = item
        .get(KEY_ID)
        .and_then(scalar_to_string)
        // Un ID null o en blanco se trata igual que uno ausente
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("TC_{:04}", position));

    let description = item
        .get(KEY_DESCRIPTION)
        .and_then(scalar_to_string)
        .unwrap_or_default();

    TestCaseRecord::new(
        id,
        description,
        to_string_list(item.get(KEY_PRECONDITIONS)),
        to_string_list(item.get(KEY_STEPS)),
        to_string_list(item.get(KEY_EXPECTED)),
    )
}

// Textos tal cual; cualquier otro valor no nulo con su representación JSON.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn to_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(other) => scalar_to_string(other).into_iter().collect(),
    }
}
