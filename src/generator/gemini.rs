use reqwest::blocking::Client;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::{LlmConfig, LlmProvider};
use crate::error::GenerationError;
use crate::generator::TestCaseGenerator;

/// Cliente de `generateContent` de la API de Gemini
pub struct GeminiClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(http: Client, config: &LlmConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint().to_string(),
            model: config.model().to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl TestCaseGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if self.api_key.is_empty() {
            return Err(GenerationError::MissingApiKey(
                LlmProvider::Gemini.api_key_var(),
            ));
        }

        info!("Llamando a Gemini ({}) para generar casos de prueba", self.model);

        let response = self
            .http
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(prompt))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::from_status(status.as_u16(), &body));
        }

        let json: Value = response
            .json()
            .map_err(|e| GenerationError::UnexpectedPayload(e.to_string()))?;

        parse_response(&json)
    }
}

pub fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [
            {
                "parts": [{ "text": prompt }]
            }
        ]
    })
}

/// Une el texto de todas las partes del primer candidato
pub fn parse_response(json: &Value) -> Result<String, GenerationError> {
    let Some(candidate) = json.pointer("/candidates/0") else {
        let reason = json
            .pointer("/promptFeedback/blockReason")
            .and_then(Value::as_str)
            .map(|r| format!("prompt bloqueado ({})", r))
            .unwrap_or_else(|| "la respuesta no tiene candidatos".to_string());
        return Err(GenerationError::UnexpectedPayload(reason));
    };

    let parts = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            let finish = candidate
                .get("finishReason")
                .and_then(Value::as_str)
                .unwrap_or("desconocido");
            GenerationError::UnexpectedPayload(format!(
                "el candidato no tiene contenido (finishReason: {})",
                finish
            ))
        })?;

    let text = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect::<String>();

    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    debug!("Respuesta de Gemini: {} caracteres", text.len());
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_uses_model_and_endpoint() {
        let client = GeminiClient::new(Client::new(), &LlmConfig::default());
        assert_eq!(
            client.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_missing_key_fails_before_request() {
        let client = GeminiClient::new(Client::new(), &LlmConfig::default());
        assert!(matches!(
            client.generate("prompt"),
            Err(GenerationError::MissingApiKey("GEMINI_API_KEY"))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let body = request_body("hola");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hola");
    }

    #[test]
    fn test_parse_joins_parts() {
        let json = json!({"candidates": [{"content": {"role": "model", "parts": [
            {"text": "```json\n[{\"Description\": "},
            {"text": "\"x\"}]\n```\n"}
        ]}, "finishReason": "STOP"}]});

        assert_eq!(
            parse_response(&json).unwrap(),
            "```json\n[{\"Description\": \"x\"}]\n```"
        );
    }

    #[test]
    fn test_parse_blocked_prompt() {
        let json = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let err = parse_response(&json).unwrap_err();
        assert!(matches!(err, GenerationError::UnexpectedPayload(ref m) if m.contains("SAFETY")));
    }

    #[test]
    fn test_parse_empty_text() {
        let json = json!({"candidates": [{"content": {"parts": [{"text": "  "}]}}]});
        assert!(matches!(parse_response(&json), Err(GenerationError::EmptyResponse)));
    }
}
