use reqwest::blocking::Client;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::{LlmConfig, LlmProvider};
use crate::error::GenerationError;
use crate::generator::TestCaseGenerator;

const SYSTEM_PROMPT: &str = "Eres un QA Engineer senior especializado en diseñar casos de prueba. Respondes únicamente con JSON válido, sin explicaciones ni comentarios adicionales.";

/// Cliente de la API de Groq (compatible con chat completions de OpenAI)
pub struct GroqClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GroqClient {
    pub fn new(http: Client, config: &LlmConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint().to_string(),
            model: config.model().to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }

    pub fn request_body(&self, prompt: &str) -> Value {
        json!({
            "messages": [
                {
                    "role": "system",
                    "content": SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "model": self.model
        })
    }
}

impl TestCaseGenerator for GroqClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if self.api_key.is_empty() {
            return Err(GenerationError::MissingApiKey(LlmProvider::Groq.api_key_var()));
        }

        info!("Llamando a Groq ({}) para generar casos de prueba", self.model);

        let response = self
            .http
            .post(self.url())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
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

/// Contenido del primer mensaje de `choices`
pub fn parse_response(json: &Value) -> Result<String, GenerationError> {
    let content = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .ok_or_else(|| {
            GenerationError::UnexpectedPayload("la respuesta no tiene choices[0].message.content".to_string())
        })?;

    let content = content.trim();
    if content.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    debug!("Respuesta de Groq: {} caracteres", content.len());
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groq_config() -> LlmConfig {
        LlmConfig {
            provider: LlmProvider::Groq,
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_url_and_body() {
        let client = GroqClient::new(Client::new(), &groq_config());
        assert_eq!(client.url(), "https://api.groq.com/openai/v1/chat/completions");

        let body = client.request_body("genera casos");
        assert_eq!(body["model"], "llama3-8b-8192");
        assert_eq!(body["messages"][1]["content"], "genera casos");
    }

    #[test]
    fn test_missing_key() {
        let client = GroqClient::new(Client::new(), &groq_config());
        assert!(matches!(
            client.generate("x"),
            Err(GenerationError::MissingApiKey("GROQ_API_KEY"))
        ));
    }

    #[test]
    fn test_parse_choices() {
        let json = json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": " [] "}}]});
        assert_eq!(parse_response(&json).unwrap(), "[]");
    }

    #[test]
    fn test_parse_without_choices() {
        let json = json!({"choices": []});
        assert!(matches!(
            parse_response(&json),
            Err(GenerationError::UnexpectedPayload(_))
        ));
    }
}
