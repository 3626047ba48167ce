use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::ConfluenceConfig;
use crate::error::FetchError;
use crate::sources::{Requirement, RequirementSource};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const TEXT_WIDTH: usize = 100;

/// Etiqueta que marca el inicio de la descripción dentro de la página
pub const DESCRIPTION_LABEL: &str = "Description:";

/// Cliente de la API REST de contenido de Confluence
pub struct ConfluenceClient {
    base_url: String,
    username: String,
    api_token: String,
    http: Client,
}

impl ConfluenceClient {
    pub fn new(config: &ConfluenceConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("No se pudo crear el cliente HTTP para Confluence")?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            api_token: config.api_token.clone(),
            http,
        })
    }

    pub fn page_url(&self, page_id: &str) -> String {
        format!(
            "{}/rest/api/content/{}?expand=body.storage",
            self.base_url, page_id
        )
    }
}

impl RequirementSource for ConfluenceClient {
    fn name(&self) -> &'static str {
        "Confluence"
    }

    fn fetch(&self, page_id: &str) -> Result<Requirement, FetchError> {
        info!("Obteniendo página de Confluence: {}", page_id);

        let response = self
            .http
            .get(self.page_url(page_id))
            .header(ACCEPT, "application/json")
            .basic_auth(&self.username, Some(&self.api_token))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::from_status(status.as_u16(), page_id, &body));
        }

        let page: Value = response
            .json()
            .map_err(|e| FetchError::UnexpectedPayload(e.to_string()))?;

        requirement_from_page(&page)
    }
}

/// Extrae el requisito del cuerpo en formato storage (HTML) de la página
pub fn requirement_from_page(page: &Value) -> Result<Requirement, FetchError> {
    let storage = page
        .pointer("/body/storage/value")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            FetchError::UnexpectedPayload("la página no tiene body.storage.value".to_string())
        })?;

    Ok(Requirement::Text(storage_to_text(storage)))
}

/// Se queda con lo que sigue a "Description:" (o con toda la página) y lo pasa a texto
pub fn storage_to_text(storage: &str) -> String {
    let section = match storage.find(DESCRIPTION_LABEL) {
        Some(idx) => storage[idx + DESCRIPTION_LABEL.len()..].trim(),
        None => {
            warn!("No se encontró la sección 'Description' en la página; se usa la página completa");
            storage
        }
    };

    html_to_text(section)
}

fn html_to_text(html: &str) -> String {
    let text = html2text::from_read(html.as_bytes(), TEXT_WIDTH);

    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_url() {
        let client = ConfluenceClient::new(&ConfluenceConfig {
            url: "https://acme.atlassian.net/wiki/".into(),
            ..ConfluenceConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.page_url("3578953729"),
            "https://acme.atlassian.net/wiki/rest/api/content/3578953729?expand=body.storage"
        );
    }

    #[test]
    fn test_keeps_text_after_description_label() {
        let storage = "<h1>Pagos</h1><p>Contexto interno</p><p><strong>Description:</strong> El usuario paga con QR</p><p>Sin comisión</p>";
        let text = storage_to_text(storage);
        assert!(text.contains("El usuario paga con QR"));
        assert!(text.contains("Sin comisión"));
        assert!(!text.contains("Contexto interno"));
        assert!(!text.contains("<p>"));
    }

    #[test]
    fn test_whole_page_without_label() {
        let text = storage_to_text("<p>Primera línea</p><p>Segunda línea</p>");
        assert!(text.contains("Primera línea"));
        assert!(text.contains("Segunda línea"));
    }

    #[test]
    fn test_missing_storage_is_unexpected() {
        let err = requirement_from_page(&json!({"id": "1", "body": {}})).unwrap_err();
        assert!(matches!(err, FetchError::UnexpectedPayload(_)));
    }

    #[test]
    fn test_page_payload() {
        let page = json!({"body": {"storage": {"value": "<p>Description: Login con OTP</p>"}}});
        let requirement = requirement_from_page(&page).unwrap();
        assert_eq!(requirement.to_text(), "Login con OTP");
    }
}
