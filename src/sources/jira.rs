use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::JiraConfig;
use crate::error::FetchError;
use crate::sources::{Requirement, RequirementSource};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Cliente de la API REST v3 de Jira Cloud
pub struct JiraClient {
    server: String,
    email: String,
    api_token: String,
    http: Client,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("No se pudo crear el cliente HTTP para Jira")?;

        Ok(Self {
            server: config.server.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
            http,
        })
    }

    pub fn issue_url(&self, key: &str) -> String {
        format!("{}/rest/api/3/issue/{}", self.server, key)
    }
}

impl RequirementSource for JiraClient {
    fn name(&self) -> &'static str {
        "Jira"
    }

    fn fetch(&self, key: &str) -> Result<Requirement, FetchError> {
        let url = self.issue_url(key);
        info!("Obteniendo requisito de Jira: {}", key);

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .basic_auth(&self.email, Some(&self.api_token))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::from_status(status.as_u16(), key, &body));
        }

        let issue: Value = response
            .json()
            .map_err(|e| FetchError::UnexpectedPayload(e.to_string()))?;

        Ok(requirement_from_issue(&issue))
    }
}

/// Toma `fields.description` de una incidencia de Jira.
///
/// Jira Cloud devuelve un documento ADF; Jira Server/DC puede devolver texto
/// plano. Sin descripción el requisito queda vacío.
pub fn requirement_from_issue(issue: &Value) -> Requirement {
    match issue.pointer("/fields/description") {
        Some(description @ Value::Object(_)) => {
            debug!("Descripción en formato ADF");
            Requirement::Document(description.clone())
        }
        Some(Value::String(text)) => Requirement::Text(text.clone()),
        _ => {
            debug!("La incidencia no tiene descripción");
            Requirement::Text(String::new())
        }
    }
}
