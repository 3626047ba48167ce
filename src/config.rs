//! Configuración de testgen.
//!
//! Se lee de un archivo TOML (o se usan los valores por defecto) y luego las
//! credenciales se sobrescriben con variables de entorno.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::MAX_TEST_CASES;
use crate::normalizer::FenceConfig;

/// Archivo que se busca en el directorio actual si no se indica otro
pub const DEFAULT_CONFIG_FILE: &str = "testgen.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub confluence: ConfluenceConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub sheet: SheetConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraConfig {
    #[serde(default = "default_jira_server")]
    pub server: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub api_token: String,
}

fn default_jira_server() -> String {
    "https://your-domain.atlassian.net".to_string()
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            server: default_jira_server(),
            email: String::new(),
            api_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfluenceConfig {
    #[serde(default = "default_confluence_url")]
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub api_token: String,
}

fn default_confluence_url() -> String {
    "https://your-domain.atlassian.net/wiki".to_string()
}

impl Default for ConfluenceConfig {
    fn default() -> Self {
        Self {
            url: default_confluence_url(),
            username: String::new(),
            api_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Gemini,
    Groq,
}

impl LlmProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini-1.5-flash",
            LlmProvider::Groq => "llama3-8b-8192",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            LlmProvider::Groq => "https://api.groq.com/openai/v1",
        }
    }

    /// Variable de entorno con la clave API del proveedor
    pub fn api_key_var(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "GEMINI_API_KEY",
            LlmProvider::Groq => "GROQ_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    /// Si se omite se usa el modelo por defecto del proveedor
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_test_cases")]
    pub max_test_cases: usize,
    #[serde(default)]
    pub fence: FenceConfig,
}

fn default_llm_timeout() -> u64 {
    120
}

fn default_max_test_cases() -> usize {
    MAX_TEST_CASES
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: None,
            endpoint: None,
            api_key: String::new(),
            timeout_secs: default_llm_timeout(),
            max_test_cases: default_max_test_cases(),
            fence: FenceConfig::default(),
        }
    }
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
            .trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetBackend {
    #[default]
    Csv,
    Google,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    #[serde(default)]
    pub backend: SheetBackend,
    /// Hoja por defecto cuando no se indica `--sheet`
    #[serde(default = "default_sheet_name")]
    pub name: String,
    /// Directorio de las hojas CSV
    #[serde(default = "default_sheet_directory")]
    pub directory: PathBuf,
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default)]
    pub access_token: String,
}

fn default_sheet_name() -> String {
    "test_cases".to_string()
}

fn default_sheet_directory() -> PathBuf {
    PathBuf::from("sheets")
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            backend: SheetBackend::default(),
            name: default_sheet_name(),
            directory: default_sheet_directory(),
            spreadsheet_id: String::new(),
            access_token: String::new(),
        }
    }
}

impl Config {
    /// Carga la configuración y aplica las variables de entorno
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("Sin archivo de configuración; usando valores por defecto");
                Self::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("No se pudo leer la configuración {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Configuración inválida en {}", path.display()))?;
        info!("Configuración cargada desde {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Sobrescribe las credenciales con las variables presentes y no vacías
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = var("JIRA_EMAIL") {
            self.jira.email = v;
        }
        if let Some(v) = var("JIRA_API_TOKEN") {
            self.jira.api_token = v;
        }
        if let Some(v) = var("CONFLUENCE_USERNAME") {
            self.confluence.username = v;
        }
        if let Some(v) = var("CONFLUENCE_API_TOKEN") {
            self.confluence.api_token = v;
        }
        if let Some(v) = var(self.llm.provider.api_key_var()) {
            self.llm.api_key = v;
        }
        if let Some(v) = var("GOOGLE_SHEETS_ACCESS_TOKEN") {
            self.sheet.access_token = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.llm.provider, LlmProvider::Gemini);
        assert_eq!(config.llm.model(), "gemini-1.5-flash");
        assert_eq!(config.llm.max_test_cases, MAX_TEST_CASES);
        assert_eq!(config.llm.fence, FenceConfig::default());
        assert_eq!(config.sheet.backend, SheetBackend::Csv);
        assert_eq!(config.sheet.directory, PathBuf::from("sheets"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
[jira]
server = "https://acme.atlassian.net"

[llm]
provider = "groq"
endpoint = "https://proxy.local/v1/"

[llm.fence]
open = "~~~json"

[sheet]
backend = "google"
spreadsheet_id = "abc123"
"#,
        )
        .unwrap();

        assert_eq!(config.jira.server, "https://acme.atlassian.net");
        assert_eq!(config.llm.provider, LlmProvider::Groq);
        assert_eq!(config.llm.model(), "llama3-8b-8192");
        assert_eq!(config.llm.endpoint(), "https://proxy.local/v1");
        assert_eq!(config.llm.fence.open, "~~~json");
        assert_eq!(config.llm.fence.close, "```");
        assert_eq!(config.sheet.backend, SheetBackend::Google);
        assert_eq!(config.sheet.name, "test_cases");
        assert_eq!(config.confluence.url, "https://your-domain.atlassian.net/wiki");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml_str("[llm]\nprovider = \"openai\"").is_err());
    }

    #[test]
    fn test_env_overrides_credentials() {
        let env: HashMap<&str, &str> = [
            ("JIRA_EMAIL", "qa@acme.com"),
            ("JIRA_API_TOKEN", "jira-token"),
            ("GEMINI_API_KEY", "gemini-key"),
            ("GROQ_API_KEY", "groq-key"),
            ("CONFLUENCE_API_TOKEN", ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.confluence.api_token = "from-file".into();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.jira.email, "qa@acme.com");
        assert_eq!(config.jira.api_token, "jira-token");
        assert_eq!(config.llm.api_key, "gemini-key");
        assert_eq!(config.confluence.api_token, "from-file");
    }
}
