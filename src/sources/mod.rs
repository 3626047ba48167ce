//! Orígenes del requisito: Jira, Confluence o un archivo local.

pub mod confluence;
pub mod file;
pub mod jira;

use anyhow::Result;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::FetchError;
use crate::extractor::extract_description;

pub use confluence::ConfluenceClient;
pub use file::FileSource;
pub use jira::JiraClient;

/// Requisito tal como llega del origen
#[derive(Debug, Clone, PartialEq)]
pub enum Requirement {
    /// Documento estructurado (ADF), con `content` en la raíz
    Document(Value),
    /// Texto plano, se usa tal cual
    Text(String),
}

impl Requirement {
    /// Texto del requisito listo para el prompt
    pub fn to_text(&self) -> String {
        match self {
            Requirement::Document(payload) => extract_description(payload),
            Requirement::Text(text) => text.clone(),
        }
    }
}

pub trait RequirementSource {
    /// Nombre del origen para mensajes y logs
    fn name(&self) -> &'static str;

    fn fetch(&self, id: &str) -> Result<Requirement, FetchError>;
}

/// Origen elegido por el usuario y su identificador
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Jira(String),
    Confluence(String),
    File(PathBuf),
}

impl SourceSpec {
    pub fn id(&self) -> String {
        match self {
            SourceSpec::Jira(key) => key.clone(),
            SourceSpec::Confluence(page_id) => page_id.clone(),
            SourceSpec::File(path) => path.display().to_string(),
        }
    }

    /// Crea el cliente correspondiente a partir de la configuración
    pub fn build(&self, config: &Config) -> Result<Box<dyn RequirementSource>> {
        Ok(match self {
            SourceSpec::Jira(_) => Box::new(JiraClient::new(&config.jira)?),
            SourceSpec::Confluence(_) => Box::new(ConfluenceClient::new(&config.confluence)?),
            SourceSpec::File(_) => Box::new(FileSource),
        })
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSpec::Jira(key) => write!(f, "Jira {}", key),
            SourceSpec::Confluence(page_id) => write!(f, "Confluence {}", page_id),
            SourceSpec::File(path) => write!(f, "archivo {}", path.display()),
        }
    }
}
