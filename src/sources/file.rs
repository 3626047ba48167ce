use serde_json::Value;
use std::fs;
use std::io;
use tracing::info;

use crate::error::FetchError;
use crate::sources::jira::requirement_from_issue;
use crate::sources::{Requirement, RequirementSource};

/// Lee el requisito de un archivo local: documento ADF, incidencia de Jira
/// exportada en JSON, o texto plano
pub struct FileSource;

impl RequirementSource for FileSource {
    fn name(&self) -> &'static str {
        "archivo"
    }

    fn fetch(&self, path: &str) -> Result<Requirement, FetchError> {
        info!("Leyendo requisito desde {}", path);

        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FetchError::NotFound(path.to_string()),
            _ => FetchError::Io(e),
        })?;

        Ok(requirement_from_str(&content))
    }
}

pub fn requirement_from_str(content: &str) -> Requirement {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::String(text)) => Requirement::Text(text),
        Ok(issue) if issue.get("fields").is_some() => requirement_from_issue(&issue),
        Ok(document) if document.get("content").is_some() => Requirement::Document(document),
        _ => Requirement::Text(content.to_string()),
    }
}
