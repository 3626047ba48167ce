//! Clientes del servicio de modelo de lenguaje que genera los casos de prueba.

pub mod gemini;
pub mod groq;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

use crate::config::{LlmConfig, LlmProvider};
use crate::error::GenerationError;

pub use gemini::GeminiClient;
pub use groq::GroqClient;

pub trait TestCaseGenerator {
    /// Envía el prompt y devuelve el texto crudo de la respuesta
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Crea el cliente del proveedor configurado
pub fn from_config(config: &LlmConfig) -> Result<Box<dyn TestCaseGenerator>> {
    let http = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("No se pudo crear el cliente HTTP para el modelo")?;

    Ok(match config.provider {
        LlmProvider::Gemini => Box::new(GeminiClient::new(http, config)),
        LlmProvider::Groq => Box::new(GroqClient::new(http, config)),
    })
}
