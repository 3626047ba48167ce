//! Genera casos de prueba a partir de requisitos de Jira o Confluence con un
//! modelo de lenguaje y los guarda en una hoja de cálculo.

pub mod commands;
pub mod config;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod models;
pub mod normalizer;
pub mod prompt;
pub mod report;
pub mod sources;
pub mod store;

pub use error::{FetchError, GenerationError, PipelineError, StoreError};
pub use extractor::{extract, extract_description, DocumentExtractor};
pub use normalizer::{normalize, FenceConfig, Rejection, ResponseNormalizer};
