use anyhow::Result;
use colored::*;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::PipelineError;
use crate::generator::{self, TestCaseGenerator};
use crate::normalizer::{Rejection, ResponseNormalizer};
use crate::prompt::build_prompt;
use crate::sources::{RequirementSource, SourceSpec};
use crate::store::{self, SheetStore};

/// Resultado de una ejecución que no falló
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// El requisito quedó vacío; no se llamó al modelo
    NothingToGenerate,
    /// El modelo devolvió una lista vacía; no se escribió nada
    NoTestCases,
    Written { sheet: String, rows: usize },
}

/// Requisito → prompt → modelo → normalización → hoja
pub struct Pipeline<'a> {
    pub source: &'a dyn RequirementSource,
    pub generator: &'a dyn TestCaseGenerator,
    pub store: &'a dyn SheetStore,
    pub normalizer: &'a ResponseNormalizer,
}

impl Pipeline<'_> {
    pub fn run(&self, id: &str, sheet: &str) -> Result<Outcome, PipelineError> {
        let requirement = self.source.fetch(id)?;
        let text = requirement.to_text();

        if text.trim().is_empty() {
            warn!("El requisito {} de {} está vacío", id, self.source.name());
            return Ok(Outcome::NothingToGenerate);
        }
        debug!("Requisito extraído ({} caracteres):\n{}", text.len(), text);

        let prompt = build_prompt(&text, self.normalizer.max_cases());
        let raw = self.generator.generate(&prompt)?;

        let batch = self.normalizer.normalize(&raw).map_err(|rejection| {
            debug!("Respuesta rechazada del modelo:\n{}", rejection.raw());
            rejection
        })?;

        if batch.is_empty() {
            info!("El modelo no devolvió casos de prueba");
            return Ok(Outcome::NoTestCases);
        }

        info!("{} casos de prueba generados", batch.len());
        let rows = self.store.append_batch(sheet, &batch)?;

        Ok(Outcome::Written {
            sheet: sheet.to_string(),
            rows,
        })
    }
}

/// Genera casos de prueba para un requisito y los guarda en la hoja
pub fn generate_test_cases(config: &Config, spec: &SourceSpec, sheet: Option<&str>) -> Result<()> {
    let sheet = sheet.unwrap_or(config.sheet.name.as_str());

    let source = spec.build(config)?;
    let generator = generator::from_config(&config.llm)?;
    let store = store::from_config(&config.sheet)?;
    let normalizer = ResponseNormalizer::new(config.llm.fence.clone(), config.llm.max_test_cases);

    let pipeline = Pipeline {
        source: source.as_ref(),
        generator: generator.as_ref(),
        store: store.as_ref(),
        normalizer: &normalizer,
    };

    println!("{}", format!("🚀 Obteniendo requisito de {}...", spec).blue());

    match pipeline.run(&spec.id(), sheet) {
        Ok(Outcome::Written { sheet, rows }) => {
            println!(
                "{}",
                format!("✅ {} casos de prueba escritos en la hoja '{}'", rows, sheet).green()
            );
            Ok(())
        }
        Ok(Outcome::NoTestCases) => {
            println!("{}", "⚠️ El modelo no generó casos de prueba. No se escribió nada.".yellow());
            Ok(())
        }
        Ok(Outcome::NothingToGenerate) => {
            println!(
                "{}",
                "⚠️ El requisito no tiene texto. Se omite la generación de casos de prueba.".yellow()
            );
            Ok(())
        }
        Err(e) => {
            if let PipelineError::Rejected(rejection) = &e {
                print_rejection(rejection);
            }
            println!("{}", "No se escribió ningún caso de prueba.".red());
            Err(e.into())
        }
    }
}

fn print_rejection(rejection: &Rejection) {
    println!("{}", "🔍 Respuesta del modelo:".yellow());
    println!("{}", rejection.raw());
}
