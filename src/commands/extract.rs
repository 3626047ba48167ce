use anyhow::Result;
use colored::*;

use crate::config::Config;
use crate::sources::SourceSpec;

/// Muestra el texto del requisito tal como se enviaría al modelo
pub fn extract_requirement(config: &Config, spec: &SourceSpec) -> Result<()> {
    let source = spec.build(config)?;

    println!("{}", format!("📌 Obteniendo requisito de {}...", spec).blue());
    let text = source.fetch(&spec.id())?.to_text();

    if text.trim().is_empty() {
        println!("{}", "⚠️ El requisito no tiene texto.".yellow());
        return Ok(());
    }

    println!("{}", "✅ Requisito obtenido:".green());
    println!("{}", text);

    Ok(())
}
