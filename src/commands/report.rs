use anyhow::{bail, Context, Result};
use colored::*;
use std::path::{Path, PathBuf};

use crate::config::{Config, SheetBackend};
use crate::report::save_to_markdown;
use crate::store::CsvSheetStore;

/// Lee una hoja CSV y escribe su informe en Markdown
pub fn report_sheet(config: &Config, sheet: &str, output: Option<&Path>) -> Result<()> {
    if config.sheet.backend != SheetBackend::Csv {
        bail!("Los informes solo están disponibles con el almacén CSV");
    }

    let store = CsvSheetStore::new(&config.sheet.directory);
    let rows = store
        .read_rows(sheet)
        .with_context(|| format!("No se pudo leer la hoja '{}'", sheet))?;

    if rows.is_empty() {
        println!("{}", "No hay casos de prueba en la hoja.".yellow());
        return Ok(());
    }

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => default_report_path(store.directory(), sheet),
    };

    save_to_markdown(&output, sheet, &rows)
        .with_context(|| format!("No se pudo escribir el informe {}", output.display()))?;

    println!(
        "{}",
        format!(
            "✅ Informe de {} casos de prueba guardado en {}",
            rows.len(),
            output.display()
        )
        .green()
    );

    Ok(())
}

fn default_report_path(directory: &Path, sheet: &str) -> PathBuf {
    directory.join(format!("{}.md", sheet))
}
