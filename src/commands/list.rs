use anyhow::{bail, Result};
use colored::*;

use crate::config::{Config, SheetBackend};
use crate::store::CsvSheetStore;

/// Lista las hojas CSV disponibles
pub fn list_sheets(config: &Config) -> Result<()> {
    if config.sheet.backend != SheetBackend::Csv {
        bail!("El listado de hojas solo está disponible con el almacén CSV");
    }

    let store = CsvSheetStore::new(&config.sheet.directory);
    let sheets = store.list_sheets()?;

    if sheets.is_empty() {
        println!(
            "{}",
            format!("No hay hojas en {}.", store.directory().display()).yellow()
        );
        return Ok(());
    }

    println!("{}", "Hojas disponibles:".green());
    for (i, sheet) in sheets.iter().enumerate() {
        println!("{}: {}", i + 1, sheet);
    }

    Ok(())
}
