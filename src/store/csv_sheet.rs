use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::models::{SheetRow, TestCaseBatch, SHEET_HEADERS};
use crate::store::SheetStore;

/// Hojas como archivos CSV dentro de un directorio: `{directorio}/{hoja}.csv`
#[derive(Debug, Clone)]
pub struct CsvSheetStore {
    directory: PathBuf,
}

impl CsvSheetStore {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn sheet_path(&self, sheet: &str) -> Result<PathBuf, StoreError> {
        validate_sheet_name(sheet)?;
        Ok(self.directory.join(format!("{}.csv", sheet)))
    }

    /// Carga las filas de una hoja; las filas mal formadas se omiten
    pub fn read_rows(&self, sheet: &str) -> Result<Vec<SheetRow>, StoreError> {
        let path = self.sheet_path(sheet)?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_path(&path)?;

        let mut rows = Vec::new();
        for result in reader.deserialize() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) => warn!("Fila omitida en {}: {}", path.display(), e),
            }
        }

        Ok(rows)
    }

    /// Nombres de las hojas disponibles, en orden alfabético
    pub fn list_sheets(&self) -> Result<Vec<String>, StoreError> {
        let mut sheets = Vec::new();

        if !self.directory.exists() {
            return Ok(sheets);
        }

        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();

            if path.is_file() && path.extension().map_or(false, |ext| ext == "csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    sheets.push(stem.to_string());
                }
            }
        }

        sheets.sort();

        Ok(sheets)
    }
}

impl SheetStore for CsvSheetStore {
    fn append_batch(&self, sheet: &str, batch: &TestCaseBatch) -> Result<usize, StoreError> {
        let path = self.sheet_path(sheet)?;

        if batch.is_empty() {
            return Ok(0);
        }

        if !path.exists() {
            warn!("La hoja '{}' no existe; se crea en {}", sheet, path.display());
            fs::create_dir_all(&self.directory)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        if needs_header {
            info!("Añadiendo encabezado a la hoja '{}'", sheet);
            writer.write_record(SHEET_HEADERS)?;
        }

        for row in batch.rows() {
            writer.serialize(row)?;
        }

        writer.flush()?;

        info!("{} casos de prueba escritos en {}", batch.len(), path.display());
        Ok(batch.len())
    }
}

fn validate_sheet_name(sheet: &str) -> Result<(), StoreError> {
    let trimmed = sheet.trim();
    let invalid = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\']);

    if invalid {
        return Err(StoreError::InvalidSheetName(sheet.to_string()));
    }
    Ok(())
}
