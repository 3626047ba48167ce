//! Hojas donde se guardan los casos de prueba generados.

pub mod csv_sheet;
pub mod google_sheets;

use anyhow::Result;

use crate::config::{SheetBackend, SheetConfig};
use crate::error::StoreError;
use crate::models::TestCaseBatch;

pub use csv_sheet::CsvSheetStore;
pub use google_sheets::GoogleSheetsStore;

pub trait SheetStore {
    /// Añade el lote a la hoja y devuelve las filas escritas.
    ///
    /// Si la hoja no existe se crea; si está vacía se escribe primero el encabezado.
    fn append_batch(&self, sheet: &str, batch: &TestCaseBatch) -> Result<usize, StoreError>;
}

/// Crea el almacén configurado
pub fn from_config(config: &SheetConfig) -> Result<Box<dyn SheetStore>> {
    Ok(match config.backend {
        SheetBackend::Csv => Box::new(CsvSheetStore::new(&config.directory)),
        SheetBackend::Google => Box::new(GoogleSheetsStore::new(
            &config.spreadsheet_id,
            &config.access_token,
        )?),
    })
}
