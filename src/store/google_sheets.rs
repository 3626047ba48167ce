use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::models::{TestCaseBatch, SHEET_HEADERS};
use crate::store::SheetStore;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Pestañas de una hoja de cálculo de Google Sheets, vía la API REST v4.
///
/// El token de acceso OAuth se obtiene fuera de testgen.
pub struct GoogleSheetsStore {
    http: Client,
    api_base: String,
    spreadsheet_id: String,
    access_token: String,
}

impl GoogleSheetsStore {
    pub fn new(spreadsheet_id: &str, access_token: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("No se pudo crear el cliente HTTP para Google Sheets")?;

        Ok(Self {
            http,
            api_base: SHEETS_API.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            access_token: access_token.to_string(),
        })
    }

    /// URL `.../spreadsheets/{id}/values/{rango}{sufijo}` con el rango codificado
    pub fn values_url(&self, range: &str, suffix: &str) -> Result<Url, StoreError> {
        self.spreadsheet_url(&["values", &format!("{}{}", range, suffix)], "")
    }

    fn spreadsheet_url(&self, segments: &[&str], id_suffix: &str) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.api_base).map_err(|e| StoreError::Transport {
            status: None,
            message: e.to_string(),
        })?;

        {
            let mut path = url.path_segments_mut().map_err(|_| StoreError::Transport {
                status: None,
                message: format!("URL base inválida: {}", self.api_base),
            })?;
            path.push("spreadsheets");
            path.push(&format!("{}{}", self.spreadsheet_id, id_suffix));
            path.extend(segments);
        }

        Ok(url)
    }

    /// `Some(true)` si la pestaña está vacía, `None` si no existe
    fn probe_sheet(&self, sheet: &str) -> Result<Option<bool>, StoreError> {
        let url = self.values_url(&header_range(sheet), "")?;
        let response = self.http.get(url).bearer_auth(&self.access_token).send()?;

        let status = response.status();
        // La API responde 400 ("Unable to parse range") cuando la pestaña no existe
        if status == StatusCode::BAD_REQUEST {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StoreError::from_status(status.as_u16(), &body));
        }

        let json: Value = response.json()?;
        Ok(Some(is_empty_range(&json)))
    }

    fn create_sheet(&self, sheet: &str) -> Result<(), StoreError> {
        let url = self.spreadsheet_url(&[], ":batchUpdate")?;
        let body = json!({
            "requests": [
                { "addSheet": { "properties": { "title": sheet } } }
            ]
        });

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StoreError::from_status(status.as_u16(), &body));
        }
        Ok(())
    }
}

impl SheetStore for GoogleSheetsStore {
    fn append_batch(&self, sheet: &str, batch: &TestCaseBatch) -> Result<usize, StoreError> {
        if sheet.trim().is_empty() {
            return Err(StoreError::InvalidSheetName(sheet.to_string()));
        }
        if batch.is_empty() {
            return Ok(0);
        }

        let needs_header = match self.probe_sheet(sheet)? {
            Some(empty) => empty,
            None => {
                warn!("La pestaña '{}' no existe; se crea", sheet);
                self.create_sheet(sheet)?;
                true
            }
        };

        if needs_header {
            info!("Añadiendo encabezado a la pestaña '{}'", sheet);
        }

        let url = self.values_url(&append_range(sheet), ":append")?;
        let response = self
            .http
            .post(url)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .bearer_auth(&self.access_token)
            .json(&append_body(batch, needs_header))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StoreError::from_status(status.as_u16(), &body));
        }

        debug!("Respuesta de append: HTTP {}", status);
        info!("{} casos de prueba escritos en la pestaña '{}'", batch.len(), sheet);
        Ok(batch.len())
    }
}

/// Nombre de pestaña entre comillas simples, como exige la notación A1
fn quoted(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

pub fn header_range(sheet: &str) -> String {
    format!("{}!A1:F1", quoted(sheet))
}

pub fn append_range(sheet: &str) -> String {
    format!("{}!A1", quoted(sheet))
}

pub fn is_empty_range(json: &Value) -> bool {
    json.get("values")
        .and_then(Value::as_array)
        .map_or(true, |rows| rows.is_empty())
}

/// Cuerpo de `values:append`; el encabezado va en la misma llamada que las filas
pub fn append_body(batch: &TestCaseBatch, include_header: bool) -> Value {
    let mut values: Vec<Vec<String>> = Vec::with_capacity(batch.len() + 1);

    if include_header {
        values.push(SHEET_HEADERS.iter().map(|h| h.to_string()).collect());
    }
    values.extend(batch.rows().into_iter().map(|row| row.into_values()));

    json!({ "values": values })
}
