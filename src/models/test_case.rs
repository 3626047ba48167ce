use serde::{Deserialize, Serialize};

use crate::models::{TestStatus, UnknownStatus};

/// Máximo de casos de prueba por lote, sin importar cuántos devuelva el modelo
pub const MAX_TEST_CASES: usize = 50;

/// Encabezados de la hoja, en el orden fijo de columnas
pub const SHEET_HEADERS: [&str; 6] = [
    "Test Case ID",
    "Description",
    "Preconditions",
    "Steps",
    "Expected Results",
    "Status Result",
];

/// Separador de los campos de lista al escribirlos en una sola celda
pub const LIST_SEPARATOR: &str = ", ";

/// Un caso de prueba generado. Inmutable una vez creado.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCaseRecord {
    id: String,
    description: String,
    preconditions: Vec<String>,
    steps: Vec<String>,
    expected_results: Vec<String>,
    status_result: TestStatus,
}

impl TestCaseRecord {
    /// Crea un caso en estado `Pending`
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        preconditions: Vec<String>,
        steps: Vec<String>,
        expected_results: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            preconditions,
            steps,
            expected_results,
            status_result: TestStatus::Pending,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn preconditions(&self) -> &[String] {
        &self.preconditions
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn expected_results(&self) -> &[String] {
        &self.expected_results
    }

    pub fn status_result(&self) -> TestStatus {
        self.status_result
    }

    /// Convierte el caso en una fila de la hoja
    pub fn to_row(&self) -> SheetRow {
        SheetRow {
            test_case_id: self.id.clone(),
            description: self.description.clone(),
            preconditions: self.preconditions.join(LIST_SEPARATOR),
            steps: self.steps.join(LIST_SEPARATOR),
            expected_results: self.expected_results.join(LIST_SEPARATOR),
            status_result: self.status_result.to_string(),
        }
    }
}

/// Lote ordenado de casos de prueba, limitado a `MAX_TEST_CASES`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestCaseBatch {
    records: Vec<TestCaseRecord>,
}

impl TestCaseBatch {
    /// Crea el lote descartando lo que exceda el límite, conservando el orden
    pub fn new(mut records: Vec<TestCaseRecord>) -> Self {
        records.truncate(MAX_TEST_CASES);
        Self { records }
    }

    pub fn records(&self) -> &[TestCaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCaseRecord> {
        self.records.iter()
    }

    pub fn rows(&self) -> Vec<SheetRow> {
        self.records.iter().map(TestCaseRecord::to_row).collect()
    }
}

impl<'a> IntoIterator for &'a TestCaseBatch {
    type Item = &'a TestCaseRecord;
    type IntoIter = std::slice::Iter<'a, TestCaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Fila de la hoja tal como se escribe y se vuelve a leer
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SheetRow {
    #[serde(rename = "Test Case ID")]
    pub test_case_id: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Preconditions")]
    pub preconditions: String,
    #[serde(rename = "Steps")]
    pub steps: String,
    #[serde(rename = "Expected Results")]
    pub expected_results: String,
    #[serde(rename = "Status Result")]
    pub status_result: String,
}

impl SheetRow {
    /// Estado de la fila; los testers pueden haberlo editado en la hoja
    pub fn status(&self) -> Result<TestStatus, UnknownStatus> {
        self.status_result.parse()
    }

    /// Valores en el orden de `SHEET_HEADERS`
    pub fn into_values(self) -> Vec<String> {
        vec![
            self.test_case_id,
            self.description,
            self.preconditions,
            self.steps,
            self.expected_results,
            self.status_result,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> TestCaseRecord {
        TestCaseRecord::new(
            id,
            "Login válido",
            vec!["Usuario registrado".into()],
            vec!["Abrir login".into(), "Enviar credenciales".into()],
            vec!["Se muestra el panel".into()],
        )
    }

    #[test]
    fn test_new_record_is_pending() {
        assert_eq!(record("TC_0001").status_result(), TestStatus::Pending);
    }

    #[test]
    fn test_row_joins_lists_with_comma() {
        let row = record("TC_0001").to_row();
        assert_eq!(row.steps, "Abrir login, Enviar credenciales");
        assert_eq!(row.status_result, "Pending");
        assert_eq!(row.clone().into_values().len(), SHEET_HEADERS.len());
    }

    #[test]
    fn test_batch_is_capped() {
        let records = (1..=60).map(|i| record(&format!("TC_{:04}", i))).collect();
        let batch = TestCaseBatch::new(records);
        assert_eq!(batch.len(), MAX_TEST_CASES);
        assert_eq!(batch.records()[49].id(), "TC_0050");
    }
}
