use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;

use test_case_generator::commands::{Outcome, Pipeline};
use test_case_generator::generator::TestCaseGenerator;
use test_case_generator::sources::FileSource;
use test_case_generator::store::CsvSheetStore;
use test_case_generator::{GenerationError, PipelineError, Rejection, ResponseNormalizer};

struct CannedModel(String);

impl TestCaseGenerator for CannedModel {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.0.clone())
    }
}

fn write_requirement(dir: &std::path::Path) -> String {
    let document = json!({
        "type": "doc",
        "content": [
            {"type": "paragraph", "content": [
                {"type": "text", "text": "El usuario puede pagar con QR."}
            ]}
        ]
    });
    let path = dir.join("MER-895.json");
    fs::write(&path, document.to_string()).unwrap();
    path.display().to_string()
}

fn many_cases(count: usize) -> String {
    let cases: Vec<_> = (1..=count)
        .map(|n| {
            json!({
                "Test Case ID": format!("TC_{:03}", n),
                "Description": format!("Caso {}", n),
                "Preconditions": ["Usuario autenticado"],
                "Steps": ["Abrir la app", "Escanear el QR"],
                "Expected Results": "Pago aprobado"
            })
        })
        .collect();
    format!("```json\n{}\n```", serde_json::to_string_pretty(&cases).unwrap())
}

#[test]
fn test_generated_cases_are_capped_and_written() {
    let dir = tempfile::tempdir().unwrap();
    let requirement = write_requirement(dir.path());
    let store = CsvSheetStore::new(dir.path().join("sheets"));
    let model = CannedModel(many_cases(75));
    let normalizer = ResponseNormalizer::default();

    let outcome = Pipeline {
        source: &FileSource,
        generator: &model,
        store: &store,
        normalizer: &normalizer,
    }
    .run(&requirement, "pagos")
    .unwrap();

    assert_eq!(
        outcome,
        Outcome::Written {
            sheet: "pagos".into(),
            rows: 50
        }
    );

    let rows = store.read_rows("pagos").unwrap();
    assert_eq!(rows.len(), 50);
    assert_eq!(rows[0].test_case_id, "TC_001");
    assert_eq!(rows[0].description, "Caso 1");
    assert_eq!(rows[0].preconditions, "Usuario autenticado");
    assert_eq!(rows[0].steps, "Abrir la app, Escanear el QR");
    assert_eq!(rows[0].expected_results, "Pago aprobado");
    assert_eq!(rows[0].status_result, "Pending");
    assert_eq!(rows[49].test_case_id, "TC_050");
}

#[test]
fn test_rejected_response_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let requirement = write_requirement(dir.path());
    let store = CsvSheetStore::new(dir.path().join("sheets"));
    let model = CannedModel("Lo siento, no puedo ayudar con eso.".into());
    let normalizer = ResponseNormalizer::default();

    let result = Pipeline {
        source: &FileSource,
        generator: &model,
        store: &store,
        normalizer: &normalizer,
    }
    .run(&requirement, "pagos");

    match result {
        Err(PipelineError::Rejected(Rejection::MalformedJson { raw, .. })) => {
            assert_eq!(raw, "Lo siento, no puedo ayudar con eso.")
        }
        other => panic!("se esperaba un rechazo, se obtuvo {:?}", other),
    }
    assert!(!store.sheet_path("pagos").unwrap().exists());
}

#[test]
fn test_wrong_shape_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let requirement = write_requirement(dir.path());
    let store = CsvSheetStore::new(dir.path().join("sheets"));
    let model = CannedModel(r#"[{"Description": "ok"}, 42]"#.into());
    let normalizer = ResponseNormalizer::default();

    let result = Pipeline {
        source: &FileSource,
        generator: &model,
        store: &store,
        normalizer: &normalizer,
    }
    .run(&requirement, "pagos");

    assert!(matches!(
        result,
        Err(PipelineError::Rejected(Rejection::InvalidShape { .. }))
    ));
    assert!(store.list_sheets().unwrap().is_empty());
}

#[test]
fn test_missing_requirement_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvSheetStore::new(dir.path());
    let model = CannedModel("[]".into());
    let normalizer = ResponseNormalizer::default();
    let missing = dir.path().join("no-existe.json").display().to_string();

    let result = Pipeline {
        source: &FileSource,
        generator: &model,
        store: &store,
        normalizer: &normalizer,
    }
    .run(&missing, "pagos");

    assert!(matches!(result, Err(PipelineError::Fetch(_))));
}
