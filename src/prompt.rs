/// Construye el prompt que se envía al modelo para generar los casos de prueba
pub fn build_prompt(requirement: &str, max_cases: usize) -> String {
    format!(
        r#"Eres un QA Engineer senior. A partir del siguiente requisito, genera casos de prueba en formato JSON.

Requisito:
{requirement}

Formato de salida (solo JSON, sin explicaciones):
```json
[
    {{
        "Test Case ID": "TC_0001",
        "Description": "Describe el caso de prueba",
        "Preconditions": ["Lista de precondiciones"],
        "Steps": ["Paso 1", "Paso 2"],
        "Expected Results": ["Resultado esperado"]
    }}
]
```
Genera como máximo {max_cases} casos de prueba con este formato, con una descripción que explique el objetivo de cada uno. Devuelve únicamente el JSON."#
    )
}
