//! Árbol de documento estructurado (formato tipo ADF de Jira).
//!
//! El árbol se construye una sola vez a partir del JSON decodificado y solo se
//! lee después. Cualquier forma que no se reconozca termina en `Unknown`, que
//! se extrae como texto vacío.

use serde_json::Value;

/// Profundidad máxima del árbol; los nodos más profundos se tratan como `Unknown`
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentNode {
    /// Nodo `text`
    Text(String),
    /// Nodo `table`: filas con sus celdas
    Table(Vec<TableRow>),
    /// Nodo `mediaSingle` con la referencia a la imagen (`url`, si no `id`)
    Media(Option<String>),
    /// Cualquier otro nodo con `content`, o una lista de nodos
    Container(Vec<DocumentNode>),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub cells: Vec<DocumentNode>,
}

impl DocumentNode {
    pub fn text(text: impl Into<String>) -> Self {
        DocumentNode::Text(text.into())
    }

    /// Construye el árbol desde un valor JSON con el límite de profundidad por defecto
    pub fn from_value(value: &Value) -> Self {
        Self::from_value_limited(value, MAX_DEPTH)
    }

    pub fn from_value_limited(value: &Value, max_depth: usize) -> Self {
        build(value, 0, max_depth)
    }
}

fn build(value: &Value, depth: usize, max_depth: usize) -> DocumentNode {
    if depth > max_depth {
        return DocumentNode::Unknown;
    }

    match value {
        Value::Array(items) => DocumentNode::Container(children(items, depth + 1, max_depth)),
        Value::Object(map) => match map.get("type").and_then(Value::as_str) {
            Some("text") => DocumentNode::Text(
                map.get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            ),
            Some("table") => DocumentNode::Table(table_rows(map.get("content"), depth, max_depth)),
            Some("mediaSingle") => DocumentNode::Media(media_reference(map.get("attrs"))),
            _ => match map.get("content") {
                Some(Value::Array(items)) => {
                    DocumentNode::Container(children(items, depth + 1, max_depth))
                }
                // `content` mal formado: se trata como un único hijo
                Some(other) => DocumentNode::Container(vec![build(other, depth + 1, max_depth)]),
                None => DocumentNode::Unknown,
            },
        },
        _ => DocumentNode::Unknown,
    }
}

fn children(items: &[Value], depth: usize, max_depth: usize) -> Vec<DocumentNode> {
    items
        .iter()
        .map(|item| build(item, depth, max_depth))
        .collect()
}

// Las filas van a depth + 1 y las celdas a depth + 2. Una fila sin `content`
// queda sin celdas.
fn table_rows(content: Option<&Value>, depth: usize, max_depth: usize) -> Vec<TableRow> {
    let Some(Value::Array(rows)) = content else {
        return Vec::new();
    };

    rows.iter()
        .map(|row| {
            let cells = match row.get("content") {
                Some(Value::Array(cells)) if depth < max_depth => {
                    children(cells, depth + 2, max_depth)
                }
                _ => Vec::new(),
            };
            TableRow { cells }
        })
        .collect()
}

fn media_reference(attrs: Option<&Value>) -> Option<String> {
    let attrs = attrs?.as_object()?;
    attr_as_string(attrs.get("url")).or_else(|| attr_as_string(attrs.get("id")))
}

fn attr_as_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
