//! Conversión del árbol de documento a texto plano para el prompt.
//!
//! El recorrido usa una pila explícita en lugar de recursión, así que un árbol
//! muy profundo no puede agotar la pila. Nunca falla: lo que no se reconoce
//! produce texto vacío y el resto del documento se sigue extrayendo.

use serde_json::Value;
use tracing::debug;

use crate::models::{DocumentNode, MAX_DEPTH};

/// Línea que precede a cada tabla extraída
pub const TABLE_MARKER: &str = "\n📊 Tabla:\n";
/// Prefijo de la línea que referencia una imagen
pub const IMAGE_MARKER: &str = "🖼️ Imagen:";

const NODE_SEPARATOR: &str = " ";
const CELL_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Copy)]
pub struct DocumentExtractor {
    max_depth: usize,
}

enum Step<'a> {
    Visit(&'a DocumentNode, usize),
    Emit(&'static str),
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor {
    pub fn new() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Extrae texto de un nodo, una lista de nodos o un valor ausente (`null`)
    pub fn extract(&self, value: &Value) -> String {
        let root = DocumentNode::from_value_limited(value, self.max_depth);
        self.render(&root)
    }

    /// Extrae la descripción completa: lee `content` de la raíz y recorta espacios
    pub fn extract_description(&self, payload: &Value) -> String {
        match payload.get("content") {
            Some(content) => self.extract(content).trim().to_string(),
            None => {
                debug!("El documento no tiene 'content'; no hay nada que extraer");
                String::new()
            }
        }
    }

    /// Recorre el árbol y concatena su texto
    pub fn render(&self, root: &DocumentNode) -> String {
        let mut out = String::new();
        let mut stack = vec![Step::Visit(root, 0)];

        while let Some(step) = stack.pop() {
            let (node, depth) = match step {
                Step::Emit(text) => {
                    out.push_str(text);
                    continue;
                }
                Step::Visit(node, depth) => (node, depth),
            };

            if depth > self.max_depth {
                continue;
            }

            match node {
                DocumentNode::Text(text) => out.push_str(text),
                DocumentNode::Media(Some(reference)) => {
                    out.push('\n');
                    out.push_str(IMAGE_MARKER);
                    out.push(' ');
                    out.push_str(reference);
                    out.push('\n');
                }
                DocumentNode::Media(None) | DocumentNode::Unknown => {}
                DocumentNode::Container(children) => {
                    push_joined(&mut stack, children, NODE_SEPARATOR, depth + 1);
                }
                DocumentNode::Table(rows) => {
                    // La pila es LIFO: las filas se apilan al revés y el
                    // encabezado al final para que salga primero.
                    for row in rows.iter().rev() {
                        stack.push(Step::Emit("\n"));
                        push_joined(&mut stack, &row.cells, CELL_SEPARATOR, depth + 2);
                    }
                    stack.push(Step::Emit(TABLE_MARKER));
                }
            }
        }

        out
    }
}

fn push_joined<'a>(
    stack: &mut Vec<Step<'a>>,
    nodes: &'a [DocumentNode],
    separator: &'static str,
    depth: usize,
) {
    for (i, node) in nodes.iter().enumerate().rev() {
        stack.push(Step::Visit(node, depth));
        if i > 0 {
            stack.push(Step::Emit(separator));
        }
    }
}

/// Extrae texto con el extractor por defecto
pub fn extract(value: &Value) -> String {
    DocumentExtractor::new().extract(value)
}

/// Extrae la descripción de un documento con el extractor por defecto
pub fn extract_description(payload: &Value) -> String {
    DocumentExtractor::new().extract_description(payload)
}
