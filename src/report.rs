use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::models::{SheetRow, TestStatus};

/// Conteo de casos por estado
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSummary {
    pub total: usize,
    counts: [usize; TestStatus::ALL.len()],
    pub unrecognized: usize,
}

impl StatusSummary {
    pub fn from_rows(rows: &[SheetRow]) -> Self {
        let mut summary = Self {
            total: rows.len(),
            ..Self::default()
        };

        for row in rows {
            match row.status() {
                Ok(status) => summary.counts[index_of(status)] += 1,
                Err(_) => summary.unrecognized += 1,
            }
        }

        summary
    }

    pub fn count(&self, status: TestStatus) -> usize {
        self.counts[index_of(status)]
    }
}

fn index_of(status: TestStatus) -> usize {
    TestStatus::ALL
        .iter()
        .position(|s| *s == status)
        .unwrap_or_default()
}

/// Escribe el informe en Markdown de una hoja
pub fn write_markdown<W: Write>(
    out: &mut W,
    title: &str,
    rows: &[SheetRow],
    generated_at: &str,
) -> io::Result<()> {
    let summary = StatusSummary::from_rows(rows);

    writeln!(out, "# Informe de Casos de Prueba: {}", title)?;
    writeln!(out, "\nFecha del informe: {}\n", generated_at)?;

    writeln!(out, "## Resumen Numérico\n")?;
    writeln!(out, "- Total de casos: {}", summary.total)?;
    for status in TestStatus::ALL {
        writeln!(out, "- {}: {}", status.label(), summary.count(status))?;
    }
    if summary.unrecognized > 0 {
        writeln!(out, "- ❔ Estado no reconocido: {}", summary.unrecognized)?;
    }

    writeln!(out, "\n## Resumen Visual\n")?;
    writeln!(out, "```mermaid")?;
    writeln!(out, "pie title Distribución de Casos de Prueba")?;
    // Solo las secciones con valores mayores que cero
    for status in TestStatus::ALL {
        let count = summary.count(status);
        if count > 0 {
            writeln!(out, "    \"{}\" : {}", status.label(), count)?;
        }
    }
    if summary.unrecognized > 0 {
        writeln!(out, "    \"❔ No reconocido\" : {}", summary.unrecognized)?;
    }
    writeln!(out, "```\n")?;

    writeln!(out, "## Detalle de casos\n")?;
    writeln!(
        out,
        "| ID | Descripción | Precondiciones | Pasos | Resultados esperados | Estado |"
    )?;
    writeln!(out, "|----|-------------|----------------|-------|----------------------|--------|")?;
    for row in rows {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} |",
            cell(&row.test_case_id),
            cell(&row.description),
            cell(&row.preconditions),
            cell(&row.steps),
            cell(&row.expected_results),
            cell(&row.status_result)
        )?;
    }

    out.flush()
}

/// Guarda el informe con la fecha actual
pub fn save_to_markdown(path: &Path, title: &str, rows: &[SheetRow]) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    write_markdown(&mut file, title, rows, &timestamp)
}

// El contenido de una celda no puede romper la tabla
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(id: &str, status: &str) -> SheetRow {
        SheetRow {
            test_case_id: id.to_string(),
            description: "Pago | QR".to_string(),
            preconditions: String::new(),
            steps: "Abrir app, Escanear".to_string(),
            expected_results: "Pago aprobado".to_string(),
            status_result: status.to_string(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let rows = vec![
            row("TC_0001", "Pending"),
            row("TC_0002", "Passed"),
            row("TC_0003", "passed"),
            row("TC_0004", "¿?"),
        ];
        let summary = StatusSummary::from_rows(&rows);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.count(TestStatus::Pending), 1);
        assert_eq!(summary.count(TestStatus::Passed), 2);
        assert_eq!(summary.count(TestStatus::Failed), 0);
        assert_eq!(summary.unrecognized, 1);
    }

    fn render(rows: &[SheetRow]) -> String {
        let mut out = Vec::new();
        write_markdown(&mut out, "pagos", rows, "2026-10-15 10:00:00").unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_markdown_report() {
        let rows = vec![row("TC_0001", "Pending"), row("TC_0002", "Failed")];
        let report = render(&rows);

        assert!(report.starts_with("# Informe de Casos de Prueba: pagos\n"));
        assert!(report.contains("Fecha del informe: 2026-10-15 10:00:00"));
        assert!(report.contains("- Total de casos: 2"));
        assert!(report.contains("    \"⏳ Pendiente\" : 1"));
        assert!(report.contains("    \"❌ Fallido\" : 1"));
        assert!(!report.contains("\"✅ Aprobado\" :"));
        assert!(report.contains(
            "| TC_0001 | Pago \\| QR |  | Abrir app, Escanear | Pago aprobado | Pending |"
        ));
    }

    #[test]
    fn test_cell_escapes() {
        assert_eq!(cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn test_write_error_is_propagated() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disco lleno"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = write_markdown(&mut Broken, "pagos", &[row("TC_0001", "Pending")], "hoy")
            .unwrap_err();
        assert_eq!(err.to_string(), "disco lleno");
    }

    #[test]
    fn test_save_to_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pagos.md");
        save_to_markdown(&path, "pagos", &[row("TC_0001", "Pending")]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("TC_0001"));
    }
}
