use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resultado de un caso de prueba tal como aparece en la columna "Status Result"
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TestStatus {
    #[default]
    Pending,
    Passed,
    Failed,
    Blocked,
    Skipped,
}

impl TestStatus {
    pub const ALL: [TestStatus; 5] = [
        TestStatus::Pending,
        TestStatus::Passed,
        TestStatus::Failed,
        TestStatus::Blocked,
        TestStatus::Skipped,
    ];

    /// Etiqueta con emoji para informes y salida de consola
    pub fn label(&self) -> &'static str {
        match self {
            TestStatus::Pending => "⏳ Pendiente",
            TestStatus::Passed => "✅ Aprobado",
            TestStatus::Failed => "❌ Fallido",
            TestStatus::Blocked => "🚫 Bloqueado",
            TestStatus::Skipped => "⏭️ Omitido",
        }
    }
}

// El valor que se escribe en la hoja es el nombre en inglés, sin decoración.
impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestStatus::Pending => "Pending",
            TestStatus::Passed => "Passed",
            TestStatus::Failed => "Failed",
            TestStatus::Blocked => "Blocked",
            TestStatus::Skipped => "Skipped",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("estado desconocido: '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for TestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendiente" => Ok(TestStatus::Pending),
            "passed" | "pass" | "aprobado" | "validado" => Ok(TestStatus::Passed),
            "failed" | "fail" | "fallido" | "rechazado" => Ok(TestStatus::Failed),
            "blocked" | "bloqueado" => Ok(TestStatus::Blocked),
            "skipped" | "omitido" => Ok(TestStatus::Skipped),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_sheet_value() {
        assert_eq!(TestStatus::Pending.to_string(), "Pending");
        assert_eq!(TestStatus::default(), TestStatus::Pending);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("PASSED".parse::<TestStatus>(), Ok(TestStatus::Passed));
        assert_eq!(" blocked ".parse::<TestStatus>(), Ok(TestStatus::Blocked));
        assert_eq!("Rechazado".parse::<TestStatus>(), Ok(TestStatus::Failed));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "maybe".parse::<TestStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("maybe".to_string()));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for status in TestStatus::ALL {
            assert_eq!(status.to_string().parse::<TestStatus>(), Ok(status));
        }
    }
}
