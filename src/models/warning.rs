use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::models::SemesterKey;

/// Advertencia de la planificación. Las de carga llevan el total de unidades
/// académicas; las de requisitos, el código del curso y los códigos no cumplidos.
///
/// En JSON es un objeto etiquetado por `kind` que además trae `detail`.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    Underload { semester: SemesterKey, units: f64 },
    Overload { semester: SemesterKey, units: f64 },
    MissingPrerequisite { semester: SemesterKey, course: String, unmet: Vec<String> },
    MissingCorequisite { semester: SemesterKey, course: String, unmet: Vec<String> },
}

impl Warning {
    pub fn semester(&self) -> SemesterKey {
        match self {
            Warning::Underload { semester, .. }
            | Warning::Overload { semester, .. }
            | Warning::MissingPrerequisite { semester, .. }
            | Warning::MissingCorequisite { semester, .. } => *semester,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Warning::Underload { .. } => "underload",
            Warning::Overload { .. } => "overload",
            Warning::MissingPrerequisite { .. } => "missing_prerequisite",
            Warning::MissingCorequisite { .. } => "missing_corequisite",
        }
    }

    pub fn is_load(&self) -> bool {
        matches!(self, Warning::Underload { .. } | Warning::Overload { .. })
    }

    /// Texto corto para mostrar junto a la advertencia (p. ej. "3 units").
    pub fn detail(&self) -> String {
        match self {
            Warning::Underload { units, .. } | Warning::Overload { units, .. } => format!("{} units", units),
            Warning::MissingPrerequisite { course, unmet, .. } => {
                format!("{} requires one of: {}", course, unmet.join(", "))
            }
            Warning::MissingCorequisite { course, unmet, .. } => {
                format!("{} must be taken with: {}", course, unmet.join(", "))
            }
        }
    }
}

impl Serialize for Warning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("kind", self.kind())?;
        map.serialize_entry("semester", &self.semester())?;
        match self {
            Warning::Underload { units, .. } | Warning::Overload { units, .. } => {
                map.serialize_entry("units", units)?;
            }
            Warning::MissingPrerequisite { course, unmet, .. } | Warning::MissingCorequisite { course, unmet, .. } => {
                map.serialize_entry("course", course)?;
                map.serialize_entry("unmet", unmet)?;
            }
        }
        map.serialize_entry("detail", &self.detail())?;
        map.end()
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Warning::Underload { .. } => "underload",
            Warning::Overload { .. } => "overload",
            Warning::MissingPrerequisite { .. } => "missing prerequisite",
            Warning::MissingCorequisite { .. } => "missing corequisite",
        };
        write!(f, "[{}] {}: {}", self.semester(), label, self.detail())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Term;

    #[test]
    fn test_detail_y_json() {
        let w = Warning::Underload { semester: SemesterKey::new(1, Term::First), units: 3.0 };
        assert_eq!(w.detail(), "3 units");
        assert_eq!(w.to_string(), "[1-1] underload: 3 units");

        let v = serde_json::to_value(&w).unwrap();
        assert_eq!(v["kind"], "underload");
        assert_eq!(v["semester"], "1-1");
        assert_eq!(v["units"], 3.0);
        assert_eq!(v["detail"], "3 units");

        let p = Warning::MissingPrerequisite {
            semester: SemesterKey::new(2, Term::Second),
            course: "CS102".into(),
            unmet: vec!["CS101".into(), "CS100".into()],
        };
        assert_eq!(p.detail(), "CS102 requires one of: CS101, CS100");
        assert!(!p.is_load());

        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["kind"], "missing_prerequisite");
        assert_eq!(v["unmet"], serde_json::json!(["CS101", "CS100"]));
        assert_eq!(v["detail"], "CS102 requires one of: CS101, CS100");
    }
}
