use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{SemesterKey, Term};

/// Categoría de un curso dentro de la malla.
///
/// Los textos desconocidos caen en `Other`, que nunca cuenta para las cuotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CourseType {
    RequiredAcademic,
    RequiredNonAcademic,
    GeElective,
    Elective,
    Major,
    Other,
}

impl CourseType {
    /// Tipos que tienen cuota declarable (todo salvo `Other`).
    pub const COUNTED: [CourseType; 5] = [
        CourseType::RequiredAcademic,
        CourseType::RequiredNonAcademic,
        CourseType::GeElective,
        CourseType::Elective,
        CourseType::Major,
    ];

    /// Interpreta el tipo ignorando mayúsculas, espacios y puntuación
    /// ("Required Academic", "required_academic", "GE-Elective", ...).
    pub fn parse(raw: &str) -> CourseType {
        let key: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "requiredacademic" | "reqacademic" => CourseType::RequiredAcademic,
            "requirednonacademic" | "reqnonacademic" => CourseType::RequiredNonAcademic,
            "geelective" | "geelectives" | "ge" => CourseType::GeElective,
            "elective" | "electives" | "freeelective" => CourseType::Elective,
            "major" | "majorcourse" | "majorelective" => CourseType::Major,
            _ => CourseType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CourseType::RequiredAcademic => "Required Academic",
            CourseType::RequiredNonAcademic => "Required Non-Academic",
            CourseType::GeElective => "GE Elective",
            CourseType::Elective => "Elective",
            CourseType::Major => "Major",
            CourseType::Other => "Other",
        }
    }

    /// Los tipos obligatorios se pueden cursar en cualquier semestre en que se dicten.
    pub fn is_required(&self) -> bool {
        matches!(self, CourseType::RequiredAcademic | CourseType::RequiredNonAcademic)
    }
}

impl From<String> for CourseType {
    fn from(s: String) -> Self {
        CourseType::parse(&s)
    }
}

impl From<CourseType> for String {
    fn from(t: CourseType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for CourseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequisiteKind {
    Prerequisite,
    Corequisite,
}

impl RequisiteKind {
    pub fn parse(raw: &str) -> Option<RequisiteKind> {
        match raw.trim().to_lowercase().as_str() {
            "prerequisite" | "prereq" | "pre" | "prerrequisito" => Some(RequisiteKind::Prerequisite),
            "corequisite" | "coreq" | "co" | "correquisito" => Some(RequisiteKind::Corequisite),
            _ => None,
        }
    }
}

/// Dependencia hacia otro curso. `code` es opcional: cuando falta se resuelve
/// contra la grilla o el catálogo al momento de reportar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requisite {
    pub course_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub kind: RequisiteKind,
}

impl Requisite {
    pub fn prerequisite(course_id: &str) -> Self {
        Requisite { course_id: course_id.to_string(), code: None, kind: RequisiteKind::Prerequisite }
    }

    pub fn corequisite(course_id: &str) -> Self {
        Requisite { course_id: course_id.to_string(), code: None, kind: RequisiteKind::Corequisite }
    }

    /// Acepta `{course_id|id|course, code?, kind|type}`. Entradas sin etiqueta
    /// reconocible se descartan.
    fn from_value(v: &Value) -> Option<Requisite> {
        let obj = v.as_object()?;
        let course_id = ["course_id", "id", "course"]
            .iter()
            .filter_map(|k| obj.get(*k))
            .map(value_to_string)
            .find(|s| !s.is_empty())?;
        let kind = ["kind", "type"]
            .iter()
            .filter_map(|k| obj.get(*k))
            .filter_map(|k| k.as_str())
            .find_map(RequisiteKind::parse)?;
        let code = obj.get("code").map(value_to_string).filter(|s| !s.is_empty());
        Some(Requisite { course_id, code, kind })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCourse")]
pub struct Course {
    pub id: String,
    pub code: String,
    pub title: String,
    pub units: f64,
    pub academic: bool,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    pub requisites: Vec<Requisite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescribed: Option<SemesterKey>,
}

impl Course {
    /// Curso académico sin requisitos; los demás campos se ajustan con los builders.
    pub fn new(id: &str, code: &str, units: f64, course_type: CourseType) -> Self {
        Course {
            id: id.to_string(),
            code: code.to_string(),
            title: String::new(),
            units: sanitize_units(units),
            academic: course_type != CourseType::RequiredNonAcademic,
            course_type,
            requisites: Vec::new(),
            prescribed: None,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_academic(mut self, academic: bool) -> Self {
        self.academic = academic;
        self
    }

    pub fn with_requisite(mut self, requisite: Requisite) -> Self {
        self.requisites.push(requisite);
        self
    }

    pub fn with_prescribed(mut self, semester: SemesterKey) -> Self {
        self.prescribed = Some(semester);
        self
    }

    pub fn prerequisites(&self) -> impl Iterator<Item = &Requisite> {
        self.requisites.iter().filter(|r| r.kind == RequisiteKind::Prerequisite)
    }

    pub fn corequisites(&self) -> impl Iterator<Item = &Requisite> {
        self.requisites.iter().filter(|r| r.kind == RequisiteKind::Corequisite)
    }

    /// Unidades que cuentan para la carga del semestre.
    pub fn load_units(&self) -> f64 {
        if self.academic { self.units } else { 0.0 }
    }
}

/// Forma laxa de un curso tal como llega en JSON (datafiles o body HTTP).
#[derive(Debug, Default, Deserialize)]
pub struct RawCourse {
    #[serde(default, alias = "_id", alias = "course_id")]
    id: Option<Value>,
    #[serde(default)]
    code: Option<Value>,
    #[serde(default, alias = "name")]
    title: Option<Value>,
    #[serde(default, alias = "unit", alias = "credits")]
    units: Option<Value>,
    #[serde(default, alias = "is_academic")]
    academic: Option<Value>,
    #[serde(default, rename = "type", alias = "course_type")]
    course_type: Option<Value>,
    #[serde(default)]
    requisites: Option<Value>,
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    term: Option<Value>,
    #[serde(default)]
    prescribed: Option<Value>,
}

impl From<RawCourse> for Course {
    fn from(raw: RawCourse) -> Self {
        let id = raw.id.as_ref().map(value_to_string).unwrap_or_default();
        let code = raw.code.as_ref().map(value_to_string).unwrap_or_default();
        let (id, code) = match (id.is_empty(), code.is_empty()) {
            (true, false) => (code.clone(), code),
            (false, true) => (id.clone(), id),
            _ => (id, code),
        };

        let course_type = raw
            .course_type
            .as_ref()
            .map(|v| CourseType::parse(&value_to_string(v)))
            .unwrap_or(CourseType::Other);
        let academic = raw
            .academic
            .as_ref()
            .and_then(flag_from_value)
            .unwrap_or(course_type != CourseType::RequiredNonAcademic);

        // Cualquier forma que no sea lista equivale a "sin requisitos"
        let requisites = raw
            .requisites
            .as_ref()
            .and_then(Value::as_array)
            .map(|reqs| reqs.iter().filter_map(Requisite::from_value).collect())
            .unwrap_or_default();

        let prescribed = raw
            .prescribed
            .as_ref()
            .and_then(Value::as_str)
            .and_then(SemesterKey::parse)
            .or_else(|| {
                let year = raw.year.as_ref().and_then(year_from_value).filter(|y| *y >= 1)?;
                let term = raw.term.as_ref().and_then(Term::from_value)?;
                Some(SemesterKey::new(year, term))
            });

        Course {
            id,
            code,
            title: raw.title.as_ref().map(value_to_string).unwrap_or_default(),
            units: units_from_value(raw.units.as_ref()),
            academic,
            course_type,
            requisites,
            prescribed,
        }
    }
}

fn sanitize_units(u: f64) -> f64 {
    if u.is_finite() && u > 0.0 { u } else { 0.0 }
}

/// Unidades desde un valor JSON arbitrario: número o texto numérico; cualquier
/// otra cosa (o negativo/no finito) vale 0.
pub(crate) fn units_from_value(v: Option<&Value>) -> f64 {
    let n = match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().replace(',', ".").parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    sanitize_units(n)
}

fn flag_from_value(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "si" | "sí" | "x" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Entero no negativo desde un número JSON, aceptando flotantes exactos (1.0).
pub(crate) fn whole_number(n: &serde_json::Number) -> Option<u64> {
    n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
}

pub(crate) fn year_from_value(v: &Value) -> Option<u8> {
    match v {
        Value::Number(n) => whole_number(n).and_then(|y| u8::try_from(y).ok()),
        Value::String(s) => s.trim().parse::<u8>().ok(),
        _ => None,
    }
}
