// Conversión entre el plan persistido (lista plana de registros) y la grilla.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    Curriculum, GridError, PlacedCourse, SemesterGrid, SemesterKey, Term, value_to_string, year_from_value,
};

/// Registro de un plan guardado tal como se lee al cargarlo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPlanEntry")]
pub struct PlanEntry {
    pub course_id: String,
    pub year: Option<u8>,
    pub term: Option<Term>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
}

impl PlanEntry {
    pub fn new(course_id: &str, year: u8, term: Term) -> Self {
        PlanEntry { course_id: course_id.to_string(), year: Some(year), term: Some(term), status: None, grade: None }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPlanEntry {
    #[serde(default, alias = "course", alias = "id", alias = "_id")]
    course_id: Option<Value>,
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    term: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    grade: Option<Value>,
}

impl From<RawPlanEntry> for PlanEntry {
    fn from(raw: RawPlanEntry) -> Self {
        let non_empty = |v: Option<&Value>| v.map(value_to_string).filter(|s| !s.is_empty());
        PlanEntry {
            course_id: non_empty(raw.course_id.as_ref()).unwrap_or_default(),
            year: raw.year.as_ref().and_then(entry_year),
            term: raw.term.as_ref().and_then(Term::from_value),
            status: non_empty(raw.status.as_ref()),
            grade: non_empty(raw.grade.as_ref()),
        }
    }
}

/// Año de un registro. Ausente (null o vacío) es `None`; presente pero fuera
/// de rango (300, -1, "x") queda en 0 para que la grilla lo rechace como año inválido.
fn entry_year(v: &Value) -> Option<u8> {
    if v.is_null() || value_to_string(v).is_empty() {
        return None;
    }
    Some(year_from_value(v).unwrap_or(0))
}

/// Registro que se escribe al guardar el plan: (curso, año, periodo, estado, unidades).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedPlanEntry {
    pub course_id: String,
    pub year: u8,
    pub term: Term,
    pub status: String,
    pub units: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnknownCourse,
    MissingSemester,
    InvalidYear,
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEntry {
    pub course_id: String,
    pub reason: SkipReason,
}

/// Resultado de sembrar la grilla: los registros que no se pudieron ubicar
/// se informan en `skipped` en vez de abortar la carga.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanLoad {
    pub grid: SemesterGrid,
    pub skipped: Vec<SkippedEntry>,
}

/// Construye la grilla a partir de un plan persistido, resolviendo cada
/// curso contra la malla (por id y luego por código).
pub fn seed_grid(entries: &[PlanEntry], curriculum: &Curriculum) -> PlanLoad {
    let mut load = PlanLoad::default();

    for entry in entries {
        let skip = |reason| SkippedEntry { course_id: entry.course_id.clone(), reason };

        let Some(course) = curriculum.resolve(&entry.course_id) else {
            tracing::warn!(course_id = %entry.course_id, curriculum = %curriculum.id, "curso desconocido en el plan, se omite");
            load.skipped.push(skip(SkipReason::UnknownCourse));
            continue;
        };
        let (Some(year), Some(term)) = (entry.year, entry.term) else {
            load.skipped.push(skip(SkipReason::MissingSemester));
            continue;
        };

        let mut placed = PlacedCourse::new(course.clone(), SemesterKey::new(year, term));
        if let Some(status) = &entry.status {
            placed.status = status.clone();
        }
        placed.grade = entry.grade.clone();

        match load.grid.place_entry(placed) {
            Ok(()) => {}
            Err(GridError::InvalidYear(_)) => load.skipped.push(skip(SkipReason::InvalidYear)),
            Err(GridError::DuplicatePlacement { .. }) => {
                tracing::debug!(course_id = %entry.course_id, "curso repetido en el plan, se conserva el primero");
                load.skipped.push(skip(SkipReason::Duplicate));
            }
            Err(GridError::NotPlaced(_)) => {}
        }
    }

    load
}

impl SemesterGrid {
    /// Aplana la grilla en registros para guardar, en orden (año, periodo).
    pub fn to_saved_entries(&self) -> Vec<SavedPlanEntry> {
        self.placed()
            .map(|p| SavedPlanEntry {
                course_id: p.course.id.clone(),
                year: p.semester.year,
                term: p.semester.term,
                status: p.status.clone(),
                units: p.course.units,
            })
            .collect()
    }
}
