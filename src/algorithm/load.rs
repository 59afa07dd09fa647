// Validación de carga académica por semestre.

use serde::{Deserialize, Serialize};

use crate::models::{PlacedCourse, SemesterKey};

/// Umbrales de carga. Por defecto: mínimo 15 y máximo 19 unidades en
/// semestres regulares, máximo 6 en midyear (sin mínimo).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadPolicy {
    pub regular_min_units: f64,
    pub regular_max_units: f64,
    pub midyear_max_units: f64,
}

impl Default for LoadPolicy {
    fn default() -> Self {
        LoadPolicy { regular_min_units: 15.0, regular_max_units: 19.0, midyear_max_units: 6.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterLoad {
    pub semester: SemesterKey,
    pub course_count: usize,
    /// Sólo cursos académicos; es lo que se compara con los umbrales.
    pub academic_units: f64,
    pub total_units: f64,
    pub underloaded: bool,
    pub overloaded: bool,
}

impl SemesterLoad {
    pub fn is_flagged(&self) -> bool {
        self.underloaded || self.overloaded
    }
}

/// Calcula la carga de una celda. Una celda sin cursos nunca se marca.
pub fn semester_load(semester: SemesterKey, courses: &[PlacedCourse], policy: &LoadPolicy) -> SemesterLoad {
    let academic_units: f64 = courses.iter().map(|p| p.course.load_units()).sum();
    let total_units: f64 = courses.iter().map(|p| p.course.units).sum();

    let (underloaded, overloaded) = if courses.is_empty() {
        (false, false)
    } else if semester.term.is_midyear() {
        (false, academic_units > policy.midyear_max_units)
    } else {
        (academic_units < policy.regular_min_units, academic_units > policy.regular_max_units)
    };

    SemesterLoad { semester, course_count: courses.len(), academic_units, total_units, underloaded, overloaded }
}
