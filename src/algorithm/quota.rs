/// Seguimiento de cuotas por tipo de curso.
///
/// Para cada tipo contable compara lo declarado por la malla con lo ubicado
/// en la grilla, en total y por cada semestre prescrito.
use serde::Serialize;

use crate::models::{CourseType, Curriculum, SemesterGrid, SemesterKey};

/// Capacidad por semestre para tipos obligatorios: se pueden cursar en
/// cualquier semestre prescrito, así que el tope es prácticamente ilimitado.
pub const REQUIRED_SEMESTER_CEILING: u32 = 99;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterQuota {
    pub semester: SemesterKey,
    pub capacity: u32,
    pub placed: u32,
    pub remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeQuota {
    #[serde(rename = "type")]
    pub course_type: CourseType,
    pub required_total: u32,
    pub placed: u32,
    pub remaining: u32,
    pub semesters: Vec<SemesterQuota>,
}

impl TypeQuota {
    pub fn is_satisfied(&self) -> bool {
        self.remaining == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotaState {
    pub types: Vec<TypeQuota>,
}

impl QuotaState {
    pub fn get(&self, course_type: CourseType) -> Option<&TypeQuota> {
        self.types.iter().find(|q| q.course_type == course_type)
    }

    pub fn placed(&self, course_type: CourseType) -> u32 {
        self.get(course_type).map(|q| q.placed).unwrap_or(0)
    }

    pub fn remaining(&self, course_type: CourseType) -> u32 {
        self.get(course_type).map(|q| q.remaining).unwrap_or(0)
    }

    /// Pendientes del tipo en un semestre prescrito; 0 si el semestre no está prescrito.
    pub fn remaining_at(&self, course_type: CourseType, semester: SemesterKey) -> u32 {
        self.get(course_type)
            .and_then(|q| q.semesters.iter().find(|s| s.semester == semester))
            .map(|s| s.remaining)
            .unwrap_or(0)
    }

    pub fn all_satisfied(&self) -> bool {
        self.types.iter().all(TypeQuota::is_satisfied)
    }
}

/// Calcula el estado de cuotas para la grilla actual. Siempre informa los
/// cinco tipos contables; `Other` nunca se cuenta.
pub fn compute_quotas(curriculum: &Curriculum, grid: &SemesterGrid) -> QuotaState {
    let types = CourseType::COUNTED
        .iter()
        .map(|&course_type| {
            let placed_of_type = |semester: Option<SemesterKey>| -> u32 {
                grid.placed()
                    .filter(|p| p.course.course_type == course_type)
                    .filter(|p| semester.is_none_or(|s| p.semester == s))
                    .count() as u32
            };

            let placed = placed_of_type(None);
            let (required_total, prescribed) = match curriculum.declaration(course_type) {
                Some(decl) => (decl.total, decl.prescribed.as_slice()),
                None => (0, &[][..]),
            };

            let semesters = prescribed
                .iter()
                .map(|p| {
                    let capacity = if course_type.is_required() { REQUIRED_SEMESTER_CEILING } else { p.count };
                    let placed_here = placed_of_type(Some(p.semester));
                    SemesterQuota {
                        semester: p.semester,
                        capacity,
                        placed: placed_here,
                        remaining: capacity.saturating_sub(placed_here),
                    }
                })
                .collect();

            TypeQuota {
                course_type,
                required_total,
                placed,
                remaining: required_total.saturating_sub(placed),
                semesters,
            }
        })
        .collect();

    QuotaState { types }
}
