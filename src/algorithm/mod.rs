// Motor de validación del plan: cuotas, carga, requisitos y advertencias.
pub mod candidates;
pub mod load;
pub mod quota;
pub mod requisites;
pub mod warnings;

pub use candidates::{Candidate, eligible_courses};
pub use load::{LoadPolicy, SemesterLoad, semester_load};
pub use quota::{QuotaState, REQUIRED_SEMESTER_CEILING, SemesterQuota, TypeQuota, compute_quotas};
pub use requisites::{RequisiteCheck, check_course, check_semester, unmet_corequisites, unmet_prerequisites};
pub use warnings::{CorequisiteGap, PlanWarnings, PrerequisiteGap, SemesterWarnings, plan_warnings, semester_warnings};

use serde::Serialize;

use crate::models::{Curriculum, SemesterGrid};

/// Resultado completo de evaluar un plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub warnings: PlanWarnings,
    pub loads: Vec<SemesterLoad>,
    pub quotas: QuotaState,
}

/// Evalúa el plan en una pasada: advertencias, carga por celda y cuotas.
pub fn evaluate_plan(curriculum: &Curriculum, grid: &SemesterGrid, policy: &LoadPolicy) -> PlanReport {
    let loads = grid
        .semesters()
        .map(|(key, courses)| semester_load(key, courses, policy))
        .collect();

    let report = PlanReport {
        warnings: plan_warnings(grid, policy),
        loads,
        quotas: compute_quotas(curriculum, grid),
    };
    tracing::debug!(
        curriculum = %curriculum.id,
        courses = grid.len(),
        warnings = report.warnings.total_warnings,
        "plan evaluado"
    );
    report
}
