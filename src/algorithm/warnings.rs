/// Agregador de advertencias por semestre y para el plan completo.
///
/// Todo es función pura de la grilla: se recalcula completo en cada cambio.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::algorithm::load::{LoadPolicy, SemesterLoad, semester_load};
use crate::algorithm::requisites::check_semester;
use crate::models::{SemesterGrid, SemesterKey, Warning};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrerequisiteGap {
    pub course: String,
    pub unmet_options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorequisiteGap {
    pub course: String,
    pub unmet_entries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterWarnings {
    pub semester: SemesterKey,
    pub underload: Option<Warning>,
    pub overload: Option<Warning>,
    pub missing_prerequisites: Vec<PrerequisiteGap>,
    pub missing_corequisites: Vec<CorequisiteGap>,
}

impl SemesterWarnings {
    /// Aplana el bundle en la lista de variantes `Warning`.
    pub fn to_warnings(&self) -> Vec<Warning> {
        let mut out: Vec<Warning> = Vec::new();
        out.extend(self.underload.iter().cloned());
        out.extend(self.overload.iter().cloned());
        for gap in &self.missing_prerequisites {
            out.push(Warning::MissingPrerequisite {
                semester: self.semester,
                course: gap.course.clone(),
                unmet: gap.unmet_options.clone(),
            });
        }
        for gap in &self.missing_corequisites {
            out.push(Warning::MissingCorequisite {
                semester: self.semester,
                course: gap.course.clone(),
                unmet: gap.unmet_entries.clone(),
            });
        }
        out
    }

    pub fn load_count(&self) -> usize {
        self.underload.iter().count() + self.overload.iter().count()
    }

    pub fn requisite_count(&self) -> usize {
        self.missing_prerequisites.len() + self.missing_corequisites.len()
    }

    pub fn count(&self) -> usize {
        self.load_count() + self.requisite_count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanWarnings {
    pub semesters: BTreeMap<SemesterKey, SemesterWarnings>,
    pub total_warnings: usize,
    pub load_warnings: usize,
    pub requisite_warnings: usize,
    pub semesters_with_warnings: usize,
}

impl PlanWarnings {
    pub fn get(&self, semester: SemesterKey) -> Option<&SemesterWarnings> {
        self.semesters.get(&semester)
    }

    pub fn all(&self) -> Vec<Warning> {
        self.semesters.values().flat_map(|s| s.to_warnings()).collect()
    }
}

fn bundle(load: &SemesterLoad, grid: &SemesterGrid) -> SemesterWarnings {
    let semester = load.semester;
    let underload = load
        .underloaded
        .then(|| Warning::Underload { semester, units: load.academic_units });
    let overload = load
        .overloaded
        .then(|| Warning::Overload { semester, units: load.academic_units });

    let mut missing_prerequisites = Vec::new();
    let mut missing_corequisites = Vec::new();
    for check in check_semester(semester, grid) {
        if !check.unmet_prerequisites.is_empty() {
            missing_prerequisites.push(PrerequisiteGap {
                course: check.course_code.clone(),
                unmet_options: check.unmet_prerequisites,
            });
        }
        if !check.unmet_corequisites.is_empty() {
            missing_corequisites.push(CorequisiteGap { course: check.course_code, unmet_entries: check.unmet_corequisites });
        }
    }

    SemesterWarnings { semester, underload, overload, missing_prerequisites, missing_corequisites }
}

pub fn semester_warnings(semester: SemesterKey, grid: &SemesterGrid, policy: &LoadPolicy) -> SemesterWarnings {
    let load = semester_load(semester, grid.courses_at(semester), policy);
    bundle(&load, grid)
}

/// Bundle por cada celda de la grilla (incluidas las vacías) más los totales
/// que usa la UI para los badges.
pub fn plan_warnings(grid: &SemesterGrid, policy: &LoadPolicy) -> PlanWarnings {
    let semesters: BTreeMap<SemesterKey, SemesterWarnings> = grid
        .semesters()
        .map(|(key, courses)| (key, bundle(&semester_load(key, courses, policy), grid)))
        .collect();

    let load_warnings = semesters.values().map(SemesterWarnings::load_count).sum();
    let requisite_warnings = semesters.values().map(SemesterWarnings::requisite_count).sum();
    let semesters_with_warnings = semesters.values().filter(|s| !s.is_empty()).count();

    PlanWarnings {
        semesters,
        total_warnings: load_warnings + requisite_warnings,
        load_warnings,
        requisite_warnings,
        semesters_with_warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, CourseType, Requisite, Term};

    #[test]
    fn test_un_curso_de_tres_unidades() {
        let k11 = SemesterKey::new(1, Term::First);
        let mut grid = SemesterGrid::new();
        grid.place(Course::new("A", "CourseA", 3.0, CourseType::Major), k11).unwrap();

        let w = plan_warnings(&grid, &LoadPolicy::default());
        let sem = w.get(k11).unwrap();
        let under = sem.underload.as_ref().expect("debe haber underload");
        assert_eq!(under.detail(), "3 units");
        assert!(sem.overload.is_none());
        assert!(sem.missing_prerequisites.is_empty());
        assert!(sem.missing_corequisites.is_empty());
        assert_eq!(w.total_warnings, 1);
        assert_eq!(w.load_warnings, 1);
    }

    #[test]
    fn test_bundle_con_requisitos() {
        let k = SemesterKey::new(1, Term::Midyear);
        let mut grid = SemesterGrid::new();
        let c = Course::new("lab", "LAB1", 1.0, CourseType::Major)
            .with_requisite(Requisite::prerequisite("p1"))
            .with_requisite(Requisite::corequisite("c1"))
            .with_requisite(Requisite::corequisite("c2"));
        grid.place(c, k).unwrap();

        let sem = semester_warnings(k, &grid, &LoadPolicy::default());
        assert!(sem.underload.is_none());
        assert_eq!(sem.missing_prerequisites, vec![PrerequisiteGap { course: "LAB1".into(), unmet_options: vec!["p1".into()] }]);
        assert_eq!(sem.missing_corequisites[0].unmet_entries, vec!["c1", "c2"]);
        assert_eq!(sem.count(), 2);

        let flat = sem.to_warnings();
        assert_eq!(flat.len(), 2);
        assert!(matches!(flat[1], Warning::MissingCorequisite { .. }));
    }

    #[test]
    fn test_idempotente() {
        let mut grid = SemesterGrid::with_standard_layout(4);
        grid.place(Course::new("a", "A", 21.0, CourseType::Major), SemesterKey::new(1, Term::First)).unwrap();
        grid.place(
            Course::new("b", "B", 3.0, CourseType::Major).with_requisite(Requisite::prerequisite("zz")),
            SemesterKey::new(2, Term::Second),
        )
        .unwrap();

        let p = LoadPolicy::default();
        assert_eq!(plan_warnings(&grid, &p), plan_warnings(&grid, &p));
    }

    #[test]
    fn test_grilla_vacia_sin_advertencias() {
        let w = plan_warnings(&SemesterGrid::with_standard_layout(4), &LoadPolicy::default());
        assert_eq!(w.semesters.len(), 12);
        assert_eq!(w.total_warnings, 0);
        assert_eq!(w.semesters_with_warnings, 0);
        assert!(w.all().is_empty());
    }
}
