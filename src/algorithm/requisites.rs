// Validación de prerequisitos y correquisitos dentro de la grilla.
//
// Prerequisitos: conjunto OR. Basta con que uno esté en un semestre
// estrictamente anterior; sólo se reporta si fallan todos (y se listan todos).
// Correquisitos: cada uno se revisa por separado y se reporta cada faltante
// que no esté en la misma celda.

use serde::Serialize;

use crate::models::{Course, PlacedCourse, Requisite, SemesterGrid, SemesterKey};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequisiteCheck {
    pub course_id: String,
    pub course_code: String,
    pub semester: SemesterKey,
    /// Vacío si el curso no tiene prerequisitos o alguno se cumple.
    pub unmet_prerequisites: Vec<String>,
    pub unmet_corequisites: Vec<String>,
}

impl RequisiteCheck {
    pub fn is_satisfied(&self) -> bool {
        self.unmet_prerequisites.is_empty() && self.unmet_corequisites.is_empty()
    }
}

/// Código a mostrar para un requisito: el que trae, el del curso ubicado con
/// ese id, o el id tal cual.
fn display_code(req: &Requisite, grid: &SemesterGrid) -> String {
    req.code
        .clone()
        .or_else(|| grid.find(&req.course_id).map(|p| p.course.code.clone()))
        .unwrap_or_else(|| req.course_id.clone())
}

/// Códigos de prerequisitos no cumplidos para `course` ubicado en `semester`.
pub fn unmet_prerequisites(course: &Course, semester: SemesterKey, grid: &SemesterGrid) -> Vec<String> {
    let options: Vec<&Requisite> = course.prerequisites().collect();
    if options.is_empty() {
        return Vec::new();
    }

    let any_met = options
        .iter()
        .any(|req| grid.find(&req.course_id).is_some_and(|p| p.semester < semester));
    if any_met {
        return Vec::new();
    }

    options.iter().map(|req| display_code(req, grid)).collect()
}

/// Códigos de correquisitos que no están en la misma celda que `course`.
pub fn unmet_corequisites(course: &Course, semester: SemesterKey, grid: &SemesterGrid) -> Vec<String> {
    course
        .corequisites()
        .filter(|req| !grid.find(&req.course_id).is_some_and(|p| p.semester == semester))
        .map(|req| display_code(req, grid))
        .collect()
}

pub fn check_course(placed: &PlacedCourse, grid: &SemesterGrid) -> RequisiteCheck {
    RequisiteCheck {
        course_id: placed.course.id.clone(),
        course_code: placed.course.code.clone(),
        semester: placed.semester,
        unmet_prerequisites: unmet_prerequisites(&placed.course, placed.semester, grid),
        unmet_corequisites: unmet_corequisites(&placed.course, placed.semester, grid),
    }
}

/// Revisa todos los cursos de una celda, en orden.
pub fn check_semester(semester: SemesterKey, grid: &SemesterGrid) -> Vec<RequisiteCheck> {
    grid.courses_at(semester).iter().map(|p| check_course(p, grid)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseType, Term};

    fn k(year: u8, term: Term) -> SemesterKey {
        SemesterKey::new(year, term)
    }

    fn curso(id: &str) -> Course {
        Course::new(id, id, 3.0, CourseType::Major)
    }

    #[test]
    fn test_prerequisito_en_semestre_anterior() {
        let mut grid = SemesterGrid::new();
        grid.place(curso("CS101"), k(1, Term::First)).unwrap();
        grid.place(curso("CS102").with_requisite(Requisite::prerequisite("CS101")), k(2, Term::First)).unwrap();

        let placed = grid.find("CS102").unwrap();
        assert!(check_course(placed, &grid).is_satisfied());
    }

    #[test]
    fn test_prerequisito_mismo_semestre_no_cuenta() {
        let mut grid = SemesterGrid::new();
        grid.place(curso("CS101"), k(1, Term::Second)).unwrap();
        grid.place(curso("CS102").with_requisite(Requisite::prerequisite("CS101")), k(1, Term::Second)).unwrap();

        let c = grid.find("CS102").unwrap();
        assert_eq!(unmet_prerequisites(&c.course, c.semester, &grid), vec!["CS101"]);
    }

    #[test]
    fn test_midyear_es_posterior_al_segundo() {
        let mut grid = SemesterGrid::new();
        grid.place(curso("A"), k(1, Term::Second)).unwrap();
        grid.place(curso("B").with_requisite(Requisite::prerequisite("A")), k(1, Term::Midyear)).unwrap();
        grid.place(curso("C").with_requisite(Requisite::prerequisite("B")), k(1, Term::Second)).unwrap();

        let b = grid.find("B").unwrap();
        assert!(check_course(b, &grid).unmet_prerequisites.is_empty());
        let c = grid.find("C").unwrap();
        assert_eq!(check_course(c, &grid).unmet_prerequisites, vec!["B"]);
    }

    #[test]
    fn test_prerequisitos_or() {
        let mut grid = SemesterGrid::new();
        grid.place(curso("A"), k(1, Term::First)).unwrap();
        let x = curso("X").with_requisite(Requisite::prerequisite("A")).with_requisite(Requisite::prerequisite("B"));
        grid.place(x, k(2, Term::First)).unwrap();
        assert!(check_course(grid.find("X").unwrap(), &grid).unmet_prerequisites.is_empty());

        // sin ninguna opción cumplida se listan todas
        grid.remove("A");
        assert_eq!(check_course(grid.find("X").unwrap(), &grid).unmet_prerequisites, vec!["A", "B"]);
    }

    #[test]
    fn test_correquisitos_independientes() {
        let mut grid = SemesterGrid::new();
        let s = k(1, Term::First);
        grid.place(curso("X"), s).unwrap();
        let c = curso("LAB").with_requisite(Requisite::corequisite("X")).with_requisite(Requisite::corequisite("Y"));
        grid.place(c, s).unwrap();

        let check = check_course(grid.find("LAB").unwrap(), &grid);
        assert_eq!(check.unmet_corequisites, vec!["Y"]);
        assert!(check.unmet_prerequisites.is_empty());

        // correquisito en otro semestre tampoco cuenta
        grid.move_course("X", k(1, Term::Second)).unwrap();
        let check = check_course(grid.find("LAB").unwrap(), &grid);
        assert_eq!(check.unmet_corequisites, vec!["X", "Y"]);
    }

    #[test]
    fn test_codigo_del_requisito() {
        let mut grid = SemesterGrid::new();
        grid.place(Course::new("id-1", "MATH1", 3.0, CourseType::Major), k(1, Term::Midyear)).unwrap();
        let mut req = Requisite::prerequisite("id-9");
        req.code = Some("PHYS9".into());
        let c = curso("Z").with_requisite(Requisite::prerequisite("id-1")).with_requisite(req);
        grid.place(c, k(1, Term::First)).unwrap();

        let check = check_course(grid.find("Z").unwrap(), &grid);
        assert_eq!(check.unmet_prerequisites, vec!["MATH1", "PHYS9"]);
    }
}
