use serde::Serialize;

use crate::algorithm::requisites::unmet_prerequisites;
use crate::models::{Course, CourseType, Curriculum, SemesterGrid, SemesterKey};

/// Curso del catálogo ofrecido en el asistente de selección.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub course: Course,
    /// El semestre sugerido por la malla coincide con el pedido.
    pub prescribed_match: bool,
    /// Los prerequisitos se cumplirían si se ubica en el semestre pedido.
    pub prerequisites_met: bool,
}

/// Cursos aún no ubicados, opcionalmente filtrados por tipo, evaluados
/// contra `target` cuando se indica. Orden: semestre sugerido (sin sugerencia
/// al final) y luego código.
pub fn eligible_courses(
    curriculum: &Curriculum,
    grid: &SemesterGrid,
    course_type: Option<CourseType>,
    target: Option<SemesterKey>,
) -> Vec<Candidate> {
    let mut out: Vec<Candidate> = curriculum
        .courses
        .iter()
        .filter(|c| !grid.contains(&c.id))
        .filter(|c| course_type.is_none_or(|t| c.course_type == t))
        .map(|c| Candidate {
            course: c.clone(),
            prescribed_match: match (target, c.prescribed) {
                (Some(t), Some(p)) => t == p,
                _ => false,
            },
            prerequisites_met: target.is_none_or(|t| unmet_prerequisites(c, t, grid).is_empty()),
        })
        .collect();

    out.sort_by(|a, b| {
        let pa = a.course.prescribed;
        let pb = b.course.prescribed;
        match (pa, pb) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
        .then_with(|| a.course.code.cmp(&b.course.code))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Requisite, Term};

    #[test]
    fn test_candidatos_filtrados_y_ordenados() {
        let k11 = SemesterKey::new(1, Term::First);
        let k21 = SemesterKey::new(2, Term::First);
        let mut m = Curriculum::new("cs", "CS");
        m.courses.push(Course::new("ge2", "GE200", 3.0, CourseType::GeElective).with_prescribed(k21));
        m.courses.push(Course::new("ge1", "GE100", 3.0, CourseType::GeElective).with_prescribed(k11));
        m.courses.push(Course::new("ge9", "GE900", 3.0, CourseType::GeElective));
        m.courses.push(
            Course::new("ge3", "GE300", 3.0, CourseType::GeElective)
                .with_prescribed(k21)
                .with_requisite(Requisite::prerequisite("ge1")),
        );
        m.courses.push(Course::new("cs1", "CS101", 3.0, CourseType::Major));

        let mut grid = SemesterGrid::new();
        grid.place(m.course("ge1").unwrap().clone(), k11).unwrap();

        let cands = eligible_courses(&m, &grid, Some(CourseType::GeElective), Some(k21));
        let codes: Vec<&str> = cands.iter().map(|c| c.course.code.as_str()).collect();
        assert_eq!(codes, vec!["GE200", "GE300", "GE900"]);
        assert!(cands[0].prescribed_match);
        assert!(cands[1].prerequisites_met);
        assert!(!cands[2].prescribed_match);

        let sin_filtro = eligible_courses(&m, &grid, None, None);
        assert_eq!(sin_filtro.len(), 4);
        assert!(sin_filtro.iter().all(|c| c.prerequisites_met));
    }
}
