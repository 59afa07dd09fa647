use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::{Course, whole_number};

/// Periodo dentro de un año. El orden derivado (First < Second < Midyear) es
/// el que usan las comparaciones de prerequisitos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "String")]
pub enum Term {
    First,
    Second,
    Midyear,
}

impl Term {
    pub const ALL: [Term; 3] = [Term::First, Term::Second, Term::Midyear];

    pub fn parse(raw: &str) -> Option<Term> {
        match raw.trim().to_lowercase().as_str() {
            "1" | "first" | "1st" | "primer" => Some(Term::First),
            "2" | "second" | "2nd" | "segundo" => Some(Term::Second),
            "3" | "m" | "midyear" | "mid-year" | "summer" => Some(Term::Midyear),
            _ => None,
        }
    }

    pub fn from_value(v: &Value) -> Option<Term> {
        match v {
            Value::Number(n) => match whole_number(n)? {
                1 => Some(Term::First),
                2 => Some(Term::Second),
                3 => Some(Term::Midyear),
                _ => None,
            },
            Value::String(s) => Term::parse(s),
            _ => None,
        }
    }

    pub fn is_midyear(&self) -> bool {
        *self == Term::Midyear
    }

    pub fn label(&self) -> &'static str {
        match self {
            Term::First => "1",
            Term::Second => "2",
            Term::Midyear => "M",
        }
    }
}

impl TryFrom<Value> for Term {
    type Error = String;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        Term::from_value(&v).ok_or_else(|| format!("invalid term: {}", v))
    }
}

impl From<Term> for String {
    fn from(t: Term) -> Self {
        t.label().to_string()
    }
}

/// Celda (año, periodo) de la grilla. Se serializa como `"<año>-<periodo>"`,
/// p. ej. `"1-2"` o `"3-M"`, para poder usarse como clave de mapa en JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SemesterKey {
    pub year: u8,
    pub term: Term,
}

impl SemesterKey {
    pub fn new(year: u8, term: Term) -> Self {
        SemesterKey { year, term }
    }

    pub fn parse(raw: &str) -> Option<SemesterKey> {
        let (y, t) = raw.trim().split_once('-')?;
        let year = y.trim().parse::<u8>().ok()?;
        Some(SemesterKey::new(year, Term::parse(t)?))
    }
}

impl fmt::Display for SemesterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.term.label())
    }
}

impl TryFrom<String> for SemesterKey {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        SemesterKey::parse(&s).ok_or_else(|| format!("invalid semester key: {}", s))
    }
}

impl From<SemesterKey> for String {
    fn from(k: SemesterKey) -> Self {
        k.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedCourse {
    #[serde(flatten)]
    pub course: Course,
    pub semester: SemesterKey,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
}

impl PlacedCourse {
    pub const DEFAULT_STATUS: &'static str = "planned";

    pub fn new(course: Course, semester: SemesterKey) -> Self {
        PlacedCourse { course, semester, status: Self::DEFAULT_STATUS.to_string(), grade: None }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("course '{course_id}' is already placed in {semester}")]
    DuplicatePlacement { course_id: String, semester: SemesterKey },
    #[error("invalid year {0}: years start at 1")]
    InvalidYear(u8),
    #[error("course '{0}' is not placed in the grid")]
    NotPlaced(String),
}

/// Grilla de semestres: (año, periodo) -> cursos en orden de inserción.
///
/// Un mismo id de curso aparece como mucho en una celda.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SemesterGrid {
    cells: BTreeMap<SemesterKey, Vec<PlacedCourse>>,
}

impl SemesterGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grilla vacía con las celdas de `years` años x 3 periodos ya creadas.
    pub fn with_standard_layout(years: u8) -> Self {
        let mut grid = Self::new();
        for year in 1..=years {
            for term in Term::ALL {
                grid.ensure_semester(SemesterKey::new(year, term));
            }
        }
        grid
    }

    pub fn ensure_semester(&mut self, semester: SemesterKey) {
        self.cells.entry(semester).or_default();
    }

    pub fn place(&mut self, course: Course, semester: SemesterKey) -> Result<(), GridError> {
        self.place_entry(PlacedCourse::new(course, semester))
    }

    pub fn place_entry(&mut self, placed: PlacedCourse) -> Result<(), GridError> {
        let semester = placed.semester;
        if semester.year == 0 {
            return Err(GridError::InvalidYear(semester.year));
        }
        if let Some(existing) = self.find(&placed.course.id) {
            return Err(GridError::DuplicatePlacement {
                course_id: placed.course.id.clone(),
                semester: existing.semester,
            });
        }
        self.cells.entry(semester).or_default().push(placed);
        Ok(())
    }

    /// Quita el curso de la grilla. La celda queda aunque quede vacía.
    pub fn remove(&mut self, course_id: &str) -> Option<PlacedCourse> {
        for courses in self.cells.values_mut() {
            if let Some(pos) = courses.iter().position(|p| p.course.id == course_id) {
                return Some(courses.remove(pos));
            }
        }
        None
    }

    /// Mueve un curso ya ubicado a otra celda (drag-and-drop).
    pub fn move_course(&mut self, course_id: &str, to: SemesterKey) -> Result<(), GridError> {
        if to.year == 0 {
            return Err(GridError::InvalidYear(to.year));
        }
        let mut placed = self
            .remove(course_id)
            .ok_or_else(|| GridError::NotPlaced(course_id.to_string()))?;
        placed.semester = to;
        self.cells.entry(to).or_default().push(placed);
        Ok(())
    }

    pub fn find(&self, course_id: &str) -> Option<&PlacedCourse> {
        self.placed().find(|p| p.course.id == course_id)
    }

    pub fn contains(&self, course_id: &str) -> bool {
        self.find(course_id).is_some()
    }

    pub fn courses_at(&self, semester: SemesterKey) -> &[PlacedCourse] {
        self.cells.get(&semester).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Celdas en orden (año, periodo), incluidas las vacías.
    pub fn semesters(&self) -> impl Iterator<Item = (SemesterKey, &[PlacedCourse])> {
        self.cells.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn placed(&self) -> impl Iterator<Item = &PlacedCourse> {
        self.cells.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CourseType;

    fn curso(id: &str) -> Course {
        Course::new(id, id, 3.0, CourseType::Major)
    }

    #[test]
    fn test_orden_de_periodos() {
        assert!(Term::First < Term::Second);
        assert!(Term::Second < Term::Midyear);
        assert!(SemesterKey::new(1, Term::Midyear) < SemesterKey::new(2, Term::First));
    }

    #[test]
    fn test_semester_key_texto() {
        let k = SemesterKey::new(2, Term::Midyear);
        assert_eq!(k.to_string(), "2-M");
        assert_eq!(SemesterKey::parse("2-M"), Some(k));
        assert_eq!(SemesterKey::parse("1-midyear"), Some(SemesterKey::new(1, Term::Midyear)));
        assert_eq!(SemesterKey::parse("abc"), None);
        assert_eq!(serde_json::to_string(&k).unwrap(), "\"2-M\"");
    }

    #[test]
    fn test_no_permite_duplicados() {
        let mut grid = SemesterGrid::new();
        let k11 = SemesterKey::new(1, Term::First);
        let k12 = SemesterKey::new(1, Term::Second);
        grid.place(curso("CS101"), k11).unwrap();
        let err = grid.place(curso("CS101"), k12).unwrap_err();
        assert_eq!(err, GridError::DuplicatePlacement { course_id: "CS101".into(), semester: k11 });
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_rechaza_anio_cero() {
        let mut grid = SemesterGrid::new();
        let err = grid.place(curso("CS101"), SemesterKey::new(0, Term::First)).unwrap_err();
        assert_eq!(err, GridError::InvalidYear(0));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_mover_y_quitar() {
        let mut grid = SemesterGrid::with_standard_layout(4);
        assert_eq!(grid.semesters().count(), 12);

        let k11 = SemesterKey::new(1, Term::First);
        let k21 = SemesterKey::new(2, Term::First);
        grid.place(curso("CS101"), k11).unwrap();
        grid.move_course("CS101", k21).unwrap();
        assert!(grid.courses_at(k11).is_empty());
        assert_eq!(grid.find("CS101").map(|p| p.semester), Some(k21));

        assert_eq!(grid.move_course("NOPE", k11), Err(GridError::NotPlaced("NOPE".into())));

        let removed = grid.remove("CS101").unwrap();
        assert_eq!(removed.course.id, "CS101");
        assert!(grid.is_empty());
        assert_eq!(grid.semesters().count(), 12);
    }
}
