// Cuerpos JSON de la API de planes y su parseo.
pub mod handlers;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::{CourseType, PlanEntry, SemesterKey, Term, year_from_value};

/// Cuerpo de `POST /plans/validate` y `POST /plans/export`.
///
/// ```json
/// {
///   "curriculum": "BSCS2020",
///   "plan": [
///     {"course_id": "cs101", "year": 1, "term": "1"},
///     {"course_id": "cs102", "year": 1, "term": "2", "status": "planned"}
///   ]
/// }
/// ```
///
/// `curriculum` es el id de la malla (nombre del datafile sin extensión).
/// Los registros del plan aceptan `course_id`, `course`, `id` o `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub curriculum: String,
    #[serde(default)]
    pub plan: Vec<PlanEntry>,
}

/// Cuerpo de `POST /plans/candidates`: el plan actual más el filtro opcional
/// de tipo y el semestre donde se quiere ubicar el curso.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatesRequest {
    pub curriculum: String,
    #[serde(default)]
    pub plan: Vec<PlanEntry>,
    #[serde(default, rename = "type", alias = "course_type")]
    pub course_type: Option<CourseType>,
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub term: Option<Value>,
}

impl CandidatesRequest {
    /// Semestre destino, sólo si vienen año (>= 1) y periodo válidos.
    pub fn target(&self) -> Option<SemesterKey> {
        let year = self.year.as_ref().and_then(year_from_value).filter(|y| *y >= 1)?;
        let term = self.term.as_ref().and_then(Term::from_value)?;
        Some(SemesterKey::new(year, term))
    }
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),
    #[error("curriculum is required")]
    MissingCurriculum,
}

trait CurriculumRequest {
    fn curriculum_id(&self) -> &str;
}

impl CurriculumRequest for PlanRequest {
    fn curriculum_id(&self) -> &str {
        &self.curriculum
    }
}

impl CurriculumRequest for CandidatesRequest {
    fn curriculum_id(&self) -> &str {
        &self.curriculum
    }
}

fn require_curriculum<T: CurriculumRequest>(req: T) -> Result<T, RequestError> {
    if req.curriculum_id().trim().is_empty() {
        Err(RequestError::MissingCurriculum)
    } else {
        Ok(req)
    }
}

/// Parsea el cuerpo de validación/exportación desde texto JSON.
pub fn parse_json_input(json_str: &str) -> Result<PlanRequest, RequestError> {
    let req: PlanRequest = serde_json::from_str(json_str)?;
    require_curriculum(req)
}

/// Igual que `parse_json_input` pero desde un `Value` ya deserializado por actix.
pub fn parse_plan_request(body: Value) -> Result<PlanRequest, RequestError> {
    let req: PlanRequest = serde_json::from_value(body)?;
    require_curriculum(req)
}

pub fn parse_candidates_request(body: Value) -> Result<CandidatesRequest, RequestError> {
    let req: CandidatesRequest = serde_json::from_value(body)?;
    require_curriculum(req)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_plan_request_alias_y_tolerancia() {
        let req = parse_json_input(
            r#"{"curriculum": "BSCS2020", "plan": [
                {"course": "cs101", "year": "1", "term": 1},
                {"_id": "cs102", "year": 1, "term": "M", "status": "passed"},
                {"course_id": "cs103"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(req.plan.len(), 3);
        assert_eq!(req.plan[0], PlanEntry::new("cs101", 1, Term::First));
        assert_eq!(req.plan[1].term, Some(Term::Midyear));
        assert_eq!(req.plan[1].status.as_deref(), Some("passed"));
        assert_eq!(req.plan[2].year, None);
    }

    #[test]
    fn test_plan_vacio_y_curriculum_requerido() {
        let req = parse_plan_request(json!({"curriculum": "X"})).unwrap();
        assert!(req.plan.is_empty());

        assert!(matches!(parse_plan_request(json!({"curriculum": "  "})), Err(RequestError::MissingCurriculum)));
        assert!(matches!(parse_plan_request(json!({"plan": []})), Err(RequestError::InvalidBody(_))));
        assert!(matches!(parse_json_input("no json"), Err(RequestError::InvalidBody(_))));
    }

    #[test]
    fn test_candidates_target() {
        let req = parse_candidates_request(json!({
            "curriculum": "X", "type": "GE Elective", "year": 2, "term": "M"
        }))
        .unwrap();
        assert_eq!(req.course_type, Some(CourseType::GeElective));
        assert_eq!(req.target(), Some(SemesterKey::new(2, Term::Midyear)));

        let sin_periodo = parse_candidates_request(json!({"curriculum": "X", "year": 2})).unwrap();
        assert_eq!(sin_periodo.target(), None);
        assert_eq!(sin_periodo.course_type, None);

        let anio_cero = parse_candidates_request(json!({"curriculum": "X", "year": 0, "term": 1})).unwrap();
        assert_eq!(anio_cero.target(), None);
    }
}
