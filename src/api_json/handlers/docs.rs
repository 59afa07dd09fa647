use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::api_json::PlanRequest;
use crate::api_json::handlers::AppState;
use crate::models::{PlanEntry, Term};

/// GET /help
pub async fn help_handler(state: web::Data<AppState>) -> impl Responder {
    let example = PlanRequest {
        curriculum: "BSCS2020".to_string(),
        plan: vec![
            PlanEntry::new("cs101", 1, Term::First),
            PlanEntry::new("cs102", 1, Term::Second),
        ],
    };

    let help = json!({
        "description": "API de validación de planes de estudio. Cada endpoint POST recibe el id de la malla y el plan como lista de registros {course_id, year, term}.",
        "endpoints": {
            "GET /curricula": "ids de las mallas disponibles en el directorio de datafiles",
            "GET /curricula/{id}": "definición de la malla (cursos y cuotas)",
            "POST /plans/validate": "advertencias de carga y requisitos, carga por semestre y cuotas",
            "POST /plans/candidates": "cursos aún no ubicados; acepta además type, year y term",
            "POST /plans/export": "registros {course_id, year, term, status, units} listos para guardar",
        },
        "post_example": example,
        "term_values": ["1", "2", "M"],
        "load_policy": state.config.load_policy,
    });

    HttpResponse::Ok().json(help)
}
