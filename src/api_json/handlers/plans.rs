use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::algorithm::{eligible_courses, evaluate_plan};
use crate::api_json::handlers::AppState;
use crate::api_json::{parse_candidates_request, parse_plan_request};
use crate::models::seed_grid;

/// POST /plans/validate
/// Siembra la grilla con el plan recibido y devuelve advertencias, carga por
/// semestre y cuotas. Los registros que no se pudieron ubicar van en `skipped`.
pub async fn validate_plan_handler(state: web::Data<AppState>, body: web::Json<serde_json::Value>) -> impl Responder {
    let req = match parse_plan_request(body.into_inner()) {
        Ok(r) => r,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
    };
    let curriculum = match state.curriculum(&req.curriculum) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let load = seed_grid(&req.plan, &curriculum);
    let report = evaluate_plan(&curriculum, &load.grid, &state.config.load_policy);
    tracing::info!(
        curriculum = %curriculum.id,
        entries = req.plan.len(),
        skipped = load.skipped.len(),
        warnings = report.warnings.total_warnings,
        "plan validado"
    );

    HttpResponse::Ok().json(json!({
        "curriculum": curriculum.id,
        "report": report,
        "skipped": load.skipped,
    }))
}

/// POST /plans/candidates
pub async fn candidates_handler(state: web::Data<AppState>, body: web::Json<serde_json::Value>) -> impl Responder {
    let req = match parse_candidates_request(body.into_inner()) {
        Ok(r) => r,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
    };
    let curriculum = match state.curriculum(&req.curriculum) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let load = seed_grid(&req.plan, &curriculum);
    let candidates = eligible_courses(&curriculum, &load.grid, req.course_type, req.target());
    HttpResponse::Ok().json(json!({"total": candidates.len(), "candidates": candidates}))
}

/// POST /plans/export
/// Aplana el plan a los registros que el cliente persiste. No se escribe nada en el servidor.
pub async fn export_plan_handler(state: web::Data<AppState>, body: web::Json<serde_json::Value>) -> impl Responder {
    let req = match parse_plan_request(body.into_inner()) {
        Ok(r) => r,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
    };
    let curriculum = match state.curriculum(&req.curriculum) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let load = seed_grid(&req.plan, &curriculum);
    HttpResponse::Ok().json(json!({
        "curriculum": curriculum.id,
        "exported_at": chrono::Utc::now().to_rfc3339(),
        "entries": load.grid.to_saved_entries(),
        "skipped": load.skipped,
    }))
}
