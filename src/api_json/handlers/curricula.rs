use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::api_json::handlers::{AppState, curriculum_error_response};
use crate::datafiles::{curriculum_cache_stats, list_curricula};

/// GET /curricula
pub async fn curricula_list_handler(state: web::Data<AppState>) -> impl Responder {
    match list_curricula(&state.config.datafiles_dir) {
        Ok(ids) => HttpResponse::Ok().json(json!({"curricula": ids, "cache": curriculum_cache_stats()})),
        Err(e) => curriculum_error_response(e),
    }
}

/// GET /curricula/{id}
pub async fn curriculum_get_handler(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match state.curriculum(&id) {
        Ok(curriculum) => HttpResponse::Ok().json(curriculum.as_ref()),
        Err(resp) => resp,
    }
}
