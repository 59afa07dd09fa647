pub mod curricula;
pub mod docs;
pub mod plans;

pub use curricula::*;
pub use docs::*;
pub use plans::*;

use std::sync::Arc;

use actix_web::HttpResponse;
use serde_json::json;

use crate::config::AppConfig;
use crate::datafiles::{CurriculumError, get_curriculum_cached};
use crate::models::Curriculum;

/// Estado compartido (inmutable) entre handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        AppState { config }
    }

    /// Malla desde el caché, o la respuesta de error lista para devolver.
    pub(crate) fn curriculum(&self, id: &str) -> Result<Arc<Curriculum>, HttpResponse> {
        get_curriculum_cached(&self.config.datafiles_dir, id).map_err(curriculum_error_response)
    }
}

pub(crate) fn curriculum_error_response(e: CurriculumError) -> HttpResponse {
    if e.is_not_found() {
        HttpResponse::NotFound().json(json!({"error": e.to_string()}))
    } else {
        tracing::error!(error = %e, "no se pudo leer la malla");
        HttpResponse::InternalServerError().json(json!({"error": e.to_string()}))
    }
}
