use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};

use crate::api_json::handlers::{
    AppState, candidates_handler, curricula_list_handler, curriculum_get_handler, export_plan_handler, help_handler,
    validate_plan_handler,
};
use crate::config::AppConfig;

/// Registra las rutas de la API. Se usa tanto en `run_server` como en los tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/curricula", web::get().to(curricula_list_handler))
        .route("/curricula/{id}", web::get().to(curriculum_get_handler))
        .route("/plans/validate", web::post().to(validate_plan_handler))
        .route("/plans/candidates", web::post().to(candidates_handler))
        .route("/plans/export", web::post().to(export_plan_handler))
        .route("/help", web::get().to(help_handler));
}

fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .max_age(3600)
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let bind_addr = config.bind_addr.clone();
    tracing::info!(
        bind = %bind_addr,
        datafiles = %config.datafiles_dir.display(),
        "iniciando servidor"
    );
    if !config.datafiles_dir.is_dir() {
        tracing::warn!(datafiles = %config.datafiles_dir.display(), "el directorio de datafiles no existe");
    }

    let state = web::Data::new(AppState::new(config));
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors(&state.config.cors_origins))
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
