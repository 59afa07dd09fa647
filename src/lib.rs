// Biblioteca raíz del crate `mallaplan`.
// Motor de validación de planes (grilla, cuotas, carga, requisitos y
// advertencias) más la carga de mallas y la API HTTP que lo expone.
pub mod algorithm;
pub mod api_json;
pub mod config;
pub mod datafiles;
pub mod models;
pub mod server;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
