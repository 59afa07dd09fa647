// --- mallaplan: servicio de validación de planes de estudio ---

use mallaplan::config::AppConfig;
use mallaplan::run_server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::from_env();

    // RUST_LOG se lee después de cargar .env
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    tracing::info!(policy = ?config.load_policy, "configuración cargada");
    run_server(config).await
}
