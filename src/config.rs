// Configuración del servicio desde variables de entorno (con soporte `.env`).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::algorithm::LoadPolicy;
use crate::datafiles::DEFAULT_DATAFILES_DIR;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub datafiles_dir: PathBuf,
    pub cors_origins: Vec<String>,
    pub load_policy: LoadPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            datafiles_dir: PathBuf::from(DEFAULT_DATAFILES_DIR),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            load_policy: LoadPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Lee `.env` si existe y luego el entorno del proceso.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración consultando cada variable con `lookup`.
    /// Valores vacíos se ignoran; valores inválidos se registran y se usa el default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = AppConfig::default();

        if let Some(bind) = get("MALLAPLAN_BIND") {
            cfg.bind_addr = bind;
        }
        if let Some(dir) = get("MALLAPLAN_DATAFILES_DIR") {
            cfg.datafiles_dir = PathBuf::from(dir);
        }
        if let Some(origins) = get("MALLAPLAN_CORS_ORIGINS") {
            cfg.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        let policy = &mut cfg.load_policy;
        policy.regular_min_units = parse_or("MALLAPLAN_MIN_UNITS", get("MALLAPLAN_MIN_UNITS"), policy.regular_min_units);
        policy.regular_max_units = parse_or("MALLAPLAN_MAX_UNITS", get("MALLAPLAN_MAX_UNITS"), policy.regular_max_units);
        policy.midyear_max_units =
            parse_or("MALLAPLAN_MIDYEAR_MAX_UNITS", get("MALLAPLAN_MIDYEAR_MAX_UNITS"), policy.midyear_max_units);

        if policy.regular_min_units > policy.regular_max_units {
            tracing::warn!(
                min = policy.regular_min_units,
                max = policy.regular_max_units,
                "mínimo de unidades mayor que el máximo; se usan los valores por defecto"
            );
            let defaults = LoadPolicy::default();
            policy.regular_min_units = defaults.regular_min_units;
            policy.regular_max_units = defaults.regular_max_units;
        }

        cfg
    }
}

fn parse_or(key: &str, raw: Option<String>, default: f64) -> f64 {
    let Some(raw) = raw else {
        return default;
    };
    match f64::from_str(&raw) {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => {
            tracing::warn!(key, value = %raw, default, "valor inválido en configuración; se usa el valor por defecto");
            default
        }
    }
}
