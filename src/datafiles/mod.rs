// Carga de mallas desde el directorio de datafiles (.json y planillas).
pub mod io;
pub mod xlsx;
mod cache;

pub use cache::{CacheStats, clear_curriculum_cache, curriculum_cache_stats, get_curriculum_cached};

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::Curriculum;

/// Directorio por defecto cuando la configuración no indica otro.
pub const DEFAULT_DATAFILES_DIR: &str = "datafiles";

const CURRICULUM_EXTENSIONS: [&str; 5] = ["json", "xlsx", "xlsm", "xls", "ods"];

/// Similitud mínima (Levenshtein normalizado) para sugerir otra malla.
const SUGGESTION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Error)]
pub enum CurriculumError {
    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid curriculum JSON in {}: {source}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("failed to read workbook {}: {source}", .path.display())]
    Workbook { path: PathBuf, source: calamine::Error },
    #[error("curriculum '{id}' not found{}", suggestion_suffix(.suggestion))]
    NotFound { id: String, suggestion: Option<String> },
    #[error("invalid curriculum id '{0}'")]
    InvalidId(String),
    #[error("unsupported curriculum format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

impl CurriculumError {
    /// Errores atribuibles a la petición (id mal escrito o inexistente).
    pub fn is_not_found(&self) -> bool {
        matches!(self, CurriculumError::NotFound { .. } | CurriculumError::InvalidId(_))
    }
}

fn is_curriculum_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| CURRICULUM_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false)
}

fn curriculum_files(dir: &Path) -> Result<Vec<PathBuf>, CurriculumError> {
    let entries = std::fs::read_dir(dir).map_err(|source| CurriculumError::Io { path: dir.to_path_buf(), source })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_curriculum_file(p))
        .collect();
    files.sort();
    Ok(files)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(|s| s.to_string())
}

/// Ids de las mallas disponibles (nombre de archivo sin extensión), ordenados y sin repetir.
pub fn list_curricula(dir: &Path) -> Result<Vec<String>, CurriculumError> {
    let mut ids: Vec<String> = curriculum_files(dir)?.iter().filter_map(|p| file_stem(p)).collect();
    ids.sort();
    ids.dedup();
    Ok(ids)
}

/// Ruta del archivo de la malla `id`, comparando sin distinguir mayúsculas.
/// Si no existe, el error sugiere el id más parecido.
pub fn resolve_curriculum_path(dir: &Path, id: &str) -> Result<PathBuf, CurriculumError> {
    let id = id.trim();
    if id.is_empty() || id.contains('/') || id.contains('\\') || id.contains("..") {
        return Err(CurriculumError::InvalidId(id.to_string()));
    }

    let files = curriculum_files(dir)?;
    // .json primero cuando hay dos archivos con el mismo nombre
    let found = files
        .iter()
        .filter(|p| file_stem(p).map(|s| s.eq_ignore_ascii_case(id)).unwrap_or(false))
        .min_by_key(|p| p.extension().map(|e| !e.eq_ignore_ascii_case("json")).unwrap_or(true));
    if let Some(path) = found {
        return Ok(path.clone());
    }

    let wanted = id.to_lowercase();
    let suggestion = files
        .iter()
        .filter_map(|p| file_stem(p))
        .map(|stem| (strsim::normalized_levenshtein(&wanted, &stem.to_lowercase()), stem))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, stem)| stem);

    Err(CurriculumError::NotFound { id: id.to_string(), suggestion })
}

/// Lee y normaliza una malla desde disco (JSON o planilla).
pub fn load_curriculum(path: &Path) -> Result<Curriculum, CurriculumError> {
    let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase()).unwrap_or_default();
    let mut curriculum = match ext.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path)
                .map_err(|source| CurriculumError::Io { path: path.to_path_buf(), source })?;
            serde_json::from_str::<Curriculum>(&text)
                .map_err(|source| CurriculumError::Json { path: path.to_path_buf(), source })?
        }
        "xlsx" | "xlsm" | "xls" | "ods" => xlsx::read_curriculum_workbook(path)?,
        _ => return Err(CurriculumError::UnsupportedFormat(path.to_path_buf())),
    };

    let stem = file_stem(path).unwrap_or_default();
    if curriculum.id.trim().is_empty() {
        curriculum.id = stem.clone();
    }
    if curriculum.name.trim().is_empty() {
        curriculum.name = stem;
    }

    let dropped = curriculum.normalize();
    if dropped > 0 {
        tracing::warn!(path = %path.display(), dropped, "cursos sin id o repetidos descartados");
    }
    for cycle in curriculum.requisite_cycles() {
        tracing::warn!(curriculum = %curriculum.id, cycle = %cycle.join(" -> "), "ciclo de prerequisitos en la malla");
    }

    tracing::info!(
        curriculum = %curriculum.id,
        courses = curriculum.courses.len(),
        quotas = curriculum.quotas.len(),
        "malla cargada"
    );
    Ok(curriculum)
}
