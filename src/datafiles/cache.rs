//! Caché en memoria de mallas ya parseadas.
//!
//! La clave es la ruta del archivo resuelto; una entrada se invalida cuando la
//! fecha de modificación del archivo cambia. Las mallas se comparten como `Arc`
//! y el Mutex solo se toma alrededor del acceso al mapa.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::SystemTime;

use serde::Serialize;

use crate::datafiles::{CurriculumError, load_curriculum, resolve_curriculum_path};
use crate::models::Curriculum;

type Entry = (Option<SystemTime>, Arc<Curriculum>);

static CURRICULUM_CACHE: OnceLock<Mutex<HashMap<String, Entry>>> = OnceLock::new();
static HITS: AtomicU64 = AtomicU64::new(0);
static MISSES: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

fn cache() -> MutexGuard<'static, HashMap<String, Entry>> {
    CURRICULUM_CACHE
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Devuelve la malla `id` del directorio, leyéndola de disco solo si no está
/// en caché o si el archivo cambió desde la última lectura.
pub fn get_curriculum_cached(dir: &Path, id: &str) -> Result<Arc<Curriculum>, CurriculumError> {
    let path = resolve_curriculum_path(dir, id)?;
    let key = path.to_string_lossy().to_string();
    let mtime = modified(&path);

    if let Some((cached_mtime, curriculum)) = cache().get(&key) {
        if *cached_mtime == mtime {
            HITS.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(curriculum));
        }
    }

    // La lectura ocurre fuera del lock
    MISSES.fetch_add(1, Ordering::Relaxed);
    let curriculum = Arc::new(load_curriculum(&path)?);
    cache().insert(key, (mtime, Arc::clone(&curriculum)));
    tracing::debug!(path = %path.display(), "malla almacenada en caché");
    Ok(curriculum)
}

pub fn curriculum_cache_stats() -> CacheStats {
    CacheStats {
        hits: HITS.load(Ordering::Relaxed),
        misses: MISSES.load(Ordering::Relaxed),
        entries: cache().len(),
    }
}

/// Vacía el caché; los contadores se conservan.
pub fn clear_curriculum_cache() {
    cache().clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segunda_lectura_usa_cache() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("Cache2020.json"),
            r#"{"courses": [{"id": "c1", "code": "CS101", "units": 3, "type": "Major"}]}"#,
        )
        .unwrap();

        let first = get_curriculum_cached(tmp.path(), "Cache2020").unwrap();
        let hits_before = curriculum_cache_stats().hits;
        let second = get_curriculum_cached(tmp.path(), "cache2020").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(curriculum_cache_stats().hits > hits_before);
        assert!(curriculum_cache_stats().entries >= 1);
    }

    #[test]
    fn test_error_no_se_cachea() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("Rota.json"), "[").unwrap();
        assert!(get_curriculum_cached(tmp.path(), "Rota").is_err());
        assert!(get_curriculum_cached(tmp.path(), "Rota").is_err());
    }
}
