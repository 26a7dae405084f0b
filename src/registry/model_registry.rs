//! Lazily constructed, name-keyed model registry.
//!
//! The registry enumerates its model directory once at construction and
//! records one entry per recognized file. Entries are constructed on first
//! `get` (lazy mode) or at construction time (eager mode). Construction is
//! guarded per entry by a `OnceLock`: concurrent first accesses to the same
//! name block on a single constructor and then all observe the same handle,
//! while unrelated names never serialize against each other.
//!
//! A failed construction is permanent for the process lifetime: retrying an
//! expensive failing load on every access would silently repeat the cost
//! under load.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::{info, warn};

use crate::error::{Result, ServiceError};

/// Recognized model-file extension; files without it are ignored during the
/// directory scan.
pub const MODEL_FILE_EXTENSION: &str = ".h5";

/// An expensive, named resource consumed by handlers.
///
/// The on-disk format is opaque to the engine; the blob is handed as-is to
/// whatever inference backend the handlers wire in.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    path: PathBuf,
    data: Vec<u8>,
}

impl Model {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Constructs a model from its backing file.
///
/// The seam that lets tests count constructions and production wire in a
/// real deserializer.
pub trait ModelLoader: Send + Sync {
    fn load(&self, name: &str, path: &Path) -> Result<Model>;
}

/// Default loader: reads the file bytes as an opaque blob.
#[derive(Debug, Default)]
pub struct FileModelLoader;

impl ModelLoader for FileModelLoader {
    fn load(&self, name: &str, path: &Path) -> Result<Model> {
        let data = std::fs::read(path).map_err(|e| ServiceError::ModelLoadError {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Model::new(name, path, data))
    }
}

struct ModelEntry {
    path: PathBuf,
    /// Resolves exactly once to the constructed handle or the permanent
    /// failure for this name.
    cell: OnceLock<Result<Arc<Model>>>,
}

/// Thread-safe name-to-model registry with get-or-create semantics.
pub struct ModelRegistry {
    entries: HashMap<String, ModelEntry>,
    loader: Arc<dyn ModelLoader>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ModelRegistry {
    /// Scan `models_path` and build an entry per `*.h5` file, named by the
    /// filename with the extension stripped.
    pub fn from_directory(models_path: &Path, lazy: bool) -> Result<Self> {
        Self::with_loader(models_path, lazy, Arc::new(FileModelLoader))
    }

    /// Like [`from_directory`](Self::from_directory) with a custom loader.
    pub fn with_loader(
        models_path: &Path,
        lazy: bool,
        loader: Arc<dyn ModelLoader>,
    ) -> Result<Self> {
        let mut entries = HashMap::new();

        let dir = std::fs::read_dir(models_path).map_err(|e| {
            ServiceError::Configuration(format!(
                "cannot read models directory '{}': {e}",
                models_path.display()
            ))
        })?;

        for dir_entry in dir {
            let dir_entry = dir_entry.map_err(|e| {
                ServiceError::Configuration(format!(
                    "cannot read models directory '{}': {e}",
                    models_path.display()
                ))
            })?;
            let file_name = dir_entry.file_name().to_string_lossy().into_owned();
            if let Some(name) = file_name.strip_suffix(MODEL_FILE_EXTENSION) {
                entries.insert(
                    name.to_string(),
                    ModelEntry {
                        path: dir_entry.path(),
                        cell: OnceLock::new(),
                    },
                );
            }
        }

        info!(
            models_path = %models_path.display(),
            model_count = entries.len(),
            lazy = lazy,
            "Model registry initialized"
        );

        let registry = Self { entries, loader };

        if !lazy {
            // Eager mode: every entry resolves to Ready or Failed right now.
            // Individual load failures are recorded, not fatal; they surface
            // on first access of the failed name.
            let names: Vec<String> = registry.entries.keys().cloned().collect();
            for name in names {
                if let Err(e) = registry.get(&name) {
                    warn!(model = %name, error = %e, "Eager model load failed");
                }
            }
        }

        Ok(registry)
    }

    /// Get-or-create the model registered under `name`.
    ///
    /// Safe to call from many worker threads concurrently for the same or
    /// different names. Blocks only while this entry's single constructor is
    /// running; resolved entries return without locking.
    pub fn get(&self, name: &str) -> Result<Arc<Model>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| ServiceError::ModelNotFound {
                name: name.to_string(),
            })?;

        entry
            .cell
            .get_or_init(|| {
                info!(model = %name, "Loading model");
                self.loader.load(name, &entry.path).map(Arc::new)
            })
            .clone()
    }

    /// Whether the entry has resolved (to either a handle or a permanent
    /// failure).
    pub fn is_resolved(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .map(|entry| entry.cell.get().is_some())
            .unwrap_or(false)
    }

    /// All discoverable model names.
    pub fn model_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn model_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(format!("{name}.h5")), b"weights").unwrap();
        }
        dir
    }

    /// Loader that counts constructions and can be told to fail.
    struct CountingLoader {
        constructions: AtomicUsize,
        fail: bool,
        delay: std::time::Duration,
    }

    impl CountingLoader {
        fn new() -> Self {
            Self {
                constructions: AtomicUsize::new(0),
                fail: false,
                delay: std::time::Duration::ZERO,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        fn slow(delay: std::time::Duration) -> Self {
            Self {
                delay,
                ..Self::new()
            }
        }

        fn count(&self) -> usize {
            self.constructions.load(Ordering::SeqCst)
        }
    }

    impl ModelLoader for CountingLoader {
        fn load(&self, name: &str, path: &Path) -> Result<Model> {
            self.constructions.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
            if self.fail {
                return Err(ServiceError::ModelLoadError {
                    name: name.to_string(),
                    reason: "stub failure".to_string(),
                });
            }
            Ok(Model::new(name, path, vec![0u8; 4]))
        }
    }

    #[test]
    fn test_directory_scan_strips_extension_and_filters() {
        let dir = model_dir(&["A-alaska2-nsf5", "A-alaska2-lsbr"]);
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let registry = ModelRegistry::from_directory(dir.path(), true).unwrap();
        let mut names = registry.model_names();
        names.sort_unstable();
        assert_eq!(names, vec!["A-alaska2-lsbr", "A-alaska2-nsf5"]);
    }

    #[test]
    fn test_missing_directory_is_configuration_error() {
        let err = ModelRegistry::from_directory(Path::new("/no/such/dir"), true).unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)));
    }

    #[test]
    fn test_lazy_mode_defers_construction() {
        let dir = model_dir(&["model-a"]);
        let loader = Arc::new(CountingLoader::new());
        let registry =
            ModelRegistry::with_loader(dir.path(), true, loader.clone()).unwrap();

        assert_eq!(loader.count(), 0);
        assert!(!registry.is_resolved("model-a"));

        let model = registry.get("model-a").unwrap();
        assert_eq!(model.name(), "model-a");
        assert_eq!(loader.count(), 1);
        assert!(registry.is_resolved("model-a"));

        // Cached thereafter.
        let again = registry.get("model-a").unwrap();
        assert!(Arc::ptr_eq(&model, &again));
        assert_eq!(loader.count(), 1);
    }

    #[test]
    fn test_eager_mode_constructs_at_startup() {
        let dir = model_dir(&["model-a", "model-b"]);
        let loader = Arc::new(CountingLoader::new());
        let registry =
            ModelRegistry::with_loader(dir.path(), false, loader.clone()).unwrap();

        assert_eq!(loader.count(), 2);
        assert!(registry.is_resolved("model-a"));
        assert!(registry.is_resolved("model-b"));
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let dir = model_dir(&["model-a"]);
        let registry = ModelRegistry::from_directory(dir.path(), true).unwrap();

        let err = registry.get("model-z").unwrap_err();
        assert_eq!(
            err,
            ServiceError::ModelNotFound {
                name: "model-z".to_string()
            }
        );
    }

    #[test]
    fn test_failed_load_is_permanent() {
        let dir = model_dir(&["model-a"]);
        let loader = Arc::new(CountingLoader::failing());
        let registry =
            ModelRegistry::with_loader(dir.path(), true, loader.clone()).unwrap();

        assert!(matches!(
            registry.get("model-a"),
            Err(ServiceError::ModelLoadError { .. })
        ));
        assert!(matches!(
            registry.get("model-a"),
            Err(ServiceError::ModelLoadError { .. })
        ));
        // The failing constructor ran exactly once; no retry-on-access.
        assert_eq!(loader.count(), 1);
    }

    #[test]
    fn test_concurrent_first_access_constructs_once() {
        let dir = model_dir(&["model-a"]);
        let loader = Arc::new(CountingLoader::slow(std::time::Duration::from_millis(50)));
        let registry = Arc::new(
            ModelRegistry::with_loader(dir.path(), true, loader.clone()).unwrap(),
        );

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.get("model-a").unwrap())
            })
            .collect();

        let handles: Vec<Arc<Model>> =
            threads.into_iter().map(|t| t.join().unwrap()).collect();

        assert_eq!(loader.count(), 1);
        for handle in &handles[1..] {
            assert!(Arc::ptr_eq(&handles[0], handle));
        }
    }

    #[test]
    fn test_file_loader_reads_blob() {
        let dir = model_dir(&["model-a"]);
        let registry = ModelRegistry::from_directory(dir.path(), true).unwrap();

        let model = registry.get("model-a").unwrap();
        assert_eq!(model.data(), b"weights");
        assert_eq!(model.size_bytes(), 7);
    }
}
