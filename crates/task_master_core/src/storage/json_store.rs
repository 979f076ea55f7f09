use crate::error::StoreError;
use crate::model::Task;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "tasks.json";
const STORE_ENV_VAR: &str = "TASK_MASTER_STORE_PATH";

/// The whole task collection, keyed by id. A `BTreeMap` keeps iteration
/// order stable for a given in-memory state.
pub type TaskMap = BTreeMap<String, Task>;

/// Serialize/deserialize the full collection to one file. The store calls
/// `persist` after every mutation; there is no incremental format. The file
/// is exclusively owned by one store at a time.
pub trait PersistenceBackend {
    fn persist(&self, tasks: &TaskMap) -> Result<(), StoreError>;
    fn restore(&self) -> Result<TaskMap, StoreError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredTasks {
    schema_version: u32,
    tasks: TaskMap,
}

/// Resolve the persistence file path: `TASK_MASTER_STORE_PATH` if set,
/// otherwise a per-user default location.
pub fn store_path() -> Result<PathBuf, StoreError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata = std::env::var("APPDATA")
            .map_err(|_| StoreError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("task_master")
            .join(STORE_FILE_NAME))
    } else {
        let home =
            std::env::var("HOME").map_err(|_| StoreError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("task_master")
            .join(STORE_FILE_NAME))
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceBackend for JsonFileBackend {
    fn persist(&self, tasks: &TaskMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| StoreError::io(err.to_string()))?;
        }

        let stored = StoredTasks {
            schema_version: SCHEMA_VERSION,
            tasks: tasks.clone(),
        };
        let content = serde_json::to_string_pretty(&stored)
            .map_err(|err| StoreError::invalid_data(err.to_string()))?;
        std::fs::write(&self.path, content).map_err(|err| StoreError::io(err.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions)
                .map_err(|err| StoreError::io(err.to_string()))?;
        }

        tracing::debug!(path = %self.path.display(), tasks = tasks.len(), "persisted task collection");
        Ok(())
    }

    fn restore(&self) -> Result<TaskMap, StoreError> {
        if !self.path.exists() {
            // First-run bootstrap: materialize the empty collection on disk.
            let empty = TaskMap::new();
            self.persist(&empty)?;
            return Ok(empty);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|err| StoreError::io(err.to_string()))?;
        let stored: StoredTasks = serde_json::from_str(&content)
            .map_err(|err| StoreError::invalid_data(err.to_string()))?;

        if stored.schema_version != SCHEMA_VERSION {
            return Err(StoreError::invalid_data("schema_version mismatch"));
        }

        Ok(stored.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonFileBackend, PersistenceBackend, SCHEMA_VERSION, TaskMap};
    use crate::model::{ETA_FORMAT, Status, Task};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use time::PrimitiveDateTime;

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("task_master-{nanos}-{file_name}"))
    }

    fn sample_task(id: &str, eta: &str) -> Task {
        Task {
            id: id.to_string(),
            description: "demo".to_string(),
            eta: PrimitiveDateTime::parse(eta, ETA_FORMAT).unwrap(),
            status: Status::Open,
        }
    }

    #[test]
    fn persist_and_restore_round_trip() {
        let path = temp_path("tasks.json");
        let backend = JsonFileBackend::new(&path);
        let mut tasks = TaskMap::new();
        let task = sample_task("task-1", "2023-06-20T14:00:00");
        tasks.insert(task.id.clone(), task.clone());

        backend.persist(&tasks).unwrap();
        let restored = backend.restore().unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(restored, tasks);
        assert_eq!(restored["task-1"].eta, task.eta);
    }

    #[test]
    fn restore_bootstraps_missing_file() {
        let path = temp_path("bootstrap.json");
        let backend = JsonFileBackend::new(&path);

        let restored = backend.restore().unwrap();
        let created = path.exists();
        fs::remove_file(&path).ok();

        assert!(restored.is_empty());
        assert!(created);
    }

    #[test]
    fn restore_rejects_corrupt_file() {
        let path = temp_path("corrupt.json");
        fs::write(&path, "{ not json ").unwrap();

        let err = JsonFileBackend::new(&path).restore().unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn restore_rejects_schema_version_mismatch() {
        let path = temp_path("bad-schema.json");
        let bad = format!(
            "{{\n  \"schema_version\": {},\n  \"tasks\": {{}}\n}}",
            SCHEMA_VERSION + 1
        );
        fs::write(&path, bad).unwrap();

        let err = JsonFileBackend::new(&path).restore().unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn persist_overwrites_prior_contents() {
        let path = temp_path("overwrite.json");
        let backend = JsonFileBackend::new(&path);
        let mut tasks = TaskMap::new();
        let task = sample_task("task-1", "2023-06-20T14:00:00");
        tasks.insert(task.id.clone(), task);

        backend.persist(&tasks).unwrap();
        backend.persist(&TaskMap::new()).unwrap();
        let restored = backend.restore().unwrap();
        fs::remove_file(&path).ok();

        assert!(restored.is_empty());
    }
}
