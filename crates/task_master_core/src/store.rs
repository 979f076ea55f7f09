//! The task store: owns the in-memory collection and composes the schema
//! validator, identifier generator, and persistence backend. Mutations
//! persist the whole collection before returning; reads hand out owned
//! clones. One caller at a time; concurrent adapters must serialize calls.

use crate::error::StoreError;
use crate::ident::new_task_id;
use crate::model::{Status, Task};
use crate::schema::{TaskPayload, validate};
use crate::storage::{PersistenceBackend, TaskMap};
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

pub struct TaskStore<B: PersistenceBackend> {
    backend: B,
    tasks: TaskMap,
}

impl<B: PersistenceBackend> TaskStore<B> {
    pub fn open(backend: B) -> Result<Self, StoreError> {
        let tasks = backend.restore()?;
        Ok(Self { backend, tasks })
    }

    /// Assigns a fresh id; any payload id is ignored on create.
    pub fn create(&mut self, payload: &TaskPayload) -> Result<Task, StoreError> {
        let mut valid = validate(payload).map_err(|err| {
            tracing::warn!(error = %err, "rejected task payload on create");
            StoreError::InvalidTask(err)
        })?;
        valid.id = None;
        let task = valid.into_task(new_task_id());
        self.tasks.insert(task.id.clone(), task.clone());
        self.backend.persist(&self.tasks)?;

        Ok(task)
    }

    /// Unknown ids yield an empty sequence, not an error.
    pub fn get(&self, id: Option<&str>) -> Vec<Task> {
        match id {
            None => self.tasks.values().cloned().collect(),
            Some(id) => self.tasks.get(id).cloned().into_iter().collect(),
        }
    }

    /// Tasks with `eta <= before`; `before` defaults to the local clock.
    pub fn get_due(&self, before: Option<PrimitiveDateTime>) -> Vec<Task> {
        let before = before.unwrap_or_else(now_local);
        self.tasks
            .values()
            .filter(|task| task.eta <= before)
            .cloned()
            .collect()
    }

    /// Wholesale replace at key `id`, inserting when absent (upsert). A
    /// payload id is stored as given, unreconciled against the key.
    pub fn update(&mut self, id: &str, payload: &TaskPayload) -> Result<Task, StoreError> {
        let valid = validate(payload).map_err(|err| {
            tracing::warn!(error = %err, id, "rejected task payload on update");
            StoreError::InvalidTask(err)
        })?;

        let task = valid.into_task(id.to_string());
        self.tasks.insert(id.to_string(), task.clone());
        self.backend.persist(&self.tasks)?;

        Ok(task)
    }

    /// Sets the status to `DONE` regardless of its prior value.
    pub fn complete(&mut self, id: &str) -> Result<Task, StoreError> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        task.status = Status::Done;
        let completed = task.clone();
        self.backend.persist(&self.tasks)?;

        Ok(completed)
    }

    /// Unknown ids are a no-op, not an error. Persists either way.
    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.tasks.remove(id);
        self.backend.persist(&self.tasks)?;

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

fn now_local() -> PrimitiveDateTime {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let now = OffsetDateTime::now_utc().to_offset(offset);
    PrimitiveDateTime::new(now.date(), now.time())
}
