use uuid::Uuid;

/// Fresh task identifier: a random v4 UUID rendered as a string. Unique with
/// overwhelming probability for the lifetime of a store; collisions are a
/// known, undefended gap.
pub fn new_task_id() -> String {
    Uuid::new_v4().to_string()
}
