pub mod json_store;

pub use json_store::{JsonFileBackend, PersistenceBackend, TaskMap, store_path};
