mod task;

pub use task::{ETA_FORMAT, Status, Task, eta_format};
