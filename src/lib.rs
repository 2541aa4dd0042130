// tasklist - Interactive in-memory to-do list with filtering, sorting and undo

pub mod config;
pub mod error;
pub mod history;
pub mod query;
pub mod render;
pub mod shell;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use config::Config;
pub use error::StoreError;
pub use history::{ActionKind, ActionRecord, History};
pub use query::{Field, Filter, SortKey};
pub use render::ListFormat;
pub use shell::Shell;
pub use store::{IdentityMode, TaskStore};
pub use task::{Priority, Task, TaskKey, TaskUpdate};
