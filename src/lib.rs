// TaskList - single-screen to-do list with local key-value persistence

pub mod config;
pub mod file;
pub mod kv;
pub mod list;
pub mod logging;
pub mod persist;
pub mod sqlite;
pub mod state;
pub mod task;
pub mod ui;

// Re-export main types for convenience
pub use config::{Backend, Config};
pub use file::FileStore;
pub use kv::{KvStore, MemoryStore, STORAGE_KEY};
pub use list::TaskList;
pub use persist::Persister;
pub use sqlite::SqliteStore;
pub use state::{TaskState, load};
pub use task::{Task, now_ms};
