// Runtime configuration

use crate::file::FileStore;
use crate::kv::KvStore;
use crate::sqlite::SqliteStore;
use clap::ValueEnum;
use eyre::Result;
use std::path::{Path, PathBuf};
use tracing::Level;

const APP_DIR: &str = "tasklist";
const LOG_FILE: &str = "tasklist.log";

/// Where the task list is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// SQLite database file
    #[default]
    Sqlite,
    /// Plain JSON file per key
    File,
}

/// Resolved settings for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub backend: Backend,
    pub verbosity: u8,
}

impl Config {
    /// Build a config, falling back to the platform data directory
    pub fn new(data_dir: Option<PathBuf>, backend: Backend, verbosity: u8) -> Self {
        Self {
            data_dir: data_dir.unwrap_or_else(default_data_dir),
            backend,
            verbosity,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }

    /// Maximum log level: WARN by default, each `-v` one step more verbose
    pub fn log_level(&self) -> Level {
        match self.verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Open the configured store
    pub fn open_store(&self) -> Result<Box<dyn KvStore>> {
        let store: Box<dyn KvStore> = match self.backend {
            Backend::Sqlite => Box::new(SqliteStore::open(&self.data_dir)?),
            Backend::File => Box::new(FileStore::open(&self.data_dir)?),
        };
        Ok(store)
    }
}

/// `<platform local data dir>/tasklist`, or the current directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}
