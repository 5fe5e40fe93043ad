// Tracing subscriber setup

use crate::config::Config;
use eyre::{Context, Result, eyre};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to `<data_dir>/tasklist.log`; used while the terminal UI owns the screen
    File,
    Stderr,
}

/// Install the global subscriber
pub fn init(config: &Config, target: LogTarget) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_max_level(config.log_level());

    let installed = match target {
        LogTarget::File => {
            fs::create_dir_all(config.data_dir()).context("Failed to create data directory")?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(config.log_path())
                .context("Failed to open log file")?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| eyre!("Failed to install logger: {}", e))
}
