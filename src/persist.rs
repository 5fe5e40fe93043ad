// Background writer for task list snapshots

use crate::kv::KvStore;
use crate::list::TaskList;
use eyre::{Context, Result};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, trace, warn};

enum Command {
    Save(String),
    Flush(Sender<()>),
}

/// Queue of full-list saves drained by a single writer thread
///
/// Saves reach the store in the order they were queued. A burst of saves is
/// coalesced so only the newest snapshot is written. Write failures are logged
/// and dropped.
pub struct Persister {
    tx: Option<Sender<Command>>,
    handle: Option<JoinHandle<()>>,
}

impl Persister {
    /// Start the writer thread; it takes ownership of `store`
    pub fn spawn<S: KvStore>(store: S, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let (tx, rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("tasklist-writer".to_string())
            .spawn(move || writer_loop(store, &key, rx))
            .context("Failed to spawn writer thread")?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Queue a save of `list`; never blocks on storage
    pub fn save(&self, list: &TaskList) {
        let blob = match serde_json::to_string(list) {
            Ok(blob) => blob,
            Err(e) => {
                error!(error = ?e, "Failed to serialize tasks, not saved");
                return;
            }
        };
        self.send(Command::Save(blob));
    }

    /// Block until every save queued so far has been attempted
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = mpsc::channel();
        if self.send(Command::Flush(ack_tx)) && ack_rx.recv().is_err() {
            warn!("Writer stopped before acknowledging flush");
        }
    }

    fn send(&self, command: Command) -> bool {
        match &self.tx {
            Some(tx) if tx.send(command).is_ok() => true,
            _ => {
                error!("Writer thread is gone, change kept in memory only");
                false
            }
        }
    }
}

impl Drop for Persister {
    fn drop(&mut self) {
        // Closing the channel lets the writer drain and exit
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Writer thread panicked");
            }
        }
    }
}

fn writer_loop<S: KvStore>(mut store: S, key: &str, rx: Receiver<Command>) {
    debug!(key, "Writer started");
    let mut pending: Option<String> = None;

    while let Ok(first) = rx.recv() {
        let mut next = Some(first);
        while let Some(command) = next.take() {
            match command {
                Command::Save(blob) => {
                    if pending.replace(blob).is_some() {
                        trace!("Coalesced queued save");
                    }
                }
                Command::Flush(ack) => {
                    write_pending(&mut store, key, &mut pending);
                    let _ = ack.send(());
                }
            }
            next = rx.try_recv().ok();
        }
        write_pending(&mut store, key, &mut pending);
    }

    debug!(key, "Writer stopped");
}

fn write_pending<S: KvStore>(store: &mut S, key: &str, pending: &mut Option<String>) {
    let Some(blob) = pending.take() else {
        return;
    };
    match store.set(key, &blob) {
        Ok(()) => debug!(key, bytes = blob.len(), "Saved tasks"),
        Err(e) => error!(key, error = ?e, "Failed to save tasks"),
    }
}
