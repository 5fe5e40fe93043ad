// Task-list state container

use crate::kv::{KvStore, STORAGE_KEY};
use crate::list::TaskList;
use crate::persist::Persister;
use crate::task::Task;
use eyre::Result;
use tracing::{debug, info, warn};

/// Read the stored task list
///
/// A missing value, a read failure, or an undecodable blob all give an empty
/// list; failures are logged and not returned.
pub fn load<S: KvStore + ?Sized>(store: &S) -> TaskList {
    load_key(store, STORAGE_KEY)
}

fn load_key<S: KvStore + ?Sized>(store: &S, key: &str) -> TaskList {
    let blob = match store.get(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            debug!(key, "No stored tasks, starting empty");
            return TaskList::new();
        }
        Err(e) => {
            warn!(key, error = ?e, "Failed to read stored tasks, starting empty");
            return TaskList::new();
        }
    };

    match serde_json::from_str::<Vec<Task>>(&blob) {
        Ok(tasks) => {
            let list = TaskList::from_tasks(tasks);
            info!(key, count = list.len(), "Loaded tasks");
            list
        }
        Err(e) => {
            warn!(key, error = ?e, "Failed to parse stored tasks, starting empty");
            TaskList::new()
        }
    }
}

/// Owns the current task list and persists every change
pub struct TaskState {
    list: TaskList,
    persister: Persister,
}

impl TaskState {
    /// Load the stored list, then hand `store` to the background writer
    pub fn open<S: KvStore>(store: S) -> Result<Self> {
        let list = load(&store);
        let persister = Persister::spawn(store, STORAGE_KEY)?;
        Ok(Self { list, persister })
    }

    /// Current snapshot
    pub fn tasks(&self) -> &TaskList {
        &self.list
    }

    /// Add a task; returns it, or `None` for blank input
    pub fn add(&mut self, raw_text: &str) -> Option<&Task> {
        let next = self.list.add(raw_text);
        if self.commit(next) { self.list.first() } else { None }
    }

    pub fn edit(&mut self, id: &str, text: &str) -> bool {
        let next = self.list.edit(id, text);
        self.commit(next)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let next = self.list.delete(id);
        self.commit(next)
    }

    pub fn toggle_complete(&mut self, id: &str) -> bool {
        let next = self.list.toggle_complete(id);
        self.commit(next)
    }

    /// Replace the order with the permutation given by `ids`
    pub fn reorder<S: AsRef<str>>(&mut self, ids: &[S]) -> bool {
        let next = self.list.reorder(ids);
        self.commit(next)
    }

    pub fn move_task(&mut self, from: usize, to: usize) -> bool {
        let next = self.list.move_task(from, to);
        self.commit(next)
    }

    /// Wait for queued saves to be written
    pub fn flush(&self) {
        self.persister.flush();
    }

    fn commit(&mut self, next: Option<TaskList>) -> bool {
        match next {
            Some(list) => {
                self.list = list;
                self.persister.save(&self.list);
                true
            }
            None => false,
        }
    }
}
