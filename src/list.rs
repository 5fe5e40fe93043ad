// Immutable ordered task list

use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Ordered snapshot of every task
///
/// Mutating operations never touch `self`; they return `Some(next)` with the
/// new snapshot, or `None` when the call changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from stored records, dropping repeated ids
    ///
    /// The first occurrence of an id wins so the uniqueness invariant holds
    /// even for blobs that were edited by hand.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(tasks.len());

        for task in tasks {
            if !seen.insert(task.id.clone()) {
                warn!(id = %task.id, "Dropping task with duplicate id");
                continue;
            }
            kept.push(task.normalize());
        }

        Self { tasks: kept }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn first(&self) -> Option<&Task> {
        self.tasks.first()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Ids in display order
    pub fn ids(&self) -> Vec<String> {
        self.tasks.iter().map(|t| t.id.clone()).collect()
    }

    /// Prepend a new task built from `raw_text`; blank input is ignored
    pub fn add(&self, raw_text: &str) -> Option<Self> {
        let text = raw_text.trim();
        if text.is_empty() {
            return None;
        }
        Some(self.prepend(Task::new(text)))
    }

    /// Prepend an already built task
    pub fn prepend(&self, task: Task) -> Self {
        let mut tasks = Vec::with_capacity(self.tasks.len() + 1);
        tasks.push(task);
        tasks.extend(self.tasks.iter().cloned());
        Self { tasks }
    }

    /// Replace the text of the task with `id`
    pub fn edit(&self, id: &str, text: &str) -> Option<Self> {
        self.update(id, |task| task.text = text.to_string())
    }

    pub fn delete(&self, id: &str) -> Option<Self> {
        let index = self.position(id)?;
        let mut tasks = self.tasks.clone();
        tasks.remove(index);
        Some(Self { tasks })
    }

    pub fn toggle_complete(&self, id: &str) -> Option<Self> {
        self.update(id, |task| task.completed = !task.completed)
    }

    /// Rearrange tasks into the order given by `ids`
    ///
    /// `ids` must name every current task exactly once. Anything else, or an
    /// order identical to the current one, yields `None`.
    pub fn reorder<S: AsRef<str>>(&self, ids: &[S]) -> Option<Self> {
        if ids.len() != self.tasks.len() {
            warn!(expected = self.tasks.len(), got = ids.len(), "Reorder length mismatch, ignoring");
            return None;
        }

        let mut seen = HashSet::with_capacity(ids.len());
        let mut tasks = Vec::with_capacity(ids.len());
        for id in ids {
            let id = id.as_ref();
            if !seen.insert(id) {
                warn!(id, "Reorder repeats an id, ignoring");
                return None;
            }
            match self.get(id) {
                Some(task) => tasks.push(task.clone()),
                None => {
                    warn!(id, "Reorder names an unknown id, ignoring");
                    return None;
                }
            }
        }

        if tasks == self.tasks {
            return None;
        }
        Some(Self { tasks })
    }

    /// Move the task at `from` so that it ends up at index `to`
    pub fn move_task(&self, from: usize, to: usize) -> Option<Self> {
        let ids = moved(&self.ids(), from, to)?;
        self.reorder(&ids)
    }

    fn update(&self, id: &str, apply: impl FnOnce(&mut Task)) -> Option<Self> {
        let index = self.position(id)?;
        let mut tasks = self.tasks.clone();
        apply(&mut tasks[index]);
        Some(Self { tasks })
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

/// Copy of `items` with the element at `from` moved to `to`
pub fn moved<T: Clone>(items: &[T], from: usize, to: usize) -> Option<Vec<T>> {
    if from == to || from >= items.len() || to >= items.len() {
        return None;
    }
    let mut out = items.to_vec();
    let item = out.remove(from);
    out.insert(to, item);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TaskList {
        TaskList::new()
            .add("first")
            .unwrap()
            .add("second")
            .unwrap()
            .add("third")
            .unwrap()
    }

    #[test]
    fn test_add_prepends() {
        let list = sample();
        let texts: Vec<&str> = list.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_add_trims_text() {
        let list = TaskList::new().add("  Buy milk \n").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.first().unwrap().text, "Buy milk");
    }

    #[test]
    fn test_add_blank_is_noop() {
        let list = sample();
        assert!(list.add("").is_none());
        assert!(list.add("   \t\n").is_none());
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_add_increases_length_for_any_text() {
        let mut list = TaskList::new();
        for (i, text) in ["a", " b ", "ü", "Buy milk", "x y z"].iter().enumerate() {
            list = list.add(text).unwrap();
            assert_eq!(list.len(), i + 1);
            assert_eq!(list.first().unwrap().text, text.trim());
        }
    }

    #[test]
    fn test_edit_changes_only_text() {
        let list = sample();
        let before = list.as_slice()[1].clone();

        let edited = list.edit(&before.id, "renamed").unwrap();
        let after = edited.get(&before.id).unwrap();

        assert_eq!(after.text, "renamed");
        assert_eq!(after.id, before.id);
        assert_eq!(after.key, before.key);
        assert_eq!(after.completed, before.completed);
        assert_eq!(after.date, before.date);
        assert_eq!(after.day, before.day);
        assert_eq!(edited.position(&before.id), Some(1));
        // Original snapshot is untouched
        assert_eq!(list.get(&before.id).unwrap().text, "second");
    }

    #[test]
    fn test_edit_unknown_id_is_noop() {
        assert!(sample().edit("missing", "text").is_none());
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let list = sample();
        for id in list.ids() {
            let next = list.delete(&id).unwrap();
            assert_eq!(next.len(), list.len() - 1);
            assert!(next.get(&id).is_none());
        }
        assert!(list.delete("missing").is_none());
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let list = sample();
        let id = list.first().unwrap().id.clone();

        let once = list.toggle_complete(&id).unwrap();
        assert!(once.get(&id).unwrap().completed);

        let twice = once.toggle_complete(&id).unwrap();
        assert_eq!(twice, list);

        assert!(list.toggle_complete("missing").is_none());
    }

    #[test]
    fn test_reorder_permutation() {
        let list = sample();
        let mut ids = list.ids();
        ids.reverse();

        let reordered = list.reorder(&ids).unwrap();
        assert_eq!(reordered.ids(), ids);
        assert_eq!(reordered.len(), list.len());
    }

    #[test]
    fn test_reorder_rejects_non_permutations() {
        let list = sample();
        let ids = list.ids();

        // Same order
        assert!(list.reorder(&ids).is_none());
        // Missing one
        assert!(list.reorder(&ids[..2]).is_none());
        // Repeated id
        assert!(list.reorder(&[&ids[0], &ids[0], &ids[1]]).is_none());
        // Unknown id
        assert!(list.reorder(&[ids[0].as_str(), ids[1].as_str(), "missing"]).is_none());
    }

    #[test]
    fn test_move_task() {
        let list = sample();
        let ids = list.ids();

        let moved_down = list.move_task(0, 2).unwrap();
        assert_eq!(moved_down.ids(), vec![ids[1].clone(), ids[2].clone(), ids[0].clone()]);

        assert!(list.move_task(1, 1).is_none());
        assert!(list.move_task(0, 3).is_none());
    }

    #[test]
    fn test_from_tasks_drops_duplicates() {
        let a = Task::new("a");
        let mut dup = Task::new("dup");
        dup.id = a.id.clone();
        let b = Task::new("b");

        let list = TaskList::from_tasks(vec![a.clone(), dup, b.clone()]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(&a.id).unwrap().text, "a");
        assert!(list.get(&b.id).is_some());
    }

    #[test]
    fn test_serializes_as_array() {
        let list = TaskList::new().add("x").unwrap();
        let json = serde_json::to_string(&list).unwrap();
        assert!(json.starts_with('['));
        assert!(json.ends_with(']'));
    }
}
