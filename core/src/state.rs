//! Client-side list state rendered by the view.
//!
//! # Invariants
//! - `items` never holds two tasks with the same id.
//! - `items` keeps server order; inserts append, removals filter by id.
//! - `draft` and `edit` are local only and never mirror server state.

use crate::types::{EditState, Task, TaskDraft, TaskId};

/// Everything the list view needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListState {
    pub items: Vec<Task>,
    /// True until the initial fetch resolves, successfully or not.
    pub loading: bool,
    /// Set when the initial fetch failed. `items` is empty in that case.
    pub load_error: Option<String>,
    pub draft: TaskDraft,
    /// Present only while the edit form is open.
    pub edit: Option<EditState>,
}

impl Default for TaskListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            load_error: None,
            draft: TaskDraft::default(),
            edit: None,
        }
    }
}

impl TaskListState {
    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.items.iter().find(|task| &task.id == id)
    }

    /// Replace `items`, dropping any repeated id after its first occurrence.
    /// Returns how many duplicates were dropped.
    pub(crate) fn replace_items(&mut self, tasks: Vec<Task>) -> usize {
        let received = tasks.len();
        let mut items: Vec<Task> = Vec::with_capacity(received);
        for task in tasks {
            if !items.iter().any(|kept| kept.id == task.id) {
                items.push(task);
            }
        }
        self.items = items;
        received - self.items.len()
    }

    /// Append `task`, or replace the entry with the same id if one exists.
    pub(crate) fn insert(&mut self, task: Task) {
        if !self.replace(task.clone()) {
            self.items.push(task);
        }
    }

    /// Replace the entry whose id matches `task.id`. Returns false when no
    /// such entry exists; the list is then left untouched.
    pub(crate) fn replace(&mut self, task: Task) -> bool {
        match self.items.iter_mut().find(|item| item.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, id: &TaskId) -> bool {
        let before = self.items.len();
        self.items.retain(|task| &task.id != id);
        self.items.len() != before
    }
}
