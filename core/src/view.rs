//! Plain-text rendering of `TaskListState`.

use std::fmt;

use crate::state::TaskListState;

pub const LOADING: &str = "Loading...";
pub const EMPTY: &str = "No tasks available. Please add a new task.";
pub const LOAD_FAILED: &str = "Could not load tasks from the server.";

/// Render the whole view: header with the create form, the list, and the
/// edit form when one is open. Rows are numbered from 1.
pub fn render(state: &TaskListState) -> String {
    View(state).to_string()
}

/// `Display` adapter over a state snapshot.
pub struct View<'a>(pub &'a TaskListState);

impl fmt::Display for View<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        writeln!(out, "Tasks")?;
        writeln!(out, "  New Todo:        {}", state.draft.title)?;
        writeln!(out, "  New Description: {}", state.draft.description)?;
        writeln!(out)?;

        if state.loading {
            writeln!(out, "{LOADING}")?;
        } else if state.items.is_empty() {
            if state.load_error.is_some() {
                writeln!(out, "{LOAD_FAILED}")?;
            }
            writeln!(out, "{EMPTY}")?;
        } else {
            for (index, task) in state.items.iter().enumerate() {
                let mark = if task.done { 'x' } else { ' ' };
                write!(out, "{:>3}. [{mark}] {}", index + 1, task.title)?;
                if !task.description.is_empty() {
                    write!(out, " - {}", task.description)?;
                }
                writeln!(out)?;
            }
        }

        if let Some(edit) = &state.edit {
            writeln!(out)?;
            writeln!(out, "Edit Todo")?;
            writeln!(out, "  Title:       {}", edit.title)?;
            writeln!(out, "  Description: {}", edit.description)?;
        }
        Ok(())
    }
}
