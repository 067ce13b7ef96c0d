//! Domain DTOs for the `/api/todo` API.
//!
//! # Design
//! The server owns ids and hands them out as opaque strings under `_id`;
//! `TaskId` keeps them opaque on the client. These types are defined
//! independently of the mock-server crate, and the integration tests catch
//! any schema drift between the two.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single task as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    #[serde(rename = "_id", alias = "id")]
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// The full record with `done` inverted, as sent by a toggle.
    pub fn toggled(&self) -> Task {
        Task {
            done: !self.done,
            ..self.clone()
        }
    }
}

/// Create-form contents and the POST payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Edit-form contents and the PUT payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditState {
    #[serde(rename = "_id", alias = "id")]
    pub id: TaskId,
    pub title: String,
    pub description: String,
}

impl From<&Task> for EditState {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
        }
    }
}

/// Body of a create response. The API wraps the new task as `newTodo`, but a
/// bare task is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CreatedTask {
    Wrapped {
        #[serde(rename = "newTodo")]
        new_todo: Task,
    },
    Bare(Task),
}

impl CreatedTask {
    pub(crate) fn into_task(self) -> Task {
        match self {
            CreatedTask::Wrapped { new_todo } => new_todo,
            CreatedTask::Bare(task) => task,
        }
    }
}
