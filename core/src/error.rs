//! Error types for the todo API client.
//!
//! # Design
//! Every variant is a flavour of "the request failed". `NotFound` gets its
//! own variant because a 404 usually means the task was deleted elsewhere;
//! other non-2xx responses land in `HttpError` with the raw status and body.

use thiserror::Error;

use crate::types::TaskId;

/// Errors returned by `TodoClient`, `Transport` and `TodoListController`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response (connection refused, reset, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// A task id was not present in local state, so no request was sent.
    #[error("task {0} is not in the list")]
    UnknownTask(TaskId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_and_body() {
        let err = ApiError::HttpError {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn unknown_task_names_the_id() {
        let err = ApiError::UnknownTask(TaskId::from("abc"));
        assert_eq!(err.to_string(), "task abc is not in the list");
    }
}
