//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each CRUD operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! A `Transport` executes the round-trip in between.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreatedTask, EditState, Task, TaskDraft, TaskId};

const COLLECTION_PATH: &str = "/api/todo";
const JSON: &str = "application/json";

/// Characters that may not appear raw in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Request builder and response parser for `/api/todo`.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}{COLLECTION_PATH}", self.base_url)
    }

    fn task_url(&self, id: &TaskId) -> String {
        let segment = utf8_percent_encode(id.as_str(), PATH_SEGMENT);
        format!("{}{COLLECTION_PATH}/{segment}", self.base_url)
    }

    pub fn build_list_tasks(&self) -> HttpRequest {
        bodiless(HttpMethod::Get, self.collection_url())
    }

    pub fn build_create_task(&self, draft: &TaskDraft) -> Result<HttpRequest, ApiError> {
        with_json_body(HttpMethod::Post, self.collection_url(), draft)
    }

    /// Full update of an edited task (PUT).
    pub fn build_update_task(&self, edit: &EditState) -> Result<HttpRequest, ApiError> {
        with_json_body(HttpMethod::Put, self.task_url(&edit.id), edit)
    }

    /// Completion toggle (PATCH). `current` is the task as the client knows
    /// it; the body is the same record with `done` inverted.
    pub fn build_toggle_task(&self, current: &Task) -> Result<HttpRequest, ApiError> {
        with_json_body(HttpMethod::Patch, self.task_url(&current.id), &current.toggled())
    }

    pub fn build_delete_task(&self, id: &TaskId) -> HttpRequest {
        bodiless(HttpMethod::Delete, self.task_url(id))
    }

    pub fn parse_list_tasks(&self, response: HttpResponse) -> Result<Vec<Task>, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_create_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        check_status(&response)?;
        decode::<CreatedTask>(&response.body).map(CreatedTask::into_task)
    }

    /// Parses both PUT and PATCH responses.
    pub fn parse_update_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    /// The confirmation body is ignored; only the status matters.
    pub fn parse_delete_task(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn bodiless(method: HttpMethod, url: String) -> HttpRequest {
    HttpRequest {
        method,
        url,
        headers: vec![("accept".to_string(), JSON.to_string())],
        body: None,
    }
}

fn with_json_body<T: Serialize>(
    method: HttpMethod,
    url: String,
    payload: &T,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(HttpRequest {
        method,
        url,
        headers: vec![
            ("accept".to_string(), JSON.to_string()),
            ("content-type".to_string(), JSON.to_string()),
        ],
        body: Some(body),
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:8000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn sample_task(done: bool) -> Task {
        Task {
            id: TaskId::from("1"),
            title: "Buy milk".to_string(),
            description: "2 litres".to_string(),
            done,
        }
    }

    #[test]
    fn build_list_tasks_produces_correct_request() {
        let req = client().build_list_tasks();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8000/api/todo");
        assert!(req.body.is_none());
        assert_eq!(req.headers, vec![("accept".to_string(), "application/json".to_string())]);
    }

    #[test]
    fn build_create_task_produces_correct_request() {
        let draft = TaskDraft::new("Buy milk", "2 litres");
        let req = client().build_create_task(&draft).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8000/api/todo");
        assert!(req
            .headers
            .contains(&("content-type".to_string(), "application/json".to_string())));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"title": "Buy milk", "description": "2 litres"}));
    }

    #[test]
    fn build_create_task_does_not_validate_empty_fields() {
        let req = client().build_create_task(&TaskDraft::default()).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "");
    }

    #[test]
    fn build_update_task_puts_edit_record() {
        let edit = EditState::from(&sample_task(true));
        let req = client().build_update_task(&edit).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8000/api/todo/1");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"_id": "1", "title": "Buy milk", "description": "2 litres"})
        );
    }

    #[test]
    fn build_toggle_task_patches_full_record_with_done_flipped() {
        let req = client().build_toggle_task(&sample_task(false)).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.url, "http://localhost:8000/api/todo/1");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["done"], true);
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["_id"], "1");
    }

    #[test]
    fn build_delete_task_produces_correct_request() {
        let req = client().build_delete_task(&TaskId::from("abc"));
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:8000/api/todo/abc");
        assert!(req.body.is_none());
    }

    #[test]
    fn task_ids_are_escaped_as_one_path_segment() {
        let req = client().build_delete_task(&TaskId::from("a/b?c#d e%"));
        assert_eq!(req.url, "http://localhost:8000/api/todo/a%2Fb%3Fc%23d%20e%25");
    }

    #[test]
    fn parse_list_tasks_keeps_server_order() {
        let body = r#"[{"_id":"2","title":"B"},{"_id":"1","title":"A"},{"_id":"3","title":"C"}]"#;
        let tasks = client().parse_list_tasks(response(200, body)).unwrap();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["2", "1", "3"]);
    }

    #[test]
    fn parse_list_tasks_bad_json() {
        let err = client().parse_list_tasks(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_create_task_unwraps_new_todo() {
        let body = r#"{"newTodo":{"_id":"1","title":"A","description":"B","done":false}}"#;
        let task = client().parse_create_task(response(201, body)).unwrap();
        assert_eq!(task.title, "A");
        assert_eq!(task.description, "B");
    }

    #[test]
    fn parse_create_task_wrong_status() {
        let err = client().parse_create_task(response(500, "internal error")).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_update_task_success() {
        let body = r#"{"_id":"1","title":"Updated","description":"","done":true}"#;
        let task = client().parse_update_task(response(200, body)).unwrap();
        assert_eq!(task.title, "Updated");
        assert!(task.done);
    }

    #[test]
    fn parse_update_task_not_found() {
        let err = client().parse_update_task(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_delete_task_ignores_confirmation_body() {
        assert!(client()
            .parse_delete_task(response(200, r#"{"message":"deleted"}"#))
            .is_ok());
        assert!(client().parse_delete_task(response(204, "")).is_ok());
    }

    #[test]
    fn parse_delete_task_not_found() {
        let err = client().parse_delete_task(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:8000/");
        assert_eq!(client.build_list_tasks().url, "http://localhost:8000/api/todo");
    }
}
