//! Full controller lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port and drives `TodoListController`
//! over real HTTP. The transport wraps a blocking ureq agent in
//! `spawn_blocking`, so the request building and response parsing in the
//! core are exercised end-to-end against the actual server.

use async_trait::async_trait;
use todo_core::{
    ApiError, HttpMethod, HttpRequest, HttpResponse, TaskDraft, TaskId, TodoClient,
    TodoListController, Transport,
};

/// Executes requests with ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses come back as data, letting the core interpret them.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn execute(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, ureq::Error> {
    let accept = "application/json";
    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.url).header("accept", accept).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.url).header("accept", accept).call(),
        (HttpMethod::Post, body) => agent
            .post(&req.url)
            .header("accept", accept)
            .content_type(accept)
            .send(body.unwrap_or_default().as_bytes()),
        (HttpMethod::Put, body) => agent
            .put(&req.url)
            .header("accept", accept)
            .content_type(accept)
            .send(body.unwrap_or_default().as_bytes()),
        (HttpMethod::Patch, body) => agent
            .patch(&req.url)
            .header("accept", accept)
            .content_type(accept)
            .send(body.unwrap_or_default().as_bytes()),
    }?;

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body,
    })
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute(&agent, request))
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .map_err(|e| ApiError::Transport(e.to_string()))
    }
}

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}")
}

#[tokio::test(flavor = "multi_thread")]
async fn controller_crud_lifecycle() {
    let base_url = start_server().await;
    let controller = TodoListController::mount(TodoClient::new(&base_url), UreqTransport::new()).await;

    // Step 1: initial load of an empty server.
    let state = controller.state();
    assert!(!state.loading);
    assert!(state.items.is_empty());
    assert!(state.load_error.is_none());

    // Step 2: create two tasks through the draft.
    controller.set_draft_title("Buy milk");
    controller.set_draft_description("2 litres");
    let milk = controller.submit_draft().await.unwrap();
    let bread = controller.create(TaskDraft::new("Buy bread", "")).await.unwrap();
    let state = controller.state();
    assert_eq!(state.items, vec![milk.clone(), bread.clone()]);
    assert_eq!(state.draft, TaskDraft::default());

    // Step 3: toggle done.
    let toggled = controller.toggle_done(&milk.id).await.unwrap();
    assert!(toggled.done);
    assert!(controller.state().items[0].done);

    // Step 4: edit and save; done survives the PUT.
    controller.begin_edit(&controller.state().items[0]);
    controller.edit_title("Buy oat milk");
    let saved = controller.save_edit().await.unwrap().unwrap();
    assert_eq!(saved.title, "Buy oat milk");
    assert_eq!(saved.description, "2 litres");
    assert!(saved.done);
    let state = controller.state();
    assert!(!state.is_editing());
    assert_eq!(state.items[0], saved);

    // Step 5: delete the first task.
    controller.delete(&milk.id).await.unwrap();
    assert_eq!(controller.state().items, vec![bread.clone()]);

    // Step 6: delete again fails with NotFound and changes nothing.
    let err = controller.delete(&milk.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    assert_eq!(controller.state().items, vec![bread.clone()]);

    // Step 7: a fresh controller sees the server's view.
    let fresh = TodoListController::mount(TodoClient::new(&base_url), UreqTransport::new()).await;
    assert_eq!(fresh.state().items, vec![bread]);
}

#[tokio::test(flavor = "multi_thread")]
async fn save_edit_for_task_deleted_elsewhere_keeps_form_open() {
    let base_url = start_server().await;
    let controller = TodoListController::mount(TodoClient::new(&base_url), UreqTransport::new()).await;
    let other = TodoListController::mount(TodoClient::new(&base_url), UreqTransport::new()).await;

    let task = controller.create(TaskDraft::new("Shared", "")).await.unwrap();
    controller.begin_edit(&task);
    controller.edit_title("Renamed");

    // `other` never saw the task locally, but delete goes by id.
    other.delete(&task.id).await.unwrap();
    assert!(other.state().items.is_empty());

    let before = controller.state();
    let err = controller.save_edit().await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    assert_eq!(controller.state(), before);
    assert!(controller.state().is_editing());
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_loads_as_empty_list() {
    // Bind then drop to get a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let controller =
        TodoListController::mount(TodoClient::new(&format!("http://{addr}")), UreqTransport::new()).await;

    let state = controller.state();
    assert!(!state.loading);
    assert!(state.items.is_empty());
    assert!(state.load_error.is_some());

    let err = controller.toggle_done(&TaskId::from("nope")).await.unwrap_err();
    assert!(matches!(err, ApiError::UnknownTask(_)));
}
