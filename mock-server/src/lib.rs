use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Deserialize)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize)]
pub struct Created {
    #[serde(rename = "newTodo")]
    pub new_todo: Task,
}

/// PUT and PATCH body. Only present fields are applied; `_id` in the body is
/// ignored in favour of the path.
#[derive(Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub done: Option<bool>,
}

#[derive(Serialize, Deserialize)]
pub struct Deleted {
    pub message: String,
    #[serde(rename = "_id")]
    pub id: String,
}

/// Tasks in insertion order; list responses keep that order.
pub type Db = Arc<RwLock<Vec<Task>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/api/todo", get(list_tasks).post(create_task))
        .route(
            "/api/todo/{id}",
            get(get_task)
                .put(update_task)
                .patch(update_task)
                .delete(delete_task),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_tasks(State(db): State<Db>) -> Json<Vec<Task>> {
    Json(db.read().await.clone())
}

async fn create_task(
    State(db): State<Db>,
    Json(input): Json<CreateTask>,
) -> (StatusCode, Json<Created>) {
    let task = Task {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        description: input.description,
        done: false,
    };
    debug!("event=create id={}", task.id);
    db.write().await.push(task.clone());
    (StatusCode::CREATED, Json(Created { new_todo: task }))
}

async fn get_task(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Task>, StatusCode> {
    let tasks = db.read().await;
    tasks
        .iter()
        .find(|task| task.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_task(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTask>,
) -> Result<Json<Task>, StatusCode> {
    let mut tasks = db.write().await;
    let task = tasks
        .iter_mut()
        .find(|task| task.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        task.title = title;
    }
    if let Some(description) = input.description {
        task.description = description;
    }
    if let Some(done) = input.done {
        task.done = done;
    }
    debug!("event=update id={id}");
    Ok(Json(task.clone()))
}

async fn delete_task(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, StatusCode> {
    let mut tasks = db.write().await;
    let index = tasks
        .iter()
        .position(|task| task.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    tasks.remove(index);
    debug!("event=delete id={id}");
    Ok(Json(Deleted {
        message: "Todo deleted".to_string(),
        id,
    }))
}
