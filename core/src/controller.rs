//! The list controller: owns `TaskListState` and keeps it in step with the
//! server.
//!
//! # Design
//! - Every mutation goes to the server first. Local state changes only from
//!   the server's response (or by filtering, for delete), never
//!   optimistically.
//! - Operations take `&self`, so several may be in flight at once. State
//!   sits behind a `Mutex` that is never held across an `.await`.
//! - Failures are logged and returned; state is left as it was. The one
//!   exception is the initial load, which degrades to an empty list and
//!   records `load_error`.
//! - Observers are called with a snapshot after each change, outside the
//!   state lock.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::ordering::ResponseOrdering;
use crate::state::TaskListState;
use crate::types::{EditState, Task, TaskDraft, TaskId};

/// Callback invoked with the new state after every change.
pub type Observer = Arc<dyn Fn(&TaskListState) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Parser<R> = fn(&TodoClient, HttpResponse) -> Result<R, ApiError>;

pub struct TodoListController<T> {
    client: TodoClient,
    transport: T,
    state: Mutex<TaskListState>,
    ordering: Mutex<ResponseOrdering>,
    observers: Mutex<Vec<(SubscriptionId, Observer)>>,
    next_subscription: AtomicU64,
    load_started: AtomicBool,
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Transport> TodoListController<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self {
            client,
            transport,
            state: Mutex::new(TaskListState::default()),
            ordering: Mutex::new(ResponseOrdering::default()),
            observers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            load_started: AtomicBool::new(false),
        }
    }

    /// Build a controller and run the initial load.
    pub async fn mount(client: TodoClient, transport: T) -> Self {
        let controller = Self::new(client, transport);
        // A failed load is already logged and reflected in the state.
        let _ = controller.load_all().await;
        controller
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TaskListState {
        lock(&self.state).clone()
    }

    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&TaskListState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        lock(&self.observers).push((id, Arc::new(observer)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = lock(&self.observers);
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    /// Fetch the whole list. Only the first call does anything.
    pub async fn load_all(&self) -> Result<(), ApiError> {
        if self.load_started.swap(true, Ordering::SeqCst) {
            debug!("event=load_all status=skipped reason=already_loaded");
            return Ok(());
        }

        let result = self
            .round_trip(Ok(self.client.build_list_tasks()), TodoClient::parse_list_tasks)
            .await;

        match result {
            Ok(tasks) => {
                let received = tasks.len();
                self.mutate(|state| {
                    let dropped = state.replace_items(tasks);
                    if dropped > 0 {
                        warn!("event=load_all duplicate_ids_dropped={dropped}");
                    }
                    state.loading = false;
                    state.load_error = None;
                    true
                });
                info!("event=load_all status=ok count={received}");
                Ok(())
            }
            Err(err) => {
                error!("event=load_all status=failed error={err}");
                let message = err.to_string();
                self.mutate(|state| {
                    state.items.clear();
                    state.loading = false;
                    state.load_error = Some(message);
                    true
                });
                Err(err)
            }
        }
    }

    /// Create a task on the server and append the returned record.
    /// The draft is cleared on success.
    pub async fn create(&self, draft: TaskDraft) -> Result<Task, ApiError> {
        let result = self
            .round_trip(self.client.build_create_task(&draft), TodoClient::parse_create_task)
            .await;

        match result {
            Ok(task) => {
                let created = task.clone();
                self.mutate(|state| {
                    state.insert(created);
                    state.draft = TaskDraft::default();
                    true
                });
                info!("event=create status=ok id={}", task.id);
                Ok(task)
            }
            Err(err) => {
                error!("event=create status=failed error={err}");
                Err(err)
            }
        }
    }

    /// Submit the draft currently held in state.
    pub async fn submit_draft(&self) -> Result<Task, ApiError> {
        let draft = lock(&self.state).draft.clone();
        self.create(draft).await
    }

    pub async fn delete(&self, id: &TaskId) -> Result<(), ApiError> {
        let result = self
            .round_trip(Ok(self.client.build_delete_task(id)), TodoClient::parse_delete_task)
            .await;

        match result {
            Ok(()) => {
                lock(&self.ordering).forget(id);
                self.mutate(|state| state.remove(id));
                info!("event=delete status=ok id={id}");
                Ok(())
            }
            Err(err) => {
                error!("event=delete status=failed id={id} error={err}");
                Err(err)
            }
        }
    }

    /// Flip `done` on the server for a task currently in the list.
    ///
    /// # Errors
    /// `ApiError::UnknownTask` without any request when `id` is not in the
    /// list; otherwise whatever the round-trip fails with.
    pub async fn toggle_done(&self, id: &TaskId) -> Result<Task, ApiError> {
        let current = lock(&self.state).find(id).cloned();
        let Some(current) = current else {
            warn!("event=toggle_done status=skipped reason=unknown_task id={id}");
            return Err(ApiError::UnknownTask(id.clone()));
        };

        let seq = lock(&self.ordering).issue(id);
        let result = self
            .round_trip(self.client.build_toggle_task(&current), TodoClient::parse_update_task)
            .await;

        match result {
            Ok(task) => {
                self.apply_update("toggle_done", id, seq, task.clone(), false);
                Ok(task)
            }
            Err(err) => {
                error!("event=toggle_done status=failed id={id} error={err}");
                Err(err)
            }
        }
    }

    /// Open the edit form on a copy of `task`.
    pub fn begin_edit(&self, task: &Task) {
        let edit = EditState::from(task);
        self.mutate(|state| {
            state.edit = Some(edit);
            true
        });
    }

    /// Returns false when no edit form is open.
    pub fn edit_title(&self, title: impl Into<String>) -> bool {
        let title = title.into();
        self.mutate(|state| match state.edit.as_mut() {
            Some(edit) => {
                edit.title = title;
                true
            }
            None => false,
        })
    }

    /// Returns false when no edit form is open.
    pub fn edit_description(&self, description: impl Into<String>) -> bool {
        let description = description.into();
        self.mutate(|state| match state.edit.as_mut() {
            Some(edit) => {
                edit.description = description;
                true
            }
            None => false,
        })
    }

    pub fn set_draft_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.mutate(|state| {
            state.draft.title = title;
            true
        });
    }

    pub fn set_draft_description(&self, description: impl Into<String>) {
        let description = description.into();
        self.mutate(|state| {
            state.draft.description = description;
            true
        });
    }

    /// Send the open edit form as a full update. Returns `Ok(None)` when no
    /// form is open. On failure the form stays open.
    pub async fn save_edit(&self) -> Result<Option<Task>, ApiError> {
        let edit = lock(&self.state).edit.clone();
        let Some(edit) = edit else {
            debug!("event=save_edit status=skipped reason=not_editing");
            return Ok(None);
        };

        let seq = lock(&self.ordering).issue(&edit.id);
        let result = self
            .round_trip(self.client.build_update_task(&edit), TodoClient::parse_update_task)
            .await;

        match result {
            Ok(task) => {
                self.apply_update("save_edit", &edit.id, seq, task.clone(), true);
                Ok(Some(task))
            }
            Err(err) => {
                error!("event=save_edit status=failed id={} error={err}", edit.id);
                Err(err)
            }
        }
    }

    /// Close the edit form without contacting the server.
    pub fn cancel_edit(&self) {
        self.mutate(|state| state.edit.take().is_some());
    }

    async fn round_trip<R>(
        &self,
        request: Result<HttpRequest, ApiError>,
        parse: Parser<R>,
    ) -> Result<R, ApiError> {
        let request = request?;
        debug!("event=request method={} url={}", request.method, request.url);
        let response = self.transport.execute(request).await?;
        debug!("event=response status={}", response.status);
        parse(&self.client, response)
    }

    /// Apply an update response unless a later-issued request for the same
    /// task has already been applied. When `close_edit` is set, an edit form
    /// open on `id` is closed too.
    fn apply_update(&self, op: &str, id: &TaskId, seq: u64, task: Task, close_edit: bool) {
        let mut stale = false;
        self.mutate(|state| {
            if !lock(&self.ordering).accept(id, seq) {
                stale = true;
                return false;
            }
            let mut changed = state.replace(task);
            if close_edit && state.edit.as_ref().is_some_and(|edit| &edit.id == id) {
                state.edit = None;
                changed = true;
            }
            changed
        });
        if stale {
            debug!("event={op} status=stale id={id} seq={seq}");
        } else {
            info!("event={op} status=ok id={id}");
        }
    }

    /// Run `change` under the state lock; notify observers if it reports a
    /// change. Returns what `change` returned.
    fn mutate<F>(&self, change: F) -> bool
    where
        F: FnOnce(&mut TaskListState) -> bool,
    {
        let snapshot = {
            let mut state = lock(&self.state);
            if !change(&mut state) {
                return false;
            }
            state.clone()
        };
        let observers: Vec<Observer> = lock(&self.observers)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(&snapshot);
        }
        true
    }
}
