//! Client core for the to-do list view.
//!
//! # Overview
//! `TodoClient` builds `HttpRequest` values and parses `HttpResponse` values
//! for the `/api/todo` API without touching the network. A `Transport`
//! executes the round-trip. `TodoListController` ties the two together,
//! owns the `TaskListState` the view renders, and notifies observers when it
//! changes.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each CRUD operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and the core stays deterministic under test.
//! - Local state follows the server: nothing changes until a response
//!   arrives.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod controller;
pub mod error;
pub mod http;
mod ordering;
pub mod state;
pub mod types;
pub mod view;

pub use client::TodoClient;
pub use controller::{Observer, SubscriptionId, TodoListController};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use state::TaskListState;
pub use types::{EditState, Task, TaskDraft, TaskId};
pub use view::{render, View};
