//! Terminal front end for the to-do list.
//!
//! `todo-core` owns the state and the HTTP semantics; this crate supplies
//! configuration, a reqwest-backed `Transport`, and a line-oriented prompt
//! that re-renders the list whenever the controller reports a change.

pub mod app;
pub mod command;
pub mod config;
pub mod transport;

pub use app::{execute, run, AppError, Flow};
pub use command::{Command, CommandError};
pub use config::Config;
pub use transport::ReqwestTransport;
