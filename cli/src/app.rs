//! The prompt loop: reads commands, drives the controller, prints the view.
//!
//! Commands that only touch local state run inline. Server commands are
//! spawned so the prompt stays responsive; their results show up through the
//! state observer when the response arrives. Server commands wait for the
//! initial load, and `run` returns only after every spawned command is done.

use std::sync::Arc;

use log::debug;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::{JoinHandle, JoinSet};
use todo_core::{render, Task, TaskDraft, TodoListController, Transport};

use crate::command::{Command, HELP};

/// What the prompt should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Render,
    Help,
    Quit,
}

/// Problems the user can fix; request failures are logged by the controller
/// and never reach here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("no task at row {0}")]
    NoSuchRow(usize),
    #[error("no task is being edited; use `edit <n>` first")]
    NotEditing,
}

fn task_at<T: Transport>(controller: &TodoListController<T>, row: usize) -> Result<Task, AppError> {
    row.checked_sub(1)
        .and_then(|index| controller.state().items.get(index).cloned())
        .ok_or(AppError::NoSuchRow(row))
}

/// Run one command to completion.
pub async fn execute<T: Transport>(
    controller: &TodoListController<T>,
    command: Command,
) -> Result<Flow, AppError> {
    debug!("event=command command={command:?}");
    match command {
        Command::Add { title, description } => {
            let _ = controller.create(TaskDraft { title, description }).await;
        }
        Command::DraftTitle(title) => controller.set_draft_title(title),
        Command::DraftDescription(description) => controller.set_draft_description(description),
        Command::Submit => {
            let _ = controller.submit_draft().await;
        }
        Command::Toggle(row) => {
            let task = task_at(controller, row)?;
            let _ = controller.toggle_done(&task.id).await;
        }
        Command::Delete(row) => {
            let task = task_at(controller, row)?;
            let _ = controller.delete(&task.id).await;
        }
        Command::Edit(row) => {
            let task = task_at(controller, row)?;
            controller.begin_edit(&task);
        }
        Command::EditTitle(title) => {
            if !controller.edit_title(title) {
                return Err(AppError::NotEditing);
            }
        }
        Command::EditDescription(description) => {
            if !controller.edit_description(description) {
                return Err(AppError::NotEditing);
            }
        }
        Command::Save => {
            if !controller.state().is_editing() {
                return Err(AppError::NotEditing);
            }
            let _ = controller.save_edit().await;
        }
        Command::Cancel => controller.cancel_edit(),
        Command::Show => return Ok(Flow::Render),
        Command::Help => return Ok(Flow::Help),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Read commands from `input` until EOF or `quit`, then wait for the
/// server commands still in flight.
pub async fn run<T, R>(controller: Arc<TodoListController<T>>, input: R) -> anyhow::Result<()>
where
    T: Transport + 'static,
    R: AsyncRead + Unpin,
{
    print!("{}", render(&controller.state()));
    let mut initial_load: Option<JoinHandle<()>> = Some(tokio::spawn({
        let controller = Arc::clone(&controller);
        async move {
            let _ = controller.load_all().await;
        }
    }));
    let mut in_flight = JoinSet::new();

    let mut lines = BufReader::new(input).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(err) => {
                println!("{err}; type `help` for commands");
                continue;
            }
        };

        if command.is_remote() {
            // A list response applied after a create would drop the new row.
            if let Some(load) = initial_load.take() {
                load.await?;
            }
            let controller = Arc::clone(&controller);
            in_flight.spawn(async move {
                if let Err(err) = execute(&controller, command).await {
                    println!("{err}");
                }
            });
            continue;
        }

        match execute(&controller, command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Render) => print!("{}", render(&controller.state())),
            Ok(Flow::Help) => print!("{HELP}"),
            Ok(Flow::Quit) => break,
            Err(err) => println!("{err}"),
        }
    }

    if let Some(load) = initial_load {
        load.await?;
    }
    debug!("event=drain in_flight={}", in_flight.len());
    while let Some(joined) = in_flight.join_next().await {
        joined?;
    }
    Ok(())
}
