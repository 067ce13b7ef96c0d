use std::sync::Arc;

use clap::Parser;
use log::info;
use todo_cli::{Config, ReqwestTransport};
use todo_core::{render, TodoClient, TodoListController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    // stderr, so the rendered list on stdout stays readable
    let _logger = config.logger()?.start()?;
    info!("event=start base_url={}", config.base_url);

    let transport = ReqwestTransport::new()?;
    let controller = Arc::new(TodoListController::new(TodoClient::new(&config.base_url), transport));
    controller.subscribe(|state| print!("{}", render(state)));

    todo_cli::run(controller, tokio::io::stdin()).await
}
