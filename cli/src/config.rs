use clap::Parser;
use flexi_logger::{FlexiLoggerError, Logger};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Terminal to-do list backed by the `/api/todo` REST API.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-cli", version)]
pub struct Config {
    /// Server origin; requests go to `<base-url>/api/todo`.
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log specification for stderr output, e.g. `info` or `todo_core=debug`.
    #[arg(long, env = "TODO_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Stderr logger; `RUST_LOG` takes precedence over `log_level`.
    pub fn logger(&self) -> Result<Logger, FlexiLoggerError> {
        Logger::try_with_env_or_str(&self.log_level)
    }
}
