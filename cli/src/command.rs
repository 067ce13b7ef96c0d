//! Line commands typed at the prompt.

use std::str::FromStr;

use thiserror::Error;

pub const HELP: &str = "\
Commands:
  add <title> [| <description>]   create a task directly
  title <text>                    set the draft title
  desc <text>                     set the draft description
  submit                          create a task from the draft
  toggle <n>                      flip done on row n
  delete <n>                      delete row n
  edit <n>                        open the edit form on row n
  set-title <text>                change the title in the edit form
  set-desc <text>                 change the description in the edit form
  save                            save the edit form
  cancel                          close the edit form
  show                            print the list
  help                            print this help
  quit                            exit
";

/// A parsed command. Row numbers are 1-based positions in the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { title: String, description: String },
    DraftTitle(String),
    DraftDescription(String),
    Submit,
    Toggle(usize),
    Delete(usize),
    Edit(usize),
    EditTitle(String),
    EditDescription(String),
    Save,
    Cancel,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Commands that talk to the server; the prompt does not wait for them.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Command::Add { .. } | Command::Submit | Command::Toggle(_) | Command::Delete(_) | Command::Save
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty input")]
    Empty,
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{0}` needs a row number")]
    MissingRow(&'static str),
    #[error("invalid row number `{0}`")]
    InvalidRow(String),
    #[error("`{0}` needs a title")]
    MissingTitle(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "" => Err(CommandError::Empty),
            "add" => parse_add(rest),
            "title" => Ok(Command::DraftTitle(rest.to_string())),
            "desc" => Ok(Command::DraftDescription(rest.to_string())),
            "submit" => Ok(Command::Submit),
            "toggle" => parse_row("toggle", rest).map(Command::Toggle),
            "delete" => parse_row("delete", rest).map(Command::Delete),
            "edit" => parse_row("edit", rest).map(Command::Edit),
            "set-title" => Ok(Command::EditTitle(rest.to_string())),
            "set-desc" => Ok(Command::EditDescription(rest.to_string())),
            "save" => Ok(Command::Save),
            "cancel" => Ok(Command::Cancel),
            "show" | "ls" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_add(rest: &str) -> Result<Command, CommandError> {
    let (title, description) = match rest.split_once('|') {
        Some((title, description)) => (title.trim(), description.trim()),
        None => (rest, ""),
    };
    if title.is_empty() {
        return Err(CommandError::MissingTitle("add"));
    }
    Ok(Command::Add {
        title: title.to_string(),
        description: description.to_string(),
    })
}

fn parse_row(command: &'static str, rest: &str) -> Result<usize, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingRow(command));
    }
    match rest.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(CommandError::InvalidRow(rest.to_string())),
    }
}
