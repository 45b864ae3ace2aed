//! Shell commands typed by the user and their effect on the controller.

use anyhow::{anyhow, bail, Context, Result};
use client_core::TodoController;
use shared::{
    domain::{Filter, TaskId},
    protocol::{AddOutcome, Change},
};

pub const HELP: &str = "\
commands:
  add <title>            add a task, or show the existing one with that title
  edit <id> <title>      rename a task
  toggle <id>            flip a task between active and completed
  delete <id>            remove a task
  toggle-all             mark every task completed / active
  filter <all|active|completed>
  clear                  remove completed tasks
  list                   show the current view
  count                  number of active tasks
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(String),
    Edit { task_id: TaskId, title: String },
    Toggle(TaskId),
    Delete(TaskId),
    ToggleAll,
    Filter(Filter),
    ClearCompleted,
    List,
    Count,
    Help,
    Quit,
}

impl ShellCommand {
    /// Whether the list should be re-rendered after running the command.
    pub fn changes_view(&self) -> bool {
        !matches!(self, ShellCommand::Count | ShellCommand::Help | ShellCommand::Quit)
    }
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "add" | "a" => ShellCommand::Add(rest.to_string()),
        "edit" | "e" => {
            let (id, title) = rest
                .split_once(char::is_whitespace)
                .map(|(id, title)| (id, title.to_string()))
                .unwrap_or((rest, String::new()));
            ShellCommand::Edit {
                task_id: parse_task_id(id)?,
                title,
            }
        }
        "toggle" | "t" => ShellCommand::Toggle(parse_task_id(rest)?),
        "delete" | "rm" => ShellCommand::Delete(parse_task_id(rest)?),
        "toggle-all" | "ta" => ShellCommand::ToggleAll,
        "filter" | "f" => ShellCommand::Filter(rest.parse()?),
        "clear" => ShellCommand::ClearCompleted,
        "list" | "ls" => ShellCommand::List,
        "count" => ShellCommand::Count,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(command))
}

fn parse_task_id(raw: &str) -> Result<TaskId> {
    if raw.is_empty() {
        return Err(anyhow!("missing task id"));
    }
    raw.parse()
        .with_context(|| format!("invalid task id '{raw}'"))
}

/// Runs `command` against the controller and returns a one-line note for the
/// user, if there is anything to say.
pub fn execute(controller: &mut TodoController, command: &ShellCommand) -> Option<String> {
    match command {
        ShellCommand::Add(text) => {
            controller.set_draft(text.clone());
            match controller.submit_draft() {
                AddOutcome::Added { task_id } => Some(format!("added #{task_id}")),
                AddOutcome::Found { task_id } => {
                    Some(format!("#{task_id} already exists; showing it"))
                }
                AddOutcome::Ignored(reason) => Some(format!("nothing added: {reason}")),
            }
        }
        ShellCommand::Edit { task_id, title } => {
            let started = controller.begin_edit(*task_id);
            if let Change::Ignored(reason) = started {
                return Some(format!("not renamed: {reason}"));
            }
            controller.update_edit(title.clone());
            describe(controller.commit_edit(), "not renamed")
        }
        ShellCommand::Toggle(task_id) => describe(controller.toggle_done(*task_id), "not toggled"),
        ShellCommand::Delete(task_id) => describe(controller.delete(*task_id), "not deleted"),
        ShellCommand::ToggleAll => describe(controller.toggle_all(), "not toggled"),
        ShellCommand::Filter(filter) => describe(controller.set_filter(*filter), "filter unchanged"),
        ShellCommand::ClearCompleted => describe(controller.clear_completed(), "nothing cleared"),
        ShellCommand::Count => Some(controller.count_active().to_string()),
        ShellCommand::Help => Some(HELP.to_string()),
        ShellCommand::List | ShellCommand::Quit => None,
    }
}

fn describe(change: Change, prefix: &str) -> Option<String> {
    match change {
        Change::Applied => None,
        Change::Ignored(reason) => Some(format!("{prefix}: {reason}")),
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
