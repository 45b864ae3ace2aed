use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    load_settings,
    settings::{parse_api_base_url, parse_toggle_all_policy},
    HttpTaskSource, JsonFileTaskSource, LoadState, TaskSource, TodoController,
};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::{execute, parse_command, ShellCommand};

#[derive(Parser, Debug)]
#[command(name = "todo-desktop", about = "Terminal front-end for a remote todo list")]
struct Args {
    /// Base url of the todo API (`GET {url}/todos`).
    #[arg(long, conflicts_with = "seed")]
    api_url: Option<String>,
    /// Load tasks from a local JSON file instead of the API.
    #[arg(long)]
    seed: Option<PathBuf>,
    /// Settings file; defaults to ./todo.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// flip_flop or by_completeness.
    #[arg(long)]
    toggle_all: Option<String>,
    /// Print the list as JSON instead of text.
    #[arg(long)]
    json: bool,
    /// Run these commands and exit instead of reading stdin.
    #[arg(short = 'e', long = "exec")]
    exec: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(raw) = &args.api_url {
        settings.api_base_url = parse_api_base_url(raw)?.to_string();
    }
    if let Some(raw) = &args.toggle_all {
        settings.toggle_all = parse_toggle_all_policy(raw)?;
    }

    let filter =
        EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let source: Box<dyn TaskSource> = match &args.seed {
        Some(path) => Box::new(JsonFileTaskSource::new(path)),
        None => Box::new(
            HttpTaskSource::new(&settings.api_url()?, settings.request_timeout())
                .context("failed to build http task source")?,
        ),
    };

    let mut controller = TodoController::initialize(source.as_ref(), settings.toggle_all).await;
    if let LoadState::Unavailable { reason } = controller.load_state() {
        tracing::debug!(%reason, "continuing with an empty list");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    show(&mut out, &controller, args.json)?;

    if !args.exec.is_empty() {
        for line in &args.exec {
            if !run_line(&mut out, &mut controller, line, args.json)? {
                break;
            }
        }
        return Ok(());
    }

    let stdin = io::stdin();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if !run_line(&mut out, &mut controller, &line, args.json)? {
            break;
        }
    }
    Ok(())
}

/// Returns `false` once the user asked to quit.
fn run_line(
    out: &mut impl Write,
    controller: &mut TodoController,
    line: &str,
    json: bool,
) -> Result<bool> {
    let command = match parse_command(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(true),
        Err(err) => {
            writeln!(out, "{err:#}")?;
            return Ok(true);
        }
    };
    if command == ShellCommand::Quit {
        return Ok(false);
    }

    if let Some(note) = execute(controller, &command) {
        writeln!(out, "{note}")?;
    }
    if command.changes_view() {
        show(out, controller, json)?;
    }
    Ok(true)
}

fn show(out: &mut impl Write, controller: &TodoController, json: bool) -> Result<()> {
    let snapshot = controller.snapshot();
    if json {
        writeln!(out, "{}", serde_json::to_string(&snapshot)?)?;
    } else {
        writeln!(out, "{}", render::render_list(&snapshot))?;
    }
    Ok(())
}
