mod config;
mod error;
mod hooks;
mod project;
mod prompt;
mod queue;
mod skills;
mod state;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

use crate::error::{HookError, Result};
use crate::hooks::{DefaultRootResolver, HookEvent, Hooks};
use crate::project::Project;
use crate::queue::{ItemStatus, QueueSource};
use crate::state::machine;

#[derive(Parser)]
#[command(
  name = "superagents-hooks",
  about = "Lifecycle hooks enforcing the RED → GREEN → REFACTOR workflow"
)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Project root used when the payload carries no transcript path
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  /// Seconds to wait for the hook payload on stdin
  #[arg(long, global = true, default_value_t = 5)]
  stdin_timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
  /// SessionStart hook
  SessionStart,
  /// PreToolUse hook: phase-based edit gating
  PreToolUse,
  /// PostToolUse hook: commit-driven phase transitions
  PostToolUse,
  /// UserPromptSubmit hook: skill suggestions
  UserPromptSubmit,
  /// Stop hook: keep working while the queue has work
  Stop,
  /// SubagentStop hook
  SubagentStop,
  /// Show workflow state and queue
  Status,
  /// Adopt the queue's in-progress item into the workflow state
  Sync,
}

impl Commands {
  fn event(&self) -> Option<HookEvent> {
    match self {
      Commands::SessionStart => Some(HookEvent::SessionStart),
      Commands::PreToolUse => Some(HookEvent::PreToolUse),
      Commands::PostToolUse => Some(HookEvent::PostToolUse),
      Commands::UserPromptSubmit => Some(HookEvent::UserPromptSubmit),
      Commands::Stop => Some(HookEvent::Stop),
      Commands::SubagentStop => Some(HookEvent::SubagentStop),
      Commands::Status | Commands::Sync => None,
    }
  }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
  let cli = Cli::parse();

  // stdout carries the hook response, so logs go to stderr.
  let default_level = if cli.command.event().is_some() {
    "warn"
  } else {
    "info"
  };
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
    )
    .init();

  if let Err(e) = run(cli).await {
    error!("{e}");
    std::process::exit(1);
  }
}

async fn run(cli: Cli) -> Result<()> {
  let root = project_root(cli.root, std::env::current_dir());

  match cli.command.event() {
    Some(event) => {
      let hooks = Hooks::new(DefaultRootResolver::new(&root));
      cmd_hook(&hooks, event, Duration::from_secs(cli.stdin_timeout)).await
    }
    None => match cli.command {
      Commands::Sync => cmd_sync(&root),
      _ => cmd_status(&root),
    },
  }
}

/// `--root`, else the working directory. Hooks must still answer when the
/// working directory is gone, so that falls back to `.`.
fn project_root(explicit: Option<PathBuf>, cwd: std::io::Result<PathBuf>) -> PathBuf {
  explicit.unwrap_or_else(|| {
    cwd.unwrap_or_else(|e| {
      warn!("cannot read working directory: {e}, using .");
      PathBuf::from(".")
    })
  })
}

async fn cmd_hook(
  hooks: &Hooks<DefaultRootResolver>,
  event: HookEvent,
  timeout: Duration,
) -> Result<()> {
  let input = match read_stdin(timeout).await {
    Ok(input) => input,
    Err(e) => {
      warn!("{event}: {e}, allowing");
      println!("{{}}");
      // The blocking stdin reader may still hold the runtime open.
      std::process::exit(0);
    }
  };

  let response = hooks::dispatch(hooks, event, &input);
  if response.is_block() {
    info!("{event}: block");
  }
  println!("{}", serde_json::to_string(&response)?);
  Ok(())
}

async fn read_stdin(timeout: Duration) -> Result<String> {
  let mut input = String::new();
  tokio::time::timeout(timeout, tokio::io::stdin().read_to_string(&mut input))
    .await
    .map_err(|_| {
      HookError::Timeout(format!(
        "no payload on stdin after {}s",
        timeout.as_secs()
      ))
    })??;
  Ok(input)
}

fn cmd_status(root: &Path) -> Result<()> {
  let project = Project::open(root);
  let state = project.store().load();
  let queue = project.queue();
  let archive = project.archive();

  println!("superagents status");
  println!("==================");
  println!("root:      {}", root.display());

  match &state {
    Some(state) => {
      let phase = state
        .current_phase
        .map(|p| p.to_string())
        .unwrap_or_else(|| "none".into());
      let item = state.current_work_item.as_deref().unwrap_or("none");
      let since = state
        .work_item_started_at
        .map(|t| format!(" (since {})", t.to_rfc3339()))
        .unwrap_or_default();
      println!("phase:     {phase}");
      println!("work item: {item}{since}");
      println!("stats:     {}", state.stats);
      if !state.completed_items.is_empty() {
        println!("completed: {}", state.completed_items.join(", "));
      }
    }
    None => println!("state:     not initialized"),
  }

  println!();
  let source = match queue.source() {
    Some(QueueSource::Primary) => project.paths.queue_file.display().to_string(),
    Some(QueueSource::Legacy) => format!("{} (legacy)", project.paths.legacy_queue_file.display()),
    None => "empty".to_string(),
  };
  println!("queue:     {source}");
  if queue.is_empty() {
    println!("  (no items)");
  }
  for item in queue.items() {
    let marker = match item.status {
      ItemStatus::InProgress => "*",
      ItemStatus::UpNext => "-",
    };
    let archived = if archive.contains(&item.slug) {
      " [archived]"
    } else {
      ""
    };
    println!("  {marker} [{}] {item}{archived}", item.status.section());
  }
  println!("pending:   {}", queue.pending_slugs(&archive).len());

  Ok(())
}

fn cmd_sync(root: &Path) -> Result<()> {
  let project = Project::open(root);
  let store = project.store();
  let synced = machine::sync_with_queue(
    &store.load_or_default(),
    &project.queue(),
    &project.archive(),
    Utc::now(),
  );

  if !store.save(&synced.state) {
    return Err(HookError::State(format!(
      "failed to write {}",
      store.path().display()
    )));
  }

  match (&synced.adopted, &synced.state.current_work_item) {
    (Some(slug), _) => println!("Adopted {slug} from the queue."),
    (None, Some(slug)) => println!("Already working on {slug}."),
    (None, None) => println!("Nothing in progress."),
  }
  Ok(())
}
