//! Phase transitions.
//!
//! Everything here is a pure function of the current [`WorkflowState`] and an
//! event (a shell command, an edit target, a queue snapshot). Loading and
//! saving happen in the handlers through [`super::store::WorkflowStore`].

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::prompt;
use crate::queue::archive::Archive;
use crate::queue::Queue;
use crate::state::{Phase, WorkflowState};

const ARCHITECTURE_MARKER: &str = "update architecture";

/// Result of a recognized commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
  pub from: Option<Phase>,
  pub state: WorkflowState,
  /// Work item finished by an architecture commit, for archival.
  pub completed: Option<String>,
}

impl Transition {
  pub fn to(&self) -> Option<Phase> {
    self.state.current_phase
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Synced {
  pub state: WorkflowState,
  pub adopted: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
  Allow,
  Block(String),
}

impl Decision {
  pub fn is_allow(&self) -> bool {
    matches!(self, Decision::Allow)
  }
}

/// Message of a `git commit` command: the first `-m`/`--message` argument.
///
/// The command is split on unquoted `&&`, `||`, `;`, `|` and newlines and
/// each segment is tokenized on its own, so only a segment that actually
/// runs `git [global options] commit` counts.
pub fn commit_message(command: &str) -> Option<String> {
  command_segments(command).into_iter().find_map(|segment| {
    let tokens = shell_words::split(segment).ok()?;
    let message = message_arg(commit_args(&tokens)?)?;
    Some(resolve_heredoc(&message).unwrap_or(message))
  })
}

fn command_segments(command: &str) -> Vec<&str> {
  let mut segments = Vec::new();
  let mut start = 0;
  let mut quote: Option<char> = None;
  let mut escaped = false;
  let mut chars = command.char_indices().peekable();

  while let Some((i, c)) = chars.next() {
    if escaped {
      escaped = false;
      continue;
    }
    match (quote, c) {
      (Some('\''), '\'') => quote = None,
      (Some('\''), _) => {}
      (_, '\\') => escaped = true,
      (Some(q), _) if c == q => quote = None,
      (Some(_), _) => {}
      (None, '\'' | '"') => quote = Some(c),
      (None, ';' | '\n' | '&' | '|') => {
        segments.push(&command[start..i]);
        // `&&` and `||` are one separator.
        if matches!(c, '&' | '|') && chars.peek().is_some_and(|&(_, next)| next == c) {
          chars.next();
        }
        start = chars.peek().map_or(command.len(), |&(j, _)| j);
      }
      _ => {}
    }
  }
  segments.push(&command[start..]);
  segments
}

/// Arguments after `commit` when `tokens` invoke `git commit`.
fn commit_args(tokens: &[String]) -> Option<&[String]> {
  let program = tokens
    .iter()
    .position(|t| t.starts_with('-') || !t.contains('='))?;
  let (git, mut rest) = tokens[program..].split_first()?;
  if git != "git" && !git.ends_with("/git") {
    return None;
  }

  loop {
    let (arg, tail) = rest.split_first()?;
    match arg.as_str() {
      "commit" => return Some(tail),
      "-C" | "-c" | "--git-dir" | "--work-tree" | "--namespace" => rest = tail.get(1..)?,
      flag if flag.starts_with('-') => rest = tail,
      _ => return None,
    }
  }
}

fn message_arg(args: &[String]) -> Option<String> {
  let mut args = args.iter();
  while let Some(arg) = args.next() {
    if arg == "--" {
      break;
    }
    if arg == "-m" || arg == "--message" {
      return args.next().cloned();
    }
    if let Some(value) = arg
      .strip_prefix("--message=")
      .or_else(|| arg.strip_prefix("-m"))
    {
      return Some(value.to_string());
    }
    // Bundled short flags ending in `m`, e.g. `-am`.
    let bundled = arg
      .strip_prefix('-')
      .filter(|flags| flags.len() > 1 && flags.ends_with('m'))
      .is_some_and(|flags| flags.chars().all(|c| c.is_ascii_alphabetic()));
    if bundled {
      return args.next().cloned();
    }
  }
  None
}

/// `"$(cat <<'EOF' ... EOF)"` is how agents usually pass multi-line messages.
fn resolve_heredoc(message: &str) -> Option<String> {
  let mut lines = message.trim_start().lines();
  let first = lines.next()?;
  if !first.trim_start().starts_with("$(cat") {
    return None;
  }
  let marker = first
    .split("<<")
    .nth(1)?
    .trim()
    .trim_start_matches('-')
    .trim_matches(|c| c == '\'' || c == '"');

  let body: Vec<&str> = lines.take_while(|l| l.trim() != marker).collect();
  Some(body.join("\n"))
}

/// Phase a commit message moves the workflow into, keyed by its
/// conventional-commit type (`type(scope)!: subject`).
pub fn classify(message: &str) -> Option<Phase> {
  let subject = message.lines().map(str::trim).find(|l| !l.is_empty())?;

  let type_end = subject
    .find(|c: char| !c.is_ascii_alphanumeric())
    .unwrap_or(subject.len());
  let (kind, mut rest) = subject.split_at(type_end);

  if rest.starts_with('(') {
    let close = rest.find(')')?;
    rest = &rest[close + 1..];
  }
  rest = rest.strip_prefix('!').unwrap_or(rest);
  if !rest.starts_with(':') {
    return None;
  }

  match kind.to_lowercase().as_str() {
    "test" => Some(Phase::Red),
    "feat" => Some(Phase::Green),
    "refactor" => Some(Phase::Refactor),
    "docs" if message.to_lowercase().contains(ARCHITECTURE_MARKER) => Some(Phase::Architecture),
    _ => None,
  }
}

/// Applies a shell command to the state. `None` means the command was not a
/// recognized commit and the state is unchanged.
pub fn apply_commit(
  state: &WorkflowState,
  command: &str,
  now: DateTime<Utc>,
) -> Option<Transition> {
  let message = commit_message(command)?;
  let target = classify(&message)?;

  let mut next = state.clone();
  let mut completed = None;

  next.current_phase = match (target, next.current_work_item.take()) {
    (Phase::Architecture, Some(slug)) => {
      next.work_item_started_at = None;
      next.mark_completed(&slug);
      next.stats.items_completed += 1;
      completed = Some(slug);
      None
    }
    (phase, item) => {
      next.current_work_item = item;
      Some(phase)
    }
  };

  next.stats.commits_observed += 1;
  if next.current_phase != state.current_phase {
    next.stats.phase_changes += 1;
  }
  next.last_updated = Some(now);

  Some(Transition {
    from: state.current_phase,
    state: next,
    completed,
  })
}

pub fn is_private_path(path: &str, agents_dir: &str) -> bool {
  let normalized = format!("/{}", path.replace('\\', "/"));
  normalized.contains(&format!("/{}/", agents_dir.trim_matches('/')))
}

pub fn is_test_file(path: &str, markers: &[String]) -> bool {
  let normalized = format!("/{}", path.replace('\\', "/"));
  markers.iter().any(|m| normalized.contains(m.as_str()))
}

/// Whether an edit of `path` is allowed during `phase`.
pub fn gate_edit(phase: Option<Phase>, path: &str, config: &Config) -> Decision {
  if is_private_path(path, &config.agents_dir) {
    return Decision::Allow;
  }

  let is_test = is_test_file(path, &config.test_markers);
  match phase {
    Some(Phase::Red) if !is_test => Decision::Block(prompt::red_phase_block(path)),
    Some(Phase::Green) if is_test => Decision::Block(prompt::green_phase_block(path)),
    // research and architecture have no edit rules.
    _ => Decision::Allow,
  }
}

/// Adopts the queue's in-progress item when no work item is set. Never
/// replaces or clears an existing one.
pub fn sync_with_queue(
  state: &WorkflowState,
  queue: &Queue,
  archive: &Archive,
  now: DateTime<Utc>,
) -> Synced {
  let mut next = state.clone();
  let mut adopted = None;

  if next.current_work_item.is_none() {
    if let Some(item) = queue.in_progress().filter(|i| !archive.contains(&i.slug)) {
      next.current_work_item = Some(item.slug.clone());
      next.work_item_started_at = Some(now);
      adopted = Some(item.slug.clone());
    }
  }

  next.last_updated = Some(now);
  Synced {
    state: next,
    adopted,
  }
}

/// Stopping is allowed only with no active work item and nothing pending.
pub fn stop_decision(state: &WorkflowState, pending: &[&str], config: &Config) -> Decision {
  match state.current_work_item.as_deref() {
    None if pending.is_empty() => Decision::Allow,
    active => Decision::Block(prompt::stop_reason(
      active,
      state.active_phase(),
      pending,
      config,
    )),
  }
}
