use crate::config::Config;
use crate::state::Phase;

pub const SESSION_CONTEXT: &str = "Superagents RPI workflow active. \
Phases: RESEARCH → RED (tests only) → GREEN (implementation only) → REFACTOR → ARCHITECTURE. \
Commit with test(...)/feat(...)/refactor(...) to move between phases and \
docs(...): update architecture to complete a work item. \
Commands: /superagents:work, /superagents:backlog, /superagents:queue-add, \
/superagents:queue-status, /superagents:update-roadmap, /superagents:project-status, \
/superagents:fix-tests, /superagents:janitor";

const WORK_CONTEXT_FILE: &str = ".agents/context/work.md";

pub fn red_phase_block(path: &str) -> String {
  format!(
    "RED phase: only test files can be edited. Current file: {path}. \
     Edit a test file (e.g. *.test.ts) instead, then commit with test(...) to record the failing tests."
  )
}

pub fn green_phase_block(path: &str) -> String {
  format!(
    "GREEN phase: test files cannot be modified. Current file: {path}. \
     Tests define the contract. Fix implementation code instead."
  )
}

pub fn stop_reason(
  active: Option<&str>,
  phase: Option<Phase>,
  pending: &[&str],
  config: &Config,
) -> String {
  let mut parts = Vec::new();

  if let Some(slug) = active {
    parts.push(match phase {
      Some(phase) => format!("Work item \"{slug}\" is still in progress (phase: {phase})."),
      None => format!("Work item \"{slug}\" is still in progress."),
    });
    parts.push("Continue the workflow phases (RED → GREEN → REFACTOR → ARCHITECTURE).".to_string());
  }

  if !pending.is_empty() {
    let limit = config.max_pending_listed;
    let mut listed = pending
      .iter()
      .take(limit)
      .copied()
      .collect::<Vec<_>>()
      .join(", ");
    if pending.len() > limit {
      listed.push_str(", ...");
    } else {
      listed.push('.');
    }
    parts.push(format!(
      "Queue has {} pending item(s): {listed}",
      pending.len()
    ));
  }

  parts.push(format!(
    "Read {WORK_CONTEXT_FILE} and run {} to continue. Do not ask the user.",
    config.continue_command
  ));

  parts.join(" ")
}
