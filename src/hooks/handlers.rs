use chrono::Utc;
use tracing::{debug, info, warn};

use super::payload::{
  HookPayload, PostToolUsePayload, PreToolUsePayload, SessionStartPayload, StopPayload,
  SubagentStopPayload, UserPromptSubmitPayload,
};
use super::root::ResolveRoot;
use super::HookResponse;
use crate::project::Project;
use crate::prompt;
use crate::skills::{self, SkillRegistry};
use crate::state::machine::{self, Synced};

const SHELL_TOOL: &str = "Bash";

/// One handler per lifecycle event. Handlers never fail: state and queue
/// access is soft, so the worst case is an empty (permissive) response.
pub struct Hooks<R> {
  resolver: R,
}

impl<R: ResolveRoot> Hooks<R> {
  pub fn new(resolver: R) -> Self {
    Self { resolver }
  }

  fn project(&self, payload: &dyn HookPayload) -> Project {
    Project::open(&self.resolver.resolve_root(payload))
  }

  pub fn session_start(&self, payload: &SessionStartPayload) -> HookResponse {
    debug!("session start: {:?}", payload.session_id);
    HookResponse::approve().with_context(prompt::SESSION_CONTEXT)
  }

  pub fn pre_tool_use(&self, payload: &PreToolUsePayload) -> HookResponse {
    let project = self.project(payload);
    if !project.config.is_edit_tool(&payload.tool_name) {
      return HookResponse::empty();
    }

    let Some(file_path) = payload
      .tool_input
      .file_path
      .as_deref()
      .filter(|p| !p.is_empty())
    else {
      return HookResponse::empty();
    };

    let phase = project.store().load().and_then(|s| s.current_phase);
    let path = project.relative(file_path);
    let decision = machine::gate_edit(phase, &path, &project.config);
    if !decision.is_allow() {
      info!(
        "blocked {} of {path} during {phase:?} (session {:?})",
        payload.tool_name, payload.session_id
      );
    }
    decision.into()
  }

  pub fn post_tool_use(&self, payload: &PostToolUsePayload) -> HookResponse {
    if payload.tool_name != SHELL_TOOL {
      return HookResponse::empty();
    }
    let Some(command) = payload.tool_input.command.as_deref() else {
      return HookResponse::empty();
    };

    let project = self.project(payload);
    let store = project.store();
    let now = Utc::now();

    // Sync first so an architecture commit can complete an item the state
    // has not picked up from the queue yet.
    let Synced { state, .. } = machine::sync_with_queue(
      &store.load_or_default(),
      &project.queue(),
      &project.archive(),
      now,
    );

    let Some(transition) = machine::apply_commit(&state, command, now) else {
      debug!("not a phase commit: {command}");
      return HookResponse::empty();
    };

    info!(
      "phase {:?} -> {:?}",
      transition.from,
      transition.to()
    );
    if let Some(slug) = &transition.completed {
      warn!(
        "work item {slug} complete, ready to archive in {}",
        project.paths.archive_file.display()
      );
    }

    store.save(&transition.state);
    HookResponse::empty()
  }

  pub fn user_prompt_submit(&self, payload: &UserPromptSubmitPayload) -> HookResponse {
    let project = self.project(payload);
    let registry = SkillRegistry::new(project.config.skills);
    let matched = registry.detect(&payload.prompt);

    if matched.is_empty() {
      return HookResponse::approve();
    }

    debug!(
      "matched skills: {}",
      matched
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
    );

    let files = skills::context_files(&matched);
    let response = HookResponse::approve().with_context(skills::additional_context(&matched));
    if files.is_empty() {
      response
    } else {
      response.with_context_files(files)
    }
  }

  pub fn stop(&self, payload: &StopPayload) -> HookResponse {
    let project = self.project(payload);
    let store = project.store();
    let queue = project.queue();
    let archive = project.archive();

    let Synced { state, adopted } =
      machine::sync_with_queue(&store.load_or_default(), &queue, &archive, Utc::now());
    if let Some(slug) = &adopted {
      info!("adopted work item {slug} from the queue");
    }

    // Written before deciding, whatever the decision turns out to be.
    store.save(&state);

    let pending = queue.pending_slugs(&archive);
    machine::stop_decision(&state, &pending, &project.config).into()
  }

  pub fn subagent_stop(&self, _payload: &SubagentStopPayload) -> HookResponse {
    // Only the top-level Stop hook decides whether work continues.
    HookResponse::empty()
  }
}
