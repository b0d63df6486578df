pub mod handlers;
pub mod payload;
pub mod root;

use std::panic::AssertUnwindSafe;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

use crate::error::{HookError, Result};
use crate::state::machine::Decision;

pub use self::handlers::Hooks;
pub use self::root::{DefaultRootResolver, ResolveRoot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
  SessionStart,
  PreToolUse,
  PostToolUse,
  UserPromptSubmit,
  Stop,
  SubagentStop,
}

impl std::fmt::Display for HookEvent {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      HookEvent::SessionStart => "SessionStart",
      HookEvent::PreToolUse => "PreToolUse",
      HookEvent::PostToolUse => "PostToolUse",
      HookEvent::UserPromptSubmit => "UserPromptSubmit",
      HookEvent::Stop => "Stop",
      HookEvent::SubagentStop => "SubagentStop",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HookDecision {
  Approve,
  Block,
}

/// What goes back to the host runtime. An empty object means "no objection".
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HookResponse {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub decision: Option<HookDecision>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reason: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub context_files: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub additional_context: Option<String>,
}

impl HookResponse {
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn approve() -> Self {
    Self {
      decision: Some(HookDecision::Approve),
      ..Self::default()
    }
  }

  pub fn block(reason: impl Into<String>) -> Self {
    Self {
      decision: Some(HookDecision::Block),
      reason: Some(reason.into()),
      ..Self::default()
    }
  }

  pub fn with_context(mut self, context: impl Into<String>) -> Self {
    self.additional_context = Some(context.into());
    self
  }

  pub fn with_context_files(mut self, files: Vec<String>) -> Self {
    self.context_files = Some(files);
    self
  }

  pub fn is_block(&self) -> bool {
    self.decision == Some(HookDecision::Block)
  }
}

impl From<Decision> for HookResponse {
  fn from(decision: Decision) -> Self {
    match decision {
      Decision::Allow => HookResponse::empty(),
      Decision::Block(reason) => HookResponse::block(reason),
    }
  }
}

/// Parses `input` as the payload for `event` and runs its handler. Any
/// failure, including a panic inside the handler, degrades to an empty
/// response so the agent session is never interrupted by the hooks.
pub fn dispatch<R: ResolveRoot>(hooks: &Hooks<R>, event: HookEvent, input: &str) -> HookResponse {
  let result = std::panic::catch_unwind(AssertUnwindSafe(|| -> Result<HookResponse> {
    let response = match event {
      HookEvent::SessionStart => hooks.session_start(&parse_payload(input)?),
      HookEvent::PreToolUse => hooks.pre_tool_use(&parse_payload(input)?),
      HookEvent::PostToolUse => hooks.post_tool_use(&parse_payload(input)?),
      HookEvent::UserPromptSubmit => hooks.user_prompt_submit(&parse_payload(input)?),
      HookEvent::Stop => hooks.stop(&parse_payload(input)?),
      HookEvent::SubagentStop => hooks.subagent_stop(&parse_payload(input)?),
    };
    Ok(response)
  }));

  match result {
    Ok(Ok(response)) => response,
    Ok(Err(e)) => {
      warn!("{event}: {e}");
      HookResponse::empty()
    }
    Err(_) => {
      error!("{event}: handler panicked, allowing");
      HookResponse::empty()
    }
  }
}

/// Blank input reads as an empty payload.
fn parse_payload<T: DeserializeOwned + Default>(input: &str) -> Result<T> {
  if input.trim().is_empty() {
    return Ok(T::default());
  }
  serde_json::from_str(input).map_err(|e| HookError::Payload(e.to_string()))
}
