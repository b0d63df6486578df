use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Fields every lifecycle payload may carry that root resolution cares about.
pub trait HookPayload {
  fn transcript_path(&self) -> Option<&Path>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolInput {
  #[serde(default)]
  pub file_path: Option<String>,
  #[serde(default)]
  pub command: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionStartPayload {
  #[serde(default)]
  pub session_id: Option<String>,
  #[serde(default)]
  pub transcript_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreToolUsePayload {
  #[serde(default)]
  pub tool_name: String,
  #[serde(default)]
  pub tool_input: ToolInput,
  #[serde(default)]
  pub session_id: Option<String>,
  #[serde(default)]
  pub transcript_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostToolUsePayload {
  #[serde(default)]
  pub tool_name: String,
  #[serde(default)]
  pub tool_input: ToolInput,
  #[serde(default)]
  pub transcript_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPromptSubmitPayload {
  #[serde(default)]
  pub prompt: String,
  #[serde(default)]
  pub transcript_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopPayload {
  #[serde(default)]
  pub transcript_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubagentStopPayload {
  #[serde(default)]
  pub transcript_path: Option<PathBuf>,
}

impl HookPayload for SessionStartPayload {
  fn transcript_path(&self) -> Option<&Path> {
    self.transcript_path.as_deref()
  }
}

impl HookPayload for PreToolUsePayload {
  fn transcript_path(&self) -> Option<&Path> {
    self.transcript_path.as_deref()
  }
}

impl HookPayload for PostToolUsePayload {
  fn transcript_path(&self) -> Option<&Path> {
    self.transcript_path.as_deref()
  }
}

impl HookPayload for UserPromptSubmitPayload {
  fn transcript_path(&self) -> Option<&Path> {
    self.transcript_path.as_deref()
  }
}

impl HookPayload for StopPayload {
  fn transcript_path(&self) -> Option<&Path> {
    self.transcript_path.as_deref()
  }
}

impl HookPayload for SubagentStopPayload {
  fn transcript_path(&self) -> Option<&Path> {
    self.transcript_path.as_deref()
  }
}
