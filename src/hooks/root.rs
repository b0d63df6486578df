use std::path::{Path, PathBuf};

use tracing::debug;

use super::payload::HookPayload;

/// Maps an incoming payload to the project root the hooks operate on.
pub trait ResolveRoot {
  fn resolve_root(&self, payload: &dyn HookPayload) -> PathBuf;
}

/// Two directories above `transcript_path` when the payload has one,
/// otherwise a fixed fallback (the process working directory or `--root`).
#[derive(Debug, Clone)]
pub struct DefaultRootResolver {
  fallback: PathBuf,
}

impl DefaultRootResolver {
  pub fn new(fallback: impl Into<PathBuf>) -> Self {
    Self {
      fallback: fallback.into(),
    }
  }
}

impl ResolveRoot for DefaultRootResolver {
  fn resolve_root(&self, payload: &dyn HookPayload) -> PathBuf {
    let from_transcript = payload
      .transcript_path()
      .and_then(Path::parent)
      .and_then(Path::parent)
      .filter(|p| !p.as_os_str().is_empty());

    match from_transcript {
      Some(root) => {
        debug!("root from transcript: {}", root.display());
        root.to_path_buf()
      }
      None => self.fallback.clone(),
    }
  }
}
