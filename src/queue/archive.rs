use std::path::Path;

use tracing::{debug, warn};

/// True when `document` has a `### <slug>` heading line whose text is exactly `slug`.
pub fn is_archived(document: &str, slug: &str) -> bool {
  document.lines().any(|line| {
    line
      .trim()
      .strip_prefix("### ")
      .is_some_and(|text| text.trim() == slug)
  })
}

/// The completed-work archive. Read-only from the hooks' side.
#[derive(Debug, Default)]
pub struct Archive {
  document: String,
}

impl Archive {
  pub fn load(path: &Path) -> Self {
    let document = match std::fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        debug!("no archive at {}", path.display());
        String::new()
      }
      Err(e) => {
        warn!("failed to read archive {}: {e}", path.display());
        String::new()
      }
    };
    Self { document }
  }

  pub fn contains(&self, slug: &str) -> bool {
    is_archived(&self.document, slug)
  }
}
