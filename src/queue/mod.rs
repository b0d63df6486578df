pub mod archive;
pub mod parser;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use self::archive::Archive;
use self::parser::{parse_legacy_queue, parse_queue};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
  InProgress,
  UpNext,
}

impl ItemStatus {
  /// The queue heading this status is read from.
  pub fn section(self) -> &'static str {
    match self {
      ItemStatus::InProgress => "In Progress",
      ItemStatus::UpNext => "Up Next",
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkItem {
  pub slug: String,
  pub status: ItemStatus,
  pub description: String,
}

impl std::fmt::Display for WorkItem {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if self.description.is_empty() {
      write!(f, "{}", self.slug)
    } else {
      write!(f, "{}: {}", self.slug, self.description)
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueSource {
  Primary,
  Legacy,
}

/// Parsed snapshot of the work queue. Re-read on every event, never written.
#[derive(Debug, Clone, Default)]
pub struct Queue {
  items: Vec<WorkItem>,
  source: Option<QueueSource>,
}

impl Queue {
  pub fn new(items: Vec<WorkItem>) -> Self {
    Self {
      items,
      source: Some(QueueSource::Primary),
    }
  }

  /// Reads the primary queue, falling back to the legacy checkbox document
  /// when the primary one is missing or has no items.
  pub fn load(primary: &Path, legacy: &Path) -> Self {
    let items = read_document(primary)
      .map(|doc| parse_queue(&doc))
      .unwrap_or_default();
    if !items.is_empty() {
      debug!("queue: {} item(s) from {}", items.len(), primary.display());
      return Self::new(items);
    }

    let items = read_document(legacy)
      .map(|doc| parse_legacy_queue(&doc))
      .unwrap_or_default();
    if !items.is_empty() {
      debug!("queue: {} item(s) from legacy {}", items.len(), legacy.display());
      return Self {
        source: Some(QueueSource::Legacy),
        ..Self::new(items)
      };
    }

    Self::default()
  }

  pub fn items(&self) -> &[WorkItem] {
    &self.items
  }

  pub fn source(&self) -> Option<QueueSource> {
    self.source
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// The authoritative active item: the first one under "In Progress".
  pub fn in_progress(&self) -> Option<&WorkItem> {
    self
      .items
      .iter()
      .find(|i| i.status == ItemStatus::InProgress)
  }

  pub fn up_next(&self) -> impl Iterator<Item = &WorkItem> {
    self
      .items
      .iter()
      .filter(|i| i.status == ItemStatus::UpNext)
  }

  /// Up Next slugs that have not already been archived.
  pub fn pending_slugs(&self, archive: &Archive) -> Vec<&str> {
    self
      .up_next()
      .map(|i| i.slug.as_str())
      .filter(|slug| !archive.contains(slug))
      .collect()
  }
}

fn read_document(path: &Path) -> Option<String> {
  match std::fs::read_to_string(path) {
    Ok(content) => Some(content),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
    Err(e) => {
      warn!("failed to read queue {}: {e}", path.display());
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
  }

  #[test]
  fn test_load_primary() {
    let tmp = TempDir::new().unwrap();
    let primary = write(&tmp, "queued.md", "## In Progress\n- **a** - x\n## Up Next\n- **b** - y\n");
    let queue = Queue::load(&primary, &tmp.path().join("queue.md"));
    assert_eq!(queue.source(), Some(QueueSource::Primary));
    assert_eq!(queue.in_progress().map(|i| i.slug.as_str()), Some("a"));
    assert_eq!(queue.up_next().count(), 1);
  }

  #[test]
  fn test_empty_primary_falls_back_to_legacy() {
    let tmp = TempDir::new().unwrap();
    let primary = write(&tmp, "queued.md", "# Queue\n\nNothing here yet.\n");
    let legacy = write(&tmp, "queue.md", "## Up Next\n- [ ] old-item: from before\n");
    let queue = Queue::load(&primary, &legacy);
    assert_eq!(queue.source(), Some(QueueSource::Legacy));
    assert_eq!(queue.items()[0].slug, "old-item");
  }

  #[test]
  fn test_missing_primary_falls_back_to_legacy() {
    let tmp = TempDir::new().unwrap();
    let legacy = write(&tmp, "queue.md", "## In Progress\n- [ ] **wip** - x\n");
    let queue = Queue::load(&tmp.path().join("queued.md"), &legacy);
    assert_eq!(queue.in_progress().map(|i| i.slug.as_str()), Some("wip"));
  }

  #[test]
  fn test_primary_wins_when_both_present() {
    let tmp = TempDir::new().unwrap();
    let primary = write(&tmp, "queued.md", "## Up Next\n- **new** - x\n");
    let legacy = write(&tmp, "queue.md", "## Up Next\n- [ ] old: y\n");
    let queue = Queue::load(&primary, &legacy);
    assert_eq!(queue.items().len(), 1);
    assert_eq!(queue.items()[0].slug, "new");
  }

  #[test]
  fn test_nothing_on_disk() {
    let tmp = TempDir::new().unwrap();
    let queue = Queue::load(&tmp.path().join("a.md"), &tmp.path().join("b.md"));
    assert!(queue.is_empty());
    assert_eq!(queue.source(), None);
    assert!(queue.in_progress().is_none());
  }

  #[test]
  fn test_first_in_progress_is_authoritative() {
    let queue = Queue::new(parse_queue(
      "## In Progress\n- **first** - x\n- **second** - y\n",
    ));
    assert_eq!(queue.in_progress().map(|i| i.slug.as_str()), Some("first"));
  }

  #[test]
  fn test_pending_slugs_skip_archived() {
    let tmp = TempDir::new().unwrap();
    let archive_path = write(&tmp, "completed.md", "### done-already\n");
    let archive = Archive::load(&archive_path);
    let queue = Queue::new(parse_queue(
      "## Up Next\n- **done-already** - stale\n- **todo** - x\n",
    ));
    assert_eq!(queue.pending_slugs(&archive), vec!["todo"]);
  }

  #[test]
  fn test_work_item_display() {
    let item = WorkItem {
      slug: "add-login".into(),
      status: ItemStatus::UpNext,
      description: "Login form".into(),
    };
    assert_eq!(item.to_string(), "add-login: Login form");
    assert_eq!(item.status.section(), "Up Next");
  }
}
