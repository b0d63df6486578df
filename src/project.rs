use std::path::Path;

use crate::config::{Config, ProjectPaths};
use crate::queue::archive::Archive;
use crate::queue::Queue;
use crate::state::store::WorkflowStore;

/// Config plus resolved file locations for one project root.
pub struct Project {
  pub config: Config,
  pub paths: ProjectPaths,
}

impl Project {
  pub fn open(root: &Path) -> Self {
    let config = Config::for_root(root);
    let paths = config.paths(root);
    Self { config, paths }
  }

  pub fn store(&self) -> WorkflowStore {
    WorkflowStore::for_paths(&self.paths)
  }

  pub fn queue(&self) -> Queue {
    Queue::load(&self.paths.queue_file, &self.paths.legacy_queue_file)
  }

  pub fn archive(&self) -> Archive {
    Archive::load(&self.paths.archive_file)
  }

  /// `path` relative to the project root when it lies inside it.
  pub fn relative<'a>(&self, path: &'a str) -> std::borrow::Cow<'a, str> {
    match Path::new(path).strip_prefix(&self.paths.root) {
      Ok(rel) => rel.to_string_lossy().into_owned().into(),
      Err(_) => path.into(),
    }
  }
}
