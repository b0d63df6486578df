use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::ProjectPaths;
use crate::error::Result;
use crate::state::WorkflowState;

/// Load/save boundary for the workflow record. Nothing else touches the file.
///
/// Both directions fail soft: a missing or malformed file reads as absent and
/// a failed write is logged and reported as `false`.
pub struct WorkflowStore {
    path: PathBuf,
}

impl WorkflowStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn for_paths(paths: &ProjectPaths) -> Self {
        Self::new(&paths.state_file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<WorkflowState> {
        match self.try_load() {
            Ok(state) => state,
            Err(e) => {
                warn!("failed to load {}: {e}", self.path.display());
                None
            }
        }
    }

    pub fn load_or_default(&self) -> WorkflowState {
        self.load().unwrap_or_else(|| {
            info!("creating new workflow state for {}", self.path.display());
            WorkflowState::default()
        })
    }

    pub fn save(&self, state: &WorkflowState) -> bool {
        match self.try_save(state) {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to save {}: {e}", self.path.display());
                false
            }
        }
    }

    fn try_load(&self) -> Result<Option<WorkflowState>> {
        if !self.path.exists() {
            debug!("no workflow state at {}", self.path.display());
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let state = serde_json::from_str(&content)?;
        Ok(Some(state))
    }

    fn try_save(&self, state: &WorkflowState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, content)?;
        debug!("saved workflow state to {}", self.path.display());
        Ok(())
    }
}
