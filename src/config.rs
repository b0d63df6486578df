use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{HookError, Result};

pub const CONFIG_FILE: &str = ".agents/hooks.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_agents_dir")]
    pub agents_dir: String,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default = "default_queue_file")]
    pub queue_file: PathBuf,
    #[serde(default = "default_legacy_queue_file")]
    pub legacy_queue_file: PathBuf,
    #[serde(default = "default_archive_file")]
    pub archive_file: PathBuf,
    #[serde(default = "default_edit_tools")]
    pub edit_tools: Vec<String>,
    #[serde(default = "default_test_markers")]
    pub test_markers: Vec<String>,
    #[serde(default = "default_continue_command")]
    pub continue_command: String,
    #[serde(default = "default_max_pending_listed")]
    pub max_pending_listed: usize,
    #[serde(default = "default_skills")]
    pub skills: Vec<SkillConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillConfig {
    pub name: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub context_files: Vec<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

/// Absolute locations of every file the hooks touch for one project root.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub state_file: PathBuf,
    pub queue_file: PathBuf,
    pub legacy_queue_file: PathBuf,
    pub archive_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agents_dir: default_agents_dir(),
            state_file: default_state_file(),
            queue_file: default_queue_file(),
            legacy_queue_file: default_legacy_queue_file(),
            archive_file: default_archive_file(),
            edit_tools: default_edit_tools(),
            test_markers: default_test_markers(),
            continue_command: default_continue_command(),
            max_pending_listed: default_max_pending_listed(),
            skills: default_skills(),
        }
    }
}

fn default_agents_dir() -> String {
    ".agents".to_string()
}
fn default_state_file() -> PathBuf {
    PathBuf::from(".agents/workflow.json")
}
fn default_queue_file() -> PathBuf {
    PathBuf::from(".agents/work/queued.md")
}
fn default_legacy_queue_file() -> PathBuf {
    PathBuf::from(".agents/queue.md")
}
fn default_archive_file() -> PathBuf {
    PathBuf::from(".agents/archive/completed.md")
}
fn default_edit_tools() -> Vec<String> {
    vec!["Edit".into(), "Write".into(), "MultiEdit".into()]
}
fn default_test_markers() -> Vec<String> {
    vec![
        ".test.".into(),
        ".spec.".into(),
        "_test.".into(),
        "__tests__/".into(),
        "/tests/".into(),
        "/test/".into(),
        "/spec/".into(),
    ]
}
fn default_continue_command() -> String {
    "/superagents:work".to_string()
}
fn default_max_pending_listed() -> usize {
    3
}
fn default_skills() -> Vec<SkillConfig> {
    vec![
        SkillConfig {
            name: "tdd".into(),
            keywords: vec!["test".into(), "tests".into(), "tdd".into(), "red green".into()],
            context_files: vec![".agents/skills/tdd.md".into()],
            hint: Some(
                "Follow RED → GREEN → REFACTOR and tag each commit with test/feat/refactor."
                    .into(),
            ),
        },
        SkillConfig {
            name: "debugging".into(),
            keywords: vec![
                "bug".into(),
                "error".into(),
                "failing".into(),
                "broken".into(),
                "crash".into(),
            ],
            context_files: vec![".agents/skills/debugging.md".into()],
            hint: Some("Reproduce the failure with a test before changing code.".into()),
        },
        SkillConfig {
            name: "architecture".into(),
            keywords: vec!["architecture".into(), "design".into(), "refactor".into()],
            context_files: vec![".agents/context/architecture.md".into()],
            hint: Some(
                "Record structural changes with a `docs(...): update architecture` commit.".into(),
            ),
        },
        SkillConfig {
            name: "queue".into(),
            keywords: vec![
                "queue".into(),
                "backlog".into(),
                "next item".into(),
                "roadmap".into(),
            ],
            context_files: vec![".agents/context/work.md".into()],
            hint: Some("The work queue lives in .agents/work/queued.md.".into()),
        },
    ]
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HookError::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `.agents/hooks.yaml` under `root`, falling back to defaults when the
    /// file is missing or unusable. Hooks must never fail on a bad config.
    pub fn for_root(root: &Path) -> Self {
        let path = root.join(CONFIG_FILE);
        match Self::load(&path) {
            Ok(config) => config,
            Err(HookError::ConfigNotFound(_)) => {
                debug!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.max_pending_listed == 0 {
            return Err(HookError::Config(
                "max_pending_listed must be greater than 0".into(),
            ));
        }
        if self.edit_tools.is_empty() {
            return Err(HookError::Config("edit_tools must not be empty".into()));
        }
        for skill in &self.skills {
            if skill.name.trim().is_empty() {
                return Err(HookError::Config("skill name must not be empty".into()));
            }
            if skill.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(HookError::Config(format!(
                    "skill {} has no keywords",
                    skill.name
                )));
            }
        }
        Ok(())
    }

    pub fn paths(&self, root: &Path) -> ProjectPaths {
        ProjectPaths {
            root: root.to_path_buf(),
            state_file: root.join(&self.state_file),
            queue_file: root.join(&self.queue_file),
            legacy_queue_file: root.join(&self.legacy_queue_file),
            archive_file: root.join(&self.archive_file),
        }
    }

    pub fn is_edit_tool(&self, tool_name: &str) -> bool {
        self.edit_tools.iter().any(|t| t == tool_name)
    }
}
