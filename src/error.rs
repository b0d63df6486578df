use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum HookError {
  #[error("config error: {0}")]
  Config(String),

  #[error("config file not found: {0}")]
  ConfigNotFound(PathBuf),

  #[error("payload error: {0}")]
  Payload(String),

  #[error("state error: {0}")]
  State(String),

  #[error("timeout: {0}")]
  Timeout(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("yaml error: {0}")]
  Yaml(#[from] serde_yaml::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HookError>;
