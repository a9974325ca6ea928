//! Configuration management for taskweave.
//!
//! Configuration lives in `.taskweave/config.yaml`:
//!
//! ```yaml
//! storage:
//!   backend: jsonl
//!   data_file: .taskweave/tasks.jsonl
//! ```
//!
//! `data_file` is resolved relative to the directory containing
//! `.taskweave/`.

use crate::error::{ConfigError, Result};
use crate::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the taskweave directory
pub const TASKWEAVE_DIR_NAME: &str = ".taskweave";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the tasks data file
pub const TASKS_FILE_NAME: &str = "tasks.jsonl";

/// Maximum directory depth to traverse when searching for the repository root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskweaveConfig {
    /// Storage configuration
    pub storage: StorageConfig,
}

/// Storage configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Storage backend type: `jsonl` (persistent) or `memory` (ephemeral)
    pub backend: String,

    /// Path to the data file, relative to the repository root
    pub data_file: String,
}

impl Default for TaskweaveConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: "jsonl".to_string(),
                data_file: format!("{TASKWEAVE_DIR_NAME}/{TASKS_FILE_NAME}"),
            },
        }
    }
}

impl TaskweaveConfig {
    /// Load configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()).into())
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Invalid(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }
}

impl StorageConfig {
    /// Resolve this section into a storage backend rooted at `root_dir`.
    pub fn to_backend(&self, root_dir: &Path) -> Result<StorageBackend> {
        match self.backend.as_str() {
            "jsonl" => Ok(StorageBackend::Jsonl(root_dir.join(&self.data_file))),
            "memory" => Ok(StorageBackend::InMemory),
            other => Err(ConfigError::UnknownBackend(other.to_string()).into()),
        }
    }
}

/// Find the repository root by searching up the directory tree.
///
/// Returns the directory containing `.taskweave/`, or `None` if none is
/// found within [`MAX_TRAVERSAL_DEPTH`] levels.
pub fn find_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(TASKWEAVE_DIR_NAME).is_dir() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
