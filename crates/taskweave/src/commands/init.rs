//! Implementation of the `init` command.
//!
//! Creates the `.taskweave/` directory with a configuration file and an
//! empty task data file.

use crate::config::{CONFIG_FILE_NAME, TASKS_FILE_NAME, TASKWEAVE_DIR_NAME, TaskweaveConfig};
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the gitignore file within .taskweave
pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created .taskweave directory
    pub taskweave_dir: PathBuf,
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the created tasks file
    pub tasks_file: PathBuf,
}

/// Initialize a new taskweave repository in the given directory.
///
/// # Errors
///
/// Returns an error if:
/// - The `.taskweave/` directory already exists
/// - File system operations fail
pub async fn init(base_dir: &Path) -> Result<InitResult> {
    let taskweave_dir = base_dir.join(TASKWEAVE_DIR_NAME);

    if taskweave_dir.exists() {
        return Err(ConfigError::AlreadyInitialized(TASKWEAVE_DIR_NAME.to_string()).into());
    }

    fs::create_dir_all(&taskweave_dir).await?;

    let config_file = taskweave_dir.join(CONFIG_FILE_NAME);
    TaskweaveConfig::default().save(&config_file).await?;

    let tasks_file = taskweave_dir.join(TASKS_FILE_NAME);
    fs::write(&tasks_file, "").await?;

    let gitignore_content = "\
# Temporary files from atomic saves
*.tmp
";
    fs::write(taskweave_dir.join(GITIGNORE_FILE_NAME), gitignore_content).await?;

    tracing::debug!(dir = %taskweave_dir.display(), "Initialized taskweave repository");

    Ok(InitResult {
        taskweave_dir,
        config_file,
        tasks_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_layout() {
        let temp_dir = TempDir::new().unwrap();

        let result = init(temp_dir.path()).await.unwrap();

        assert!(result.taskweave_dir.is_dir());
        assert!(result.config_file.is_file());
        assert_eq!(std::fs::read_to_string(&result.tasks_file).unwrap(), "");
        assert!(result.taskweave_dir.join(GITIGNORE_FILE_NAME).is_file());

        let config = TaskweaveConfig::load(&result.config_file).await.unwrap();
        assert_eq!(config, TaskweaveConfig::default());
    }

    #[tokio::test]
    async fn test_init_twice_fails() {
        let temp_dir = TempDir::new().unwrap();
        init(temp_dir.path()).await.unwrap();

        let err = init(temp_dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("already initialized"));
    }
}
