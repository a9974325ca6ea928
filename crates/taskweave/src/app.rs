//! Application context for CLI command execution.
//!
//! This module provides the `App` struct that owns the storage for the
//! duration of one command.
//!
//! # Example
//!
//! ```no_run
//! use taskweave::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     // Execute commands using app...
//!     Ok(())
//! }
//! ```

use crate::config::{CONFIG_FILE_NAME, TASKWEAVE_DIR_NAME, TaskweaveConfig, find_root};
use crate::error::{ConfigError, Result};
use crate::storage::{TaskStorage, create_storage};
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
///
/// Storage is loaded from the taskweave directory on creation and held
/// exclusively, so graph operations run one at a time against it.
pub struct App {
    storage: Box<dyn TaskStorage>,

    /// Path to the taskweave directory (.taskweave)
    taskweave_dir: PathBuf,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("taskweave_dir", &self.taskweave_dir)
            .field("storage", &"<dyn TaskStorage>")
            .finish()
    }
}

impl App {
    /// Create an App instance from the given working directory.
    ///
    /// Searches up the directory tree to find a `.taskweave/` directory,
    /// loads configuration, and initializes storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No taskweave repository is found in the directory tree
    /// - Configuration cannot be loaded
    /// - Storage initialization fails
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_root(working_dir).ok_or(ConfigError::NotInitialized)?;

        let taskweave_dir = root_dir.join(TASKWEAVE_DIR_NAME);
        let config = TaskweaveConfig::load(&taskweave_dir.join(CONFIG_FILE_NAME)).await?;

        let backend = config.storage.to_backend(&root_dir)?;
        tracing::debug!(data_file = ?backend.data_path(), "Opening storage");
        let storage = create_storage(backend).await?;

        Ok(Self {
            storage,
            taskweave_dir,
        })
    }

    /// Get a mutable reference to the storage.
    pub fn storage_mut(&mut self) -> &mut dyn TaskStorage {
        self.storage.as_mut()
    }

    /// Get an immutable reference to the storage.
    pub fn storage(&self) -> &dyn TaskStorage {
        self.storage.as_ref()
    }

    /// Get the path to the taskweave directory.
    pub fn taskweave_dir(&self) -> &Path {
        &self.taskweave_dir
    }

    /// Save storage state to persistent storage.
    ///
    /// This should be called after any mutating operations.
    pub async fn save(&self) -> Result<()> {
        self.storage.save().await
    }
}
