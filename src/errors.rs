//! src/errors.rs

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a hook installation.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("The directory '{}' is not a git repository", path.display())]
    NotARepository { path: PathBuf },

    #[error("Cannot find hook directory {}", path.display())]
    MissingHooksDir { path: PathBuf },

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HookError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        HookError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
