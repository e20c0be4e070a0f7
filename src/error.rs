use std::io;
use std::path::PathBuf;
use thiserror::Error;

// Reasons the configuration file could not be used.  None of them stop the
// launch, the launcher falls back to the empty configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("Config root must be an object.")]
    NotAnObject,
}

// Failures that abort the launch.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Could not determine the launcher location: {0}")]
    CurrentExe(#[source] io::Error),
    #[error("Could not find main.py at {}", .0.display())]
    TargetMissing(PathBuf),
    #[error("Failed to execute {}: {source}", .program.display())]
    Exec {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}
