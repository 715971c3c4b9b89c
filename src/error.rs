//! Fatal error conditions and their process exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Every way a run can abort. Each variant maps to a distinguished nonzero
/// exit code so scripts wrapping the tool can tell the failures apart.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to query the package database: {0}")]
    DbInit(String),

    #[error("repository '{0}' failed to register (no usable sync database)")]
    RepoRegister(String),

    #[error("failed to read terminal event: {0}")]
    EventSource(std::io::Error),

    #[error(
        "There are currently no packages to upgrade. Try `sudo pacman -Sy` or removing packages from the keep list."
    )]
    NoCandidates,

    #[error("failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to access config directory {path}: {source}")]
    ConfigDirAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config path {0} is not a directory")]
    ConfigDirNotDir(PathBuf),

    #[error("failed to open keep list {path}: {source}")]
    KeepFileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("terminal failure: {0}")]
    Terminal(std::io::Error),
}

impl Error {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::RepoRegister(_) => 1,
            Self::DbInit(_) => 10,
            Self::EventSource(_) => 15,
            Self::NoCandidates => 20,
            Self::ConfigDirCreate { .. } => 30,
            Self::ConfigDirAccess { .. } => 31,
            Self::ConfigDirNotDir(_) => 32,
            Self::KeepFileOpen { .. } => 35,
            Self::Terminal(_) => 100,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
