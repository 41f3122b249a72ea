use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error on {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Authorization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Storage {
            path: path.into(),
            source,
        }
    }

    /// True for errors the caller is expected to show and move on from
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Conflict(_) | Error::NotFound(_) | Error::Authorization(_)
        )
    }
}

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_ARGUMENTS: i32 = 2;
    pub const CONFIGURATION_ERROR: i32 = 3;
    pub const STORAGE_ERROR: i32 = 4;
    pub const NOT_FOUND: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const PERMISSION_DENIED: i32 = 7;
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Configuration(_) => exit_code::CONFIGURATION_ERROR,
            Error::Storage { .. } => exit_code::STORAGE_ERROR,
            Error::Validation(_) => exit_code::INVALID_ARGUMENTS,
            Error::Conflict(_) => exit_code::CONFLICT,
            Error::NotFound(_) => exit_code::NOT_FOUND,
            Error::Authorization(_) => exit_code::PERMISSION_DENIED,
        }
    }
}
