use crate::cli::Cli;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

pub const STUDENTS_FILE_ENV: &str = "TOKENBOOK_STUDENTS_FILE";
pub const LOG_FILE_ENV: &str = "TOKENBOOK_LOG_FILE";

/// Locations of the two data files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub students_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    pub fn new(students_path: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Result<Self> {
        let config = Config {
            students_path: students_path.into(),
            log_path: log_path.into(),
        };
        require_path(&config.students_path, "students file", STUDENTS_FILE_ENV)?;
        require_path(&config.log_path, "log file", LOG_FILE_ENV)?;
        Ok(config)
    }

    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let students = cli
            .students_file
            .clone()
            .ok_or_else(|| missing("students file", STUDENTS_FILE_ENV))?;
        let log = cli
            .log_file
            .clone()
            .ok_or_else(|| missing("log file", LOG_FILE_ENV))?;
        Config::new(students, log)
    }
}

fn require_path(path: &Path, what: &str, env: &str) -> Result<()> {
    if path.to_string_lossy().trim().is_empty() {
        return Err(missing(what, env));
    }
    Ok(())
}

fn missing(what: &str, env: &str) -> Error {
    Error::Configuration(format!(
        "{} path is not set (use --{} or {})",
        what,
        what.replace(' ', "-"),
        env
    ))
}
