pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{Action, LogEntry, Role, Student, User};
pub use service::Roster;
