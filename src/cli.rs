use crate::config::{LOG_FILE_ENV, STUDENTS_FILE_ENV};
use crate::logging::LogFormat;
use crate::model::{Role, User};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tokenbook")]
#[command(about = "Student token ledger with a teacher-only audit trail")]
#[command(version)]
pub struct Cli {
    /// Interactive session when omitted
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Student roster CSV file
    #[arg(long, global = true, env = STUDENTS_FILE_ENV)]
    pub students_file: Option<PathBuf>,

    /// Audit log CSV file
    #[arg(long, global = true, env = LOG_FILE_ENV)]
    pub log_file: Option<PathBuf>,

    /// First name of the acting user
    #[arg(id = "actor_first_name", long = "first-name", global = true, env = "TOKENBOOK_FIRST_NAME")]
    pub first_name: Option<String>,

    /// Last name of the acting user
    #[arg(id = "actor_last_name", long = "last-name", global = true, env = "TOKENBOOK_LAST_NAME")]
    pub last_name: Option<String>,

    /// Role of the acting user
    #[arg(long, global = true, value_enum, ignore_case = true, env = "TOKENBOOK_ROLE")]
    pub role: Option<RoleArg>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn", env = "TOKENBOOK_LOG_LEVEL")]
    pub log_level: String,

    /// Diagnostic log format
    #[arg(long, global = true, value_enum, default_value = "pretty", env = "TOKENBOOK_LOG_FORMAT")]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show every student and their token balance
    List,

    /// Look up a single student
    Find {
        first_name: String,
        last_name: String,
    },

    /// Add a student to the roster (teachers only)
    Add {
        first_name: String,
        last_name: String,

        /// Starting balance
        #[arg(long, short = 't', default_value = "0", allow_negative_numbers = true)]
        tokens: i64,
    },

    /// Remove a student from the roster (teachers only)
    Remove {
        first_name: String,
        last_name: String,
    },

    /// Expel a student; recorded separately from a removal (teachers only)
    Expel {
        first_name: String,
        last_name: String,
    },

    /// Add or subtract tokens (teachers only)
    Adjust {
        first_name: String,
        last_name: String,

        /// Amount to add; negative to subtract
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Show the audit log
    Log {
        /// Only the most recent N entries
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Interactive menu session
    Shell,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleArg {
    Teacher,
    Student,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Teacher => Role::Teacher,
            RoleArg::Student => Role::Student,
        }
    }
}

impl Command {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Add { .. }
                | Command::Remove { .. }
                | Command::Expel { .. }
                | Command::Adjust { .. }
        )
    }
}

impl Cli {
    /// Actor from flags/env, if all three parts were given
    pub fn actor(&self) -> Option<User> {
        match (&self.first_name, &self.last_name, self.role) {
            (Some(first), Some(last), Some(role)) => {
                Some(User::new(first.trim(), last.trim(), role.into()))
            }
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        // Mutations are recorded against a named user
        if let Some(command) = &self.command
            && command.is_mutation()
            && self.actor().is_none()
        {
            return Err(
                "--first-name, --last-name and --role are required for this command".to_string(),
            );
        }

        for name in [&self.first_name, &self.last_name].into_iter().flatten() {
            if name.trim().is_empty() {
                return Err("Actor names cannot be empty".to_string());
            }
        }

        if let Some(Command::Log { limit: Some(0) }) = self.command {
            return Err("--limit must be at least 1".to_string());
        }

        Ok(())
    }
}
