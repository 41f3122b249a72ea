use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

/// A student on the roster. Identified by the exact (first, last) name pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub first_name: String,
    pub last_name: String,
    pub tokens: i64,
}

impl Student {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, tokens: i64) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            tokens,
        }
    }

    pub fn is_named(&self, first_name: &str, last_name: &str) -> bool {
        self.first_name == first_name && self.last_name == last_name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "TEACHER",
            Role::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEACHER" => Ok(Role::Teacher),
            "STUDENT" => Ok(Role::Student),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// The person on whose behalf an operation runs. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl User {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, role: Role) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            role,
        }
    }

    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }
}

/// Audit action tags written by the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddStudent,
    RemoveStudent,
    UpdateTokens,
    ExpelStudent,
}

impl Action {
    pub fn tag(&self) -> &'static str {
        match self {
            Action::AddStudent => "ADD_STUDENT",
            Action::RemoveStudent => "REMOVE_STUDENT",
            Action::UpdateTokens => "UPDATE_TOKENS",
            Action::ExpelStudent => "EXPEL_STUDENT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One line of the audit log.
///
/// `action` is kept as the raw tag so entries written by other tools
/// survive a load/persist cycle untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub action: String,
    pub actor_first_name: String,
    pub actor_last_name: String,
    pub actor_role: Role,
    pub details: String,
}

impl LogEntry {
    pub fn is(&self, action: Action) -> bool {
        self.action == action.tag()
    }
}
