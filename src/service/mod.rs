mod audit;
mod directory;
pub mod gate;

pub use audit::AuditLog;
pub use directory::StudentDirectory;
pub use gate::TeacherPermit;

use crate::config::Config;
use crate::error::Result;
use crate::model::{Action, LogEntry, Student, User};

/// Caller-facing operations over the student roster and its audit log.
///
/// Mutations go through the teacher gate before they reach the directory.
#[derive(Debug)]
pub struct Roster {
    directory: StudentDirectory,
}

impl Roster {
    /// Open the audit log, then the student file that reports into it
    pub fn open(config: &Config) -> Result<Self> {
        tracing::debug!(
            students = %config.students_path.display(),
            log = %config.log_path.display(),
            "opening roster"
        );
        let audit = AuditLog::open(&config.log_path)?;
        let directory = StudentDirectory::open(&config.students_path, audit)?;
        Ok(Self { directory })
    }

    pub fn list_students(&self) -> Vec<Student> {
        self.directory.list_all()
    }

    pub fn find_student(&self, first_name: &str, last_name: &str) -> Option<Student> {
        self.directory.find_by_name(first_name, last_name).cloned()
    }

    pub fn add_student(&mut self, actor: &User, student: Student) -> Result<()> {
        let permit = TeacherPermit::require(actor, Action::AddStudent)?;
        self.directory.add(&permit, student)
    }

    pub fn remove_student(&mut self, first_name: &str, last_name: &str, actor: &User) -> Result<()> {
        let permit = TeacherPermit::require(actor, Action::RemoveStudent)?;
        self.directory.remove(first_name, last_name, &permit)
    }

    pub fn expel_student(&mut self, actor: &User, first_name: &str, last_name: &str) -> Result<()> {
        let permit = TeacherPermit::require(actor, Action::ExpelStudent)?;
        self.directory.expel(&permit, first_name, last_name)
    }

    pub fn adjust_tokens(
        &mut self,
        first_name: &str,
        last_name: &str,
        delta: i64,
        actor: &User,
    ) -> Result<i64> {
        let permit = TeacherPermit::require(actor, Action::UpdateTokens)?;
        self.directory
            .adjust_tokens(first_name, last_name, delta, &permit)
    }

    pub fn list_audit_log(&self) -> Vec<LogEntry> {
        self.directory.audit_log().list_all()
    }
}
