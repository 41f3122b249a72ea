use super::audit::AuditLog;
use super::gate::TeacherPermit;
use crate::error::{Error, Result};
use crate::model::{Action, Student};
use crate::storage::RecordStore;
use std::path::Path;

/// Student roster with token balances.
///
/// Each mutation checks the roster rules, applies the change in memory,
/// rewrites the student file, then appends one audit entry. A failed rewrite
/// restores the previous in-memory list before the error is returned.
#[derive(Debug)]
pub struct StudentDirectory {
    store: RecordStore<Student>,
    audit: AuditLog,
}

impl StudentDirectory {
    pub fn open(path: impl AsRef<Path>, audit: AuditLog) -> Result<Self> {
        Ok(Self {
            store: RecordStore::open(path)?,
            audit,
        })
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    pub fn list_all(&self) -> Vec<Student> {
        self.store.to_vec()
    }

    pub fn find_by_name(&self, first_name: &str, last_name: &str) -> Option<&Student> {
        self.store
            .records()
            .iter()
            .find(|s| s.is_named(first_name, last_name))
    }

    pub fn add(&mut self, permit: &TeacherPermit<'_>, student: Student) -> Result<()> {
        permit.check(Action::AddStudent)?;
        validate_name("first name", &student.first_name)?;
        validate_name("last name", &student.last_name)?;
        if self
            .find_by_name(&student.first_name, &student.last_name)
            .is_some()
        {
            return Err(Error::Conflict(format!(
                "Student already exists: {} {}",
                student.first_name, student.last_name
            )));
        }

        let details = format!(
            "Added student: {} {} with {} tokens",
            student.first_name, student.last_name, student.tokens
        );
        let snapshot = self.store.to_vec();
        self.store.records_mut().push(student);
        self.commit(snapshot)?;

        tracing::info!(%details, "student added");
        self.audit
            .append(Action::AddStudent.tag(), permit.actor(), Some(&details))
    }

    pub fn remove(
        &mut self,
        first_name: &str,
        last_name: &str,
        permit: &TeacherPermit<'_>,
    ) -> Result<()> {
        permit.check(Action::RemoveStudent)?;
        self.drop_student(first_name, last_name)?;

        let details = format!("Removed student: {} {}", first_name, last_name);
        tracing::info!(%details, "student removed");
        self.audit
            .append(Action::RemoveStudent.tag(), permit.actor(), Some(&details))
    }

    /// Same state change as [`remove`](Self::remove), logged as an expulsion
    pub fn expel(
        &mut self,
        permit: &TeacherPermit<'_>,
        first_name: &str,
        last_name: &str,
    ) -> Result<()> {
        permit.check(Action::ExpelStudent)?;
        self.drop_student(first_name, last_name)?;

        let details = format!("Expelled student: {} {}", first_name, last_name);
        tracing::info!(%details, "student expelled");
        self.audit
            .append(Action::ExpelStudent.tag(), permit.actor(), Some(&details))
    }

    /// Add `delta` (possibly negative) to a balance. Returns the new balance.
    pub fn adjust_tokens(
        &mut self,
        first_name: &str,
        last_name: &str,
        delta: i64,
        permit: &TeacherPermit<'_>,
    ) -> Result<i64> {
        permit.check(Action::UpdateTokens)?;
        let snapshot = self.store.to_vec();
        let student = self
            .store
            .records_mut()
            .iter_mut()
            .find(|s| s.is_named(first_name, last_name))
            .ok_or_else(|| not_found(first_name, last_name))?;

        let old_tokens = student.tokens;
        let new_tokens = old_tokens.checked_add(delta).ok_or_else(|| {
            Error::Validation(format!(
                "token adjustment {} overflows balance {}",
                delta, old_tokens
            ))
        })?;
        student.tokens = new_tokens;
        self.commit(snapshot)?;

        let details = format!(
            "Updated tokens for {} {}: {} -> {}",
            first_name, last_name, old_tokens, new_tokens
        );
        tracing::info!(%details, "tokens updated");
        self.audit
            .append(Action::UpdateTokens.tag(), permit.actor(), Some(&details))?;
        Ok(new_tokens)
    }

    fn drop_student(&mut self, first_name: &str, last_name: &str) -> Result<()> {
        if self.find_by_name(first_name, last_name).is_none() {
            return Err(not_found(first_name, last_name));
        }
        let snapshot = self.store.to_vec();
        self.store
            .records_mut()
            .retain(|s| !s.is_named(first_name, last_name));
        self.commit(snapshot)
    }

    /// Persist the current list, restoring `snapshot` if the write fails
    fn commit(&mut self, snapshot: Vec<Student>) -> Result<()> {
        if let Err(e) = self.store.persist() {
            tracing::error!(
                path = %self.store.path().display(),
                error = %e,
                "persist failed, rolling back in-memory change"
            );
            self.store.replace(snapshot);
            return Err(e);
        }
        Ok(())
    }
}

fn not_found(first_name: &str, last_name: &str) -> Error {
    Error::NotFound(format!("Student not found: {} {}", first_name, last_name))
}

/// Names land unescaped in the CSV file, so they cannot carry the delimiter
/// or a line break. The loader trims every field, so a name with leading or
/// trailing whitespace would not match itself after a reload and is rejected too.
fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} cannot be empty", field)));
    }
    if value != value.trim() {
        return Err(Error::Validation(format!(
            "{} cannot start or end with whitespace",
            field
        )));
    }
    if value.contains([',', '\r', '\n']) {
        return Err(Error::Validation(format!(
            "{} cannot contain commas or line breaks",
            field
        )));
    }
    Ok(())
}
