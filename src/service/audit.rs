use crate::error::{Error, Result};
use crate::model::{LogEntry, User};
use crate::storage::RecordStore;
use chrono::{Local, SubsecRound};
use std::path::Path;

/// Append-only audit trail backed by a CSV record store
#[derive(Debug)]
pub struct AuditLog {
    store: RecordStore<LogEntry>,
}

impl AuditLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            store: RecordStore::open(path)?,
        })
    }

    /// Record one action and write the log to disk before returning.
    ///
    /// If the write fails the entry is dropped from memory as well, so the
    /// in-memory log never runs ahead of the file.
    pub fn append(&mut self, action: &str, actor: &User, details: Option<&str>) -> Result<()> {
        if action.trim().is_empty() {
            return Err(Error::Validation("audit action cannot be empty".to_string()));
        }

        let entry = LogEntry {
            timestamp: Local::now().naive_local().trunc_subsecs(0),
            action: action.to_string(),
            actor_first_name: actor.first_name.clone(),
            actor_last_name: actor.last_name.clone(),
            actor_role: actor.role,
            details: details.unwrap_or_default().to_string(),
        };

        self.store.records_mut().push(entry);
        if let Err(e) = self.store.persist() {
            self.store.records_mut().pop();
            return Err(e);
        }
        tracing::debug!(action, "audit entry appended");
        Ok(())
    }

    pub fn list_all(&self) -> Vec<LogEntry> {
        self.store.to_vec()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
