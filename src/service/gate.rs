//! Role check for roster mutations.
//!
//! Every mutating [`StudentDirectory`](super::StudentDirectory) method takes a
//! [`TeacherPermit`]. A permit can only be minted here, and only for a
//! TEACHER acting on one specific action, so a rejected caller never reaches
//! the code that touches the student list or the audit log.

use crate::error::{Error, Result};
use crate::model::{Action, User};

/// Proof that `actor` is a teacher allowed to perform `action`
#[derive(Debug)]
pub struct TeacherPermit<'a> {
    actor: &'a User,
    action: Action,
}

impl<'a> TeacherPermit<'a> {
    pub fn require(actor: &'a User, action: Action) -> Result<Self> {
        if !actor.is_teacher() {
            tracing::warn!(
                first_name = %actor.first_name,
                last_name = %actor.last_name,
                role = %actor.role,
                action = action.tag(),
                "authorization denied"
            );
            return Err(Error::Authorization(format!(
                "Only teachers can {}",
                describe(action)
            )));
        }
        Ok(Self { actor, action })
    }

    pub fn actor(&self) -> &User {
        self.actor
    }

    /// Reject a permit minted for a different action
    pub(crate) fn check(&self, action: Action) -> Result<()> {
        if self.action != action {
            return Err(Error::Authorization(format!(
                "Permit for {} cannot be used to {}",
                self.action,
                describe(action)
            )));
        }
        Ok(())
    }
}

fn describe(action: Action) -> &'static str {
    match action {
        Action::AddStudent => "add students",
        Action::RemoveStudent => "remove students",
        Action::ExpelStudent => "expel students",
        Action::UpdateTokens => "update tokens",
    }
}
