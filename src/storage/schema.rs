use crate::model::{LogEntry, Role, Student};
use chrono::NaiveDateTime;

pub const DELIMITER: char = ',';

pub const STUDENT_HEADER: &str = "firstName,lastName,tokens";

pub const LOG_HEADER: &str = "timestamp,action,userFirstName,userLastName,userRole,details";

/// Second-precision timestamp format used in the audit file
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A fixed-shape row in a delimited text file.
///
/// Lines are split into at most `FIELD_COUNT` parts, so the last field
/// may itself contain the delimiter.
pub trait Record: Sized {
    const HEADER: &'static str;
    const FIELD_COUNT: usize;

    /// Build a record from trimmed fields. `fields.len() == FIELD_COUNT`.
    fn from_fields(fields: &[&str]) -> Result<Self, String>;

    fn to_fields(&self) -> Vec<String>;
}

impl Record for Student {
    const HEADER: &'static str = STUDENT_HEADER;
    const FIELD_COUNT: usize = 3;

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        let tokens = fields[2]
            .parse::<i64>()
            .map_err(|e| format!("invalid token count '{}': {}", fields[2], e))?;
        Ok(Student::new(fields[0], fields[1], tokens))
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.tokens.to_string(),
        ]
    }
}

impl Record for LogEntry {
    const HEADER: &'static str = LOG_HEADER;
    const FIELD_COUNT: usize = 6;

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        let timestamp = NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT)
            .map_err(|e| format!("invalid timestamp '{}': {}", fields[0], e))?;
        let actor_role = fields[4].parse::<Role>()?;
        Ok(LogEntry {
            timestamp,
            action: fields[1].to_string(),
            actor_first_name: fields[2].to_string(),
            actor_last_name: fields[3].to_string(),
            actor_role,
            details: fields[5].to_string(),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.action.clone(),
            self.actor_first_name.clone(),
            self.actor_last_name.clone(),
            self.actor_role.to_string(),
            self.details.clone(),
        ]
    }
}

/// Split and trim one data line. Fails when the line has too few fields.
pub fn parse_line<R: Record>(line: &str) -> Result<R, String> {
    let fields: Vec<&str> = line
        .splitn(R::FIELD_COUNT, DELIMITER)
        .map(str::trim)
        .collect();
    if fields.len() < R::FIELD_COUNT {
        return Err(format!(
            "expected {} fields, found {}",
            R::FIELD_COUNT,
            fields.len()
        ));
    }
    R::from_fields(&fields)
}

pub fn format_line<R: Record>(record: &R) -> String {
    record.to_fields().join(&DELIMITER.to_string())
}
