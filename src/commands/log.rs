use crate::error::Result;
use crate::model::LogEntry;
use crate::service::Roster;
use crate::storage::TIMESTAMP_FORMAT;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};

/// Render audit entries oldest first
pub fn log_table(entries: &[LogEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["TIME", "ACTION", "USER", "ROLE", "DETAILS"]);
    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            entry.action.clone(),
            format!("{} {}", entry.actor_first_name, entry.actor_last_name),
            entry.actor_role.to_string(),
            entry.details.clone(),
        ]);
    }
    table
}

/// The last `limit` entries, or all of them
pub fn tail(entries: &[LogEntry], limit: Option<usize>) -> &[LogEntry] {
    match limit {
        Some(n) => &entries[entries.len().saturating_sub(n)..],
        None => entries,
    }
}

pub fn run(roster: &Roster, limit: Option<usize>) -> Result<()> {
    let entries = roster.list_audit_log();
    if entries.is_empty() {
        println!("Audit log is empty");
        return Ok(());
    }
    println!("{}", log_table(tail(&entries, limit)));
    Ok(())
}
