use super::schema::{self, Record};
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// In-memory list of records mirrored to a delimited text file.
///
/// The list is the source of truth between loads. Every `persist` rewrites
/// the whole file: header first, then one line per record in list order.
#[derive(Debug)]
pub struct RecordStore<R: Record> {
    path: PathBuf,
    records: Vec<R>,
}

impl<R: Record> RecordStore<R> {
    /// Open a store, creating the file with just a header if it is missing
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() || path.to_string_lossy().trim().is_empty() {
            return Err(Error::Configuration(format!(
                "file path for '{}' records cannot be empty",
                R::HEADER
            )));
        }
        let path = path.to_path_buf();

        if !path.exists() {
            tracing::info!(path = %path.display(), "creating data file");
            write_file::<R>(&path, &[])?;
        }

        let records = load::<R>(&path)?;
        tracing::debug!(
            path = %path.display(),
            count = records.len(),
            "loaded records"
        );
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut Vec<R> {
        &mut self.records
    }

    /// Swap in a whole list, e.g. to restore a snapshot
    pub fn replace(&mut self, records: Vec<R>) {
        self.records = records;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rewrite the backing file from the in-memory list
    pub fn persist(&self) -> Result<()> {
        tracing::debug!(
            path = %self.path.display(),
            count = self.records.len(),
            "persisting records"
        );
        write_file(&self.path, &self.records)
    }
}

impl<R: Record + Clone> RecordStore<R> {
    /// Snapshot of the list in insertion order
    pub fn to_vec(&self) -> Vec<R> {
        self.records.clone()
    }
}

fn load<R: Record>(path: &Path) -> Result<Vec<R>> {
    let file = File::open(path).map_err(|e| Error::storage(path, e))?;
    let mut lines = BufReader::new(file).split(b'\n');

    let header = match lines.next() {
        Some(line) => decode_line(line.map_err(|e| Error::storage(path, e))?),
        None => return Ok(Vec::new()),
    };
    if header.as_deref() != Ok(R::HEADER) {
        tracing::warn!(
            path = %path.display(),
            expected = R::HEADER,
            found = ?header,
            "header mismatch, treating file as empty"
        );
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    // Line 1 is the header
    for (idx, line) in lines.enumerate() {
        let line = line.map_err(|e| Error::storage(path, e))?;
        let parsed = decode_line(line).and_then(|line| {
            if line.trim().is_empty() {
                Ok(None)
            } else {
                schema::parse_line::<R>(&line).map(Some)
            }
        });
        match parsed {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(reason) => tracing::warn!(
                path = %path.display(),
                line = idx + 2,
                %reason,
                "skipping malformed record"
            ),
        }
    }
    Ok(records)
}

/// Strip a trailing `\r` and decode one raw line
fn decode_line(mut raw: Vec<u8>) -> std::result::Result<String, String> {
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    String::from_utf8(raw).map_err(|e| format!("line is not valid UTF-8: {}", e))
}

fn write_file<R: Record>(path: &Path, records: &[R]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::storage(parent, e))?;
    }

    let file = File::create(path).map_err(|e| Error::storage(path, e))?;
    write_records(BufWriter::new(file), records).map_err(|e| Error::storage(path, e))
}

fn write_records<R: Record, W: Write>(mut writer: W, records: &[R]) -> std::io::Result<()> {
    writeln!(writer, "{}", R::HEADER)?;
    for record in records {
        writeln!(writer, "{}", schema::format_line(record))?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LogEntry, Role, Student};
    use chrono::NaiveDate;

    #[test]
    fn test_open_creates_file_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/students.csv");

        let store = RecordStore::<Student>::open(&path).unwrap();
        assert!(store.is_empty());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "firstName,lastName,tokens\n"
        );
    }

    #[test]
    fn test_empty_path_is_configuration_error() {
        let err = RecordStore::<Student>::open("").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        let err = RecordStore::<Student>::open("   ").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_header_mismatch_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        fs::write(&path, "first,last,tokens\nAlice,Smith,3\n").unwrap();

        let store = RecordStore::<Student>::open(&path).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        fs::write(&path, "").unwrap();

        let store = RecordStore::<Student>::open(&path).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        fs::write(
            &path,
            "firstName,lastName,tokens\nAlice,Smith,3\nBroken,Line,abc\n\nTooFew\nBob,Lee,-2\n",
        )
        .unwrap();

        let store = RecordStore::<Student>::open(&path).unwrap();
        assert_eq!(
            store.records(),
            &[Student::new("Alice", "Smith", 3), Student::new("Bob", "Lee", -2)]
        );
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        fs::write(
            &path,
            b"firstName,lastName,tokens\r\nAlice,Smith,3\r\nBo\xffb,Lee,1\nEve,Stone,2\n",
        )
        .unwrap();

        let store = RecordStore::<Student>::open(&path).unwrap();
        assert_eq!(
            store.records(),
            &[Student::new("Alice", "Smith", 3), Student::new("Eve", "Stone", 2)]
        );
    }

    #[test]
    fn test_persist_then_reopen_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let ts = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();

        let mut store = RecordStore::<LogEntry>::open(&path).unwrap();
        store.records_mut().push(LogEntry {
            timestamp: ts,
            action: "UPDATE_TOKENS".to_string(),
            actor_first_name: "John".to_string(),
            actor_last_name: "Doe".to_string(),
            actor_role: Role::Teacher,
            details: "Updated tokens for Bob Lee: 10 -> 15".to_string(),
        });
        store.records_mut().push(LogEntry {
            timestamp: ts,
            action: "CUSTOM_TAG".to_string(),
            actor_first_name: "Jane".to_string(),
            actor_last_name: "Roe".to_string(),
            actor_role: Role::Student,
            details: String::new(),
        });
        store.persist().unwrap();

        let reopened = RecordStore::<LogEntry>::open(&path).unwrap();
        assert_eq!(reopened.records(), store.records());
    }

    #[test]
    fn test_replace_swaps_list_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        let mut store = RecordStore::<Student>::open(&path).unwrap();
        assert_eq!(store.path(), path.as_path());

        store.replace(vec![Student::new("Bob", "Lee", 1)]);
        assert_eq!(store.records(), &[Student::new("Bob", "Lee", 1)]);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "firstName,lastName,tokens\n"
        );
    }

    #[test]
    fn test_persist_to_unwritable_path_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        let store = RecordStore::<Student>::open(&path).unwrap();

        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let err = store.persist().unwrap_err();
        assert!(matches!(err, Error::Storage { .. }));
    }
}
