//! File-backed memory store with bounded recall.

use crate::error::MemoryError;
use crate::record::MemoryRecord;
use chrono::Utc;
use log::{debug, info};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Filename prefix for persisted memory files.
const FILE_PREFIX: &str = "memory-";
/// Filename suffix for persisted memory files.
const FILE_SUFFIX: &str = ".jsonl";

/// Ordered, append-only sequence of conversation records.
///
/// Records are kept in insertion order; persisted files carry one JSON
/// object per line so that a session can be reloaded verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    records: Vec<MemoryRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the most recent memory file from a directory.
    ///
    /// File names embed a sortable UTC timestamp, so "most recent" is the
    /// lexicographically greatest matching name. A directory with no
    /// matching files yields an empty store; a missing directory is an
    /// error so that a misconfigured path is caught at startup.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(MemoryError::MissingDir(dir.to_path_buf()));
        }

        let mut latest: Option<String> = None;
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(FILE_PREFIX) || !name.ends_with(FILE_SUFFIX) {
                continue;
            }
            if latest.as_deref().is_none_or(|current| name.as_str() > current) {
                latest = Some(name);
            }
        }

        let Some(name) = latest else {
            debug!("no memory files in {}, starting empty", dir.display());
            return Ok(Self::new());
        };
        let store = Self::load_file(dir.join(&name))?;
        info!("loaded {} memory records from {name}", store.len());
        Ok(store)
    }

    /// Load records from a single memory file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let file = OpenOptions::new().read(true).open(path.as_ref())?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: MemoryRecord = serde_json::from_str(&line)?;
            records.push(record);
        }
        Ok(Self { records })
    }

    /// Format the last `window` records for prompt context.
    ///
    /// Each line is newline-prefixed and the window is returned in
    /// chronological order. An empty store yields an empty string.
    pub fn recall(&self, window: usize) -> String {
        let start = self.records.len().saturating_sub(window);
        let mut context = String::new();
        for record in &self.records[start..] {
            context.push('\n');
            context.push_str(&record.render());
        }
        context
    }

    /// Append records to the end of the store, preserving input order.
    pub fn memorize(&mut self, records: impl IntoIterator<Item = MemoryRecord>) {
        self.records.extend(records);
    }

    /// Write the full store to a new uniquely named file in `dir`.
    ///
    /// Existing files are never overwritten: a same-second collision bumps
    /// a numeric suffix until a fresh name is found. Returns the path of
    /// the file that was written.
    pub fn persist(&self, dir: impl AsRef<Path>) -> Result<PathBuf, MemoryError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(MemoryError::MissingDir(dir.to_path_buf()));
        }

        let stamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                format!("{FILE_PREFIX}{stamp}{FILE_SUFFIX}")
            } else {
                format!("{FILE_PREFIX}{stamp}_{attempt}{FILE_SUFFIX}")
            };
            let path = dir.join(&name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    for record in &self.records {
                        let line = serde_json::to_string(record)?;
                        writeln!(file, "{line}")?;
                    }
                    info!("persisted {} memory records to {name}", self.len());
                    return Ok(path);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    attempt += 1;
                }
                Err(err) => return Err(MemoryError::Io(err)),
            }
        }
    }

    /// Records currently held by the store.
    pub fn records(&self) -> &[MemoryRecord] {
        &self.records
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::error::MemoryError;
    use crate::record::MemoryRecord;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn record(secs: u32, author: &str, message: &str) -> MemoryRecord {
        let timestamp = Utc.with_ymd_and_hms(2024, 5, 20, 12, 30, secs).unwrap();
        MemoryRecord::new(timestamp, author, message)
    }

    #[test]
    fn load_missing_directory_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("nope");
        let err = MemoryStore::load(&missing).expect_err("missing dir");
        assert!(matches!(err, MemoryError::MissingDir(path) if path == missing));
    }

    #[test]
    fn load_empty_directory_yields_empty_store() {
        let temp = tempdir().expect("tempdir");
        let store = MemoryStore::load(temp.path()).expect("load");
        assert!(store.is_empty());
        assert_eq!(store.recall(5), "");
    }

    #[test]
    fn load_picks_lexicographically_greatest_file() {
        let temp = tempdir().expect("tempdir");
        let older = MemoryStore {
            records: vec![record(1, "Alice", "old session")],
        };
        let newer = MemoryStore {
            records: vec![record(2, "Alice", "new session")],
        };
        std::fs::write(
            temp.path().join("memory-20240101T000000Z.jsonl"),
            serde_json::to_string(&older.records[0]).unwrap() + "\n",
        )
        .expect("write older");
        std::fs::write(
            temp.path().join("memory-20240601T000000Z.jsonl"),
            serde_json::to_string(&newer.records[0]).unwrap() + "\n",
        )
        .expect("write newer");

        let store = MemoryStore::load(temp.path()).expect("load");
        assert_eq!(store, newer);
    }

    #[test]
    fn load_ignores_unrelated_files() {
        let temp = tempdir().expect("tempdir");
        std::fs::write(temp.path().join("notes.txt"), "not a memory file").expect("write");
        let store = MemoryStore::load(temp.path()).expect("load");
        assert!(store.is_empty());
    }

    #[test]
    fn recall_returns_bounded_window_in_order() {
        let mut store = MemoryStore::new();
        store.memorize([
            record(1, "Alice", "first"),
            record(2, "Bot", "second"),
            record(3, "Alice", "third"),
        ]);

        let context = store.recall(2);
        let lines: Vec<&str> = context.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Bot said second"));
        assert!(lines[1].ends_with("Alice said third"));
    }

    #[test]
    fn recall_window_larger_than_store_returns_everything() {
        let mut store = MemoryStore::new();
        store.memorize([record(1, "Alice", "only")]);
        let context = store.recall(10);
        assert_eq!(
            context,
            "\n[20.05.2024 12:30] Alice said only".to_string()
        );
    }

    #[test]
    fn recall_single_record_formatting() {
        let mut store = MemoryStore::new();
        store.memorize([record(1, "Alice", "hi"), record(2, "Bot", "hello")]);
        assert_eq!(store.recall(1), "\n[20.05.2024 12:30] Bot said hello");
    }

    #[test]
    fn recall_does_not_mutate_the_store() {
        let mut store = MemoryStore::new();
        store.memorize([record(1, "Alice", "hi")]);
        let before = store.clone();
        let _ = store.recall(5);
        assert_eq!(store, before);
    }

    #[test]
    fn memorize_appends_in_input_order() {
        let mut store = MemoryStore::new();
        let user = record(1, "Alice", "question");
        let bot = record(2, "Bot", "answer");
        store.memorize([user.clone(), bot.clone()]);

        let context = store.recall(2);
        let lines: Vec<&str> = context.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines[0], user.render());
        assert_eq!(lines[1], bot.render());
    }

    #[test]
    fn persist_then_load_round_trips_records() {
        let temp = tempdir().expect("tempdir");
        let mut store = MemoryStore::new();
        let timestamp = Utc
            .timestamp_opt(1_716_208_245, 123_456_789)
            .single()
            .expect("timestamp");
        store.memorize([
            MemoryRecord::new(timestamp, "Alice", "sub-second precision"),
            record(2, "Bot", "answer"),
        ]);

        let path = store.persist(temp.path()).expect("persist");
        let reloaded = MemoryStore::load_file(&path).expect("reload");
        assert_eq!(reloaded, store);
    }

    #[test]
    fn persist_never_overwrites_existing_files() {
        let temp = tempdir().expect("tempdir");
        let mut store = MemoryStore::new();
        store.memorize([record(1, "Alice", "hi")]);

        let first = store.persist(temp.path()).expect("first persist");
        let second = store.persist(temp.path()).expect("second persist");
        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
    }

    #[test]
    fn persist_into_missing_directory_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("gone");
        let store = MemoryStore::new();
        let err = store.persist(&missing).expect_err("missing dir");
        assert!(matches!(err, MemoryError::MissingDir(_)));
    }
}
