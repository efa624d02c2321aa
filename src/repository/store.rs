//! Durable store and snapshot format.
//!
//! # Snapshot schema
//!
//! | Version | Shape |
//! |---------|-------|
//! | 0 | bare JSON array of assignments, `origin` may be missing |
//! | 1 | `{"version":1,"assignments":[...]}` |
//!
//! Version 0 is migrated on decode: entries without an `origin` are tagged
//! derived when their id carries the derived prefix, manual otherwise.
//! Snapshots newer than [`SNAPSHOT_VERSION`] are refused rather than
//! overwritten.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::DERIVED_ID_PREFIX;
use crate::error::StorageError;
use crate::models::Assignment;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A string-keyed durable store.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` if the key was never written.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process store, mainly for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a key.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Raw stored value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File for `key`. Bytes outside `[A-Za-z0-9.-]` are written as `%XX`,
    /// so distinct keys never share a file.
    fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-') {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("%{byte:02X}"));
            }
        }
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = value.len(), "Wrote snapshot file");
        Ok(())
    }
}

/// Versioned repository snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub assignments: Vec<Assignment>,
}

impl Snapshot {
    /// Wraps assignments in a current-version snapshot.
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            assignments,
        }
    }

    /// Serializes to JSON.
    pub fn encode(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses any supported snapshot version, migrating to the current one.
    pub fn decode(raw: &str) -> Result<Self, StorageError> {
        match serde_json::from_str::<Value>(raw)? {
            Value::Array(entries) => {
                debug!(entries = entries.len(), "Migrating version 0 snapshot");
                let assignments = entries
                    .into_iter()
                    .map(migrate_v0_entry)
                    .map(serde_json::from_value)
                    .collect::<Result<Vec<Assignment>, _>>()?;
                Ok(Self::new(assignments))
            }
            value => {
                let found = value
                    .get("version")
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                if found > u64::from(SNAPSHOT_VERSION) {
                    return Err(StorageError::UnsupportedVersion {
                        found: u32::try_from(found).unwrap_or(u32::MAX),
                        supported: SNAPSHOT_VERSION,
                    });
                }
                let mut snapshot: Snapshot = serde_json::from_value(value)?;
                snapshot.version = SNAPSHOT_VERSION;
                Ok(snapshot)
            }
        }
    }
}

fn migrate_v0_entry(mut entry: Value) -> Value {
    if let Value::Object(fields) = &mut entry {
        if !fields.contains_key("origin") {
            let derived = fields
                .get("id")
                .and_then(Value::as_str)
                .is_some_and(|id| id.starts_with(DERIVED_ID_PREFIX));
            let origin = if derived { "derived" } else { "manual" };
            fields.insert("origin".to_string(), Value::from(origin));
        }
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssignmentOrigin;
    use chrono::{NaiveDate, NaiveTime};

    fn sample(id: &str, origin: AssignmentOrigin) -> Assignment {
        let day = NaiveDate::from_ymd_opt(2023, 7, 3).unwrap();
        Assignment {
            id: id.into(),
            project_id: "p1".into(),
            employee_id: "e1".into(),
            start_date: day,
            end_date: day,
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            title: Some("Roof".into()),
            description: None,
            status: None,
            priority: None,
            color: "#10b981".into(),
            origin,
        }
    }

    #[test]
    fn test_snapshot_round_trip() {
        let snapshot = Snapshot::new(vec![
            sample("manual-1", AssignmentOrigin::Manual),
            sample("plan-7", AssignmentOrigin::Derived),
        ]);
        let raw = snapshot.encode().unwrap();
        assert!(raw.starts_with("{\"version\":1,"));
        assert_eq!(Snapshot::decode(&raw).unwrap(), snapshot);
    }

    #[test]
    fn test_legacy_array_migrates() {
        let raw = r##"[
            {"id":"plan-7","projectId":"p1","employeeId":"e1","startDate":"2023-07-03",
             "endDate":"2023-07-03","startTime":"08:00","endTime":"17:00","color":"#10b981"},
            {"id":"1688371200000","projectId":"p2","employeeId":"unassigned","startDate":"2023-07-04",
             "endDate":"2023-07-05","startTime":"08:00:00","endTime":"12:00:00","color":"#ef4444"}
        ]"##;
        let snapshot = Snapshot::decode(raw).unwrap();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.assignments.len(), 2);
        assert_eq!(snapshot.assignments[0].origin, AssignmentOrigin::Derived);
        assert_eq!(snapshot.assignments[1].origin, AssignmentOrigin::Manual);
        assert_eq!(
            snapshot.assignments[1].end_time,
            NaiveTime::from_hms_opt(12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_newer_version_refused() {
        let err = Snapshot::decode(r#"{"version":2,"assignments":[]}"#).unwrap_err();
        assert!(matches!(
            err,
            StorageError::UnsupportedVersion { found: 2, supported: 1 }
        ));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(matches!(
            Snapshot::decode("not json"),
            Err(StorageError::Serialize(_))
        ));
        assert!(Snapshot::decode(r#"{"assignments":[]}"#).is_err());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load("k").unwrap(), None);
        store.save("k", "v").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.get("k"), Some("v"));
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.load("user/42:timeline").unwrap(), None);

        store.save("user/42:timeline", "[]").unwrap();
        store.save("user/42:timeline", "{}").unwrap();
        assert_eq!(store.load("user/42:timeline").unwrap().as_deref(), Some("{}"));
        assert!(store.dir().join("user%2F42%3Atimeline.json").exists());
        assert!(!store.dir().join("user%2F42%3Atimeline.json.tmp").exists());
    }

    #[test]
    fn test_file_store_keys_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let keys = ["tenant/a", "tenant:a", "tenant_a", "tenant%2Fa", "tenant a"];
        for key in keys {
            store.save(key, &format!("data of {key}")).unwrap();
        }
        for key in keys {
            assert_eq!(
                store.load(key).unwrap(),
                Some(format!("data of {key}")),
                "key {key}"
            );
        }
        assert_eq!(store.load("tenant-a").unwrap(), None);
    }
}
