// selective-restore/src/backup/mod.rs
//! Read-only view of a backup as seen by the restore filter.
//!
//! How the metadata is produced and stored is up to the caller; this module only
//! defines the shapes the filter consumes and the [`Backup`] handle it asks for them.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::errors::Result;

/// One database known to the backup. `oid` is the directory name its files live under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRecord {
    pub name: String,
    pub oid: u32,
}

impl DatabaseRecord {
    pub fn new(name: impl Into<String>, oid: u32) -> Self {
        Self {
            name: name.into(),
            oid,
        }
    }
}

/// Database name -> record mapping taken from the backup's files metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabasesByName(HashMap<String, DatabaseRecord>);

impl DatabasesByName {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&DatabaseRecord> {
        self.0.get(name)
    }

    /// Inserts a record keyed by its name, replacing any previous record with that name.
    pub fn insert(&mut self, record: DatabaseRecord) -> Option<DatabaseRecord> {
        self.0.insert(record.name.clone(), record)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DatabaseRecord> {
        self.0.values()
    }
}

impl FromIterator<DatabaseRecord> for DatabasesByName {
    fn from_iter<I: IntoIterator<Item = DatabaseRecord>>(iter: I) -> Self {
        let mut databases = Self::new();
        for record in iter {
            databases.insert(record);
        }
        databases
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDescription {
    pub is_incremented: bool,
    pub is_skipped: bool,
}

/// Per-file metadata of a backup.
#[derive(Debug, Clone, Default)]
pub struct FilesMetadata {
    pub databases_by_names: DatabasesByName,
    /// Archived file path (e.g. `/base/16384/2601`) -> description.
    pub files: BTreeMap<String, FileDescription>,
    /// Tar partition name -> archived file paths stored in it.
    pub tar_file_sets: BTreeMap<String, Vec<String>>,
}

impl FilesMetadata {
    /// Candidate file set for a restore: every listed file that was not skipped.
    pub fn files_to_unwrap(&self) -> HashSet<String> {
        self.files
            .iter()
            .filter(|(_, description)| !description.is_skipped)
            .map(|(path, _)| path.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSentinel {
    pub backup_name: String,
    pub start_time: DateTime<Utc>,
    pub pg_version: u32,
}

/// Handle to a single backup.
pub trait Backup {
    fn name(&self) -> &str;

    fn get_sentinel_and_files_metadata(&self) -> Result<(BackupSentinel, FilesMetadata)>;
}

/// A backup whose sentinel and metadata are already in memory.
#[derive(Debug, Clone)]
pub struct StaticBackup {
    sentinel: BackupSentinel,
    files_metadata: FilesMetadata,
}

impl StaticBackup {
    pub fn new(sentinel: BackupSentinel, files_metadata: FilesMetadata) -> Self {
        Self {
            sentinel,
            files_metadata,
        }
    }
}

impl Backup for StaticBackup {
    fn name(&self) -> &str {
        &self.sentinel.backup_name
    }

    fn get_sentinel_and_files_metadata(&self) -> Result<(BackupSentinel, FilesMetadata)> {
        Ok((self.sentinel.clone(), self.files_metadata.clone()))
    }
}
