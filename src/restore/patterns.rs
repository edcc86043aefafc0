// selective-restore/src/restore/patterns.rs
use std::fmt;

use crate::backup::DatabasesByName;
use crate::errors::{RestoreError, Result};
use crate::utils::databases::{DEFAULT_TABLESPACE, SYSTEM_DATABASES};

/// Glob selecting every file of one database under the default tablespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RestorePattern(String);

impl RestorePattern {
    pub fn for_oid(oid: u32) -> Self {
        Self(format!("/{}/{}/*", DEFAULT_TABLESPACE, oid))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RestorePattern {
    fn from(pattern: String) -> Self {
        Self(pattern)
    }
}

impl From<&str> for RestorePattern {
    fn from(pattern: &str) -> Self {
        Self(pattern.to_string())
    }
}

impl fmt::Display for RestorePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the requested names followed by the system databases, leaving the input untouched.
pub fn with_system_databases(only_databases: &[String]) -> Vec<String> {
    only_databases
        .iter()
        .cloned()
        .chain(SYSTEM_DATABASES.iter().map(|name| name.to_string()))
        .collect()
}

/// Resolves each database name to its restore pattern, in input order.
///
/// Fails on the first name missing from `meta`; no partial list is returned.
pub fn make_restore_patterns(
    databases: &[String],
    meta: &DatabasesByName,
) -> Result<Vec<RestorePattern>> {
    databases
        .iter()
        .map(|name| pattern_for_database(meta, name))
        .collect()
}

fn pattern_for_database(meta: &DatabasesByName, name: &str) -> Result<RestorePattern> {
    meta.get(name)
        .map(|record| RestorePattern::for_oid(record.oid))
        .ok_or_else(|| RestoreError::DatabaseNotFound {
            name: name.to_string(),
        })
}
