// selective-restore/src/restore/filter.rs
use std::collections::HashSet;

use tracing::{debug, info};

use super::matcher::PatternMatcher;
use super::patterns::RestorePattern;
use crate::errors::Result;
use crate::utils::databases::default_tablespace_prefix;

/// Removes every file under the default tablespace that matches none of `restore_patterns`.
///
/// Files outside the default tablespace are never touched. Non-default tablespaces are
/// therefore restored in full whatever databases were requested.
pub fn filter_files_to_unwrap(
    files_to_unwrap: &mut HashSet<String>,
    restore_patterns: &[RestorePattern],
) -> Result<()> {
    let prefix = default_tablespace_prefix();

    // Snapshot before removing anything from the live set.
    let mut in_tablespace: Vec<String> = files_to_unwrap
        .iter()
        .filter(|file| file.starts_with(&prefix))
        .cloned()
        .collect();
    if in_tablespace.is_empty() {
        return Ok(());
    }
    in_tablespace.sort_unstable();

    let matcher = PatternMatcher::compile(restore_patterns)?;

    let mut removed = 0usize;
    for file in &in_tablespace {
        if !matcher.is_file_in_patterns(file) {
            debug!(file = %file, "Excluding file from restore");
            files_to_unwrap.remove(file);
            removed += 1;
        }
    }

    info!(
        patterns = restore_patterns.len(),
        checked = in_tablespace.len(),
        removed,
        remaining = files_to_unwrap.len(),
        "Filtered files to unwrap"
    );
    Ok(())
}
