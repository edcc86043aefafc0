// selective-restore/src/restore/matcher.rs
use glob::Pattern;

use super::patterns::RestorePattern;
use crate::errors::{RestoreError, Result};

fn compile(pattern: &RestorePattern) -> Result<Pattern> {
    Pattern::new(pattern.as_str()).map_err(|source| RestoreError::MalformedPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Shell-style match of a single pattern against a file path.
///
/// `*` also matches `/`, so `/base/5/*` covers the whole directory subtree.
pub fn matches(pattern: &RestorePattern, file: &str) -> Result<bool> {
    Ok(compile(pattern)?.matches(file))
}

/// A set of restore patterns compiled once and matched against many paths.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: Vec<Pattern>,
}

impl PatternMatcher {
    /// Fails on the first pattern glob rejects.
    pub fn compile(patterns: &[RestorePattern]) -> Result<Self> {
        let patterns = patterns.iter().map(compile).collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// True if any pattern matches; stops at the first hit.
    pub fn is_file_in_patterns(&self, file: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(file))
    }
}
