// selective-restore/src/restore/provider.rs
use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use super::filter::filter_files_to_unwrap;
use super::patterns::{make_restore_patterns, with_system_databases};
use crate::backup::Backup;
use crate::config::RestoreConfig;
use crate::errors::Result;
use crate::extract::{ExtractPlan, ExtractProvider};

/// Wraps an [`ExtractProvider`] and restricts the files it sees to the requested databases.
///
/// System databases are always kept. Arguments other than the file set are passed through
/// untouched and the inner provider's result is returned as is.
#[derive(Debug, Clone)]
pub struct RestoreFilterDecorator<P> {
    inner: P,
    only_databases: Vec<String>,
}

impl<P: ExtractProvider> RestoreFilterDecorator<P> {
    pub fn new(inner: P, only_databases: Vec<String>) -> Self {
        Self {
            inner,
            only_databases,
        }
    }

    pub fn from_config(inner: P, restore_config: &RestoreConfig) -> Self {
        Self::new(inner, restore_config.databases_to_restore.clone())
    }

    pub fn only_databases(&self) -> &[String] {
        &self.only_databases
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: ExtractProvider> ExtractProvider for RestoreFilterDecorator<P> {
    fn get(
        &self,
        backup: &dyn Backup,
        files_to_unwrap: &mut HashSet<String>,
        skip_redundant_tars: bool,
        db_data_dir: &Path,
        create_new_incremental_files: bool,
    ) -> Result<ExtractPlan> {
        let (_, files_metadata) = backup.get_sentinel_and_files_metadata()?;

        let databases = with_system_databases(&self.only_databases);
        let patterns = make_restore_patterns(&databases, &files_metadata.databases_by_names)?;
        info!(
            backup = backup.name(),
            databases = ?databases,
            "Restoring selected databases only"
        );

        filter_files_to_unwrap(files_to_unwrap, &patterns)?;

        self.inner.get(
            backup,
            files_to_unwrap,
            skip_redundant_tars,
            db_data_dir,
            create_new_incremental_files,
        )
    }
}
