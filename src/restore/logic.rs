// selective-restore/src/restore/logic.rs
use std::collections::HashSet;

use tracing::info;

use super::provider::RestoreFilterDecorator;
use crate::backup::Backup;
use crate::config::RestoreConfig;
use crate::errors::Result;
use crate::extract::{ExtractPlan, ExtractProvider, TarSetProvider};

/// Outcome of planning a selective restore: the surviving files and the extraction plan.
#[derive(Debug)]
pub struct RestorePlan {
    pub files_to_unwrap: HashSet<String>,
    pub extract_plan: ExtractPlan,
}

/// Plans a selective restore of `backup` using the default tar-set provider.
///
/// The candidate set is every non-skipped file in the backup's metadata; it is reduced to
/// the configured databases (plus system databases) before partitions are chosen.
pub fn plan_selective_restore(
    backup: &dyn Backup,
    restore_config: &RestoreConfig,
) -> Result<RestorePlan> {
    let (sentinel, files_metadata) = backup.get_sentinel_and_files_metadata()?;
    let mut files_to_unwrap = files_metadata.files_to_unwrap();
    info!(
        backup = %sentinel.backup_name,
        started = %sentinel.start_time,
        pg_version = sentinel.pg_version,
        candidates = files_to_unwrap.len(),
        "Planning selective restore"
    );

    let provider = RestoreFilterDecorator::from_config(
        TarSetProvider::new(restore_config.tar_dir.clone()),
        restore_config,
    );
    let extract_plan = provider.get(
        backup,
        &mut files_to_unwrap,
        restore_config.skip_redundant_tars,
        &restore_config.target_data_dir,
        restore_config.create_incremental_files,
    )?;

    info!(
        files = files_to_unwrap.len(),
        tars = extract_plan.reader_makers.len(),
        target = %extract_plan.dir.display(),
        "Selective restore planned"
    );
    Ok(RestorePlan {
        files_to_unwrap,
        extract_plan,
    })
}
