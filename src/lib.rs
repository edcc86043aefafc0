//! Selective restore of PostgreSQL base backups
//!
//! Narrows the set of archived files extracted during a restore to the requested
//! databases (and the system databases), then hands off to an extraction provider.

pub mod backup;
pub mod config;
pub mod errors;
pub mod extract;
pub mod restore;
pub mod utils;

pub use backup::{Backup, BackupSentinel, DatabaseRecord, DatabasesByName, FilesMetadata};
pub use config::RestoreConfig;
pub use errors::{RestoreError, Result};
pub use extract::{ExtractPlan, ExtractProvider, TarSetProvider};
pub use restore::{RestoreFilterDecorator, RestorePattern, plan_selective_restore};
