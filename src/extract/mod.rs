// selective-restore/src/extract/mod.rs
pub mod tar_set;

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::backup::Backup;
use crate::errors::Result;

pub use tar_set::{FileTarInterpreter, LocalTarReaderMaker, TarSetProvider};

/// Decides, per archived file, whether it is written to the data directory.
pub trait TarInterpreter {
    fn target_dir(&self) -> &Path;

    fn should_unwrap(&self, file: &str) -> bool;

    fn create_new_incremental_files(&self) -> bool;
}

/// Opens one tar partition of a backup as a raw byte stream.
pub trait ReaderMaker {
    fn path(&self) -> &str;

    fn make_reader(&self) -> Result<Box<dyn Read + Send>>;
}

/// What an [`ExtractProvider`] hands to the extraction stage.
pub struct ExtractPlan {
    pub interpreter: Box<dyn TarInterpreter>,
    pub reader_makers: Vec<Box<dyn ReaderMaker>>,
    pub dir: PathBuf,
}

impl std::fmt::Debug for ExtractPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractPlan")
            .field("target_dir", &self.interpreter.target_dir())
            .field(
                "reader_makers",
                &self.reader_makers.iter().map(|r| r.path()).collect::<Vec<_>>(),
            )
            .field("dir", &self.dir)
            .finish()
    }
}

/// Prepares the extraction of a backup into `db_data_dir`.
///
/// `files_to_unwrap` is owned by the caller for the duration of the call and may be
/// reduced in place by implementations that pre-filter it.
pub trait ExtractProvider {
    fn get(
        &self,
        backup: &dyn Backup,
        files_to_unwrap: &mut HashSet<String>,
        skip_redundant_tars: bool,
        db_data_dir: &Path,
        create_new_incremental_files: bool,
    ) -> Result<ExtractPlan>;
}

impl<P: ExtractProvider + ?Sized> ExtractProvider for Box<P> {
    fn get(
        &self,
        backup: &dyn Backup,
        files_to_unwrap: &mut HashSet<String>,
        skip_redundant_tars: bool,
        db_data_dir: &Path,
        create_new_incremental_files: bool,
    ) -> Result<ExtractPlan> {
        (**self).get(
            backup,
            files_to_unwrap,
            skip_redundant_tars,
            db_data_dir,
            create_new_incremental_files,
        )
    }
}
