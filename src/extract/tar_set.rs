// selective-restore/src/extract/tar_set.rs
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ExtractPlan, ExtractProvider, ReaderMaker, TarInterpreter};
use crate::backup::Backup;
use crate::errors::Result;

/// Interpreter that unwraps exactly the files left in the candidate set.
#[derive(Debug, Clone)]
pub struct FileTarInterpreter {
    db_data_dir: PathBuf,
    files_to_unwrap: HashSet<String>,
    create_new_incremental_files: bool,
}

impl FileTarInterpreter {
    pub fn new(
        db_data_dir: &Path,
        files_to_unwrap: HashSet<String>,
        create_new_incremental_files: bool,
    ) -> Self {
        Self {
            db_data_dir: db_data_dir.to_path_buf(),
            files_to_unwrap,
            create_new_incremental_files,
        }
    }
}

impl TarInterpreter for FileTarInterpreter {
    fn target_dir(&self) -> &Path {
        &self.db_data_dir
    }

    fn should_unwrap(&self, file: &str) -> bool {
        self.files_to_unwrap.contains(file)
    }

    fn create_new_incremental_files(&self) -> bool {
        self.create_new_incremental_files
    }
}

/// A tar partition stored as a plain file under a local directory.
#[derive(Debug, Clone)]
pub struct LocalTarReaderMaker {
    name: String,
    path: PathBuf,
}

impl LocalTarReaderMaker {
    pub fn new(tar_dir: &Path, name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: tar_dir.join(name),
        }
    }
}

impl ReaderMaker for LocalTarReaderMaker {
    fn path(&self) -> &str {
        &self.name
    }

    fn make_reader(&self) -> Result<Box<dyn Read + Send>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(file))
    }
}

/// Default provider: picks tar partitions from the backup's `tar_file_sets`.
#[derive(Debug, Clone)]
pub struct TarSetProvider {
    tar_dir: PathBuf,
}

impl TarSetProvider {
    pub fn new(tar_dir: impl Into<PathBuf>) -> Self {
        Self {
            tar_dir: tar_dir.into(),
        }
    }
}

impl ExtractProvider for TarSetProvider {
    fn get(
        &self,
        backup: &dyn Backup,
        files_to_unwrap: &mut HashSet<String>,
        skip_redundant_tars: bool,
        db_data_dir: &Path,
        create_new_incremental_files: bool,
    ) -> Result<ExtractPlan> {
        let (_, files_metadata) = backup.get_sentinel_and_files_metadata()?;

        let mut reader_makers: Vec<Box<dyn ReaderMaker>> = Vec::new();
        for (tar_name, tar_files) in &files_metadata.tar_file_sets {
            if skip_redundant_tars && !tar_files.iter().any(|f| files_to_unwrap.contains(f)) {
                debug!(backup = backup.name(), tar = %tar_name, "Skipping redundant tar partition");
                continue;
            }
            reader_makers.push(Box::new(LocalTarReaderMaker::new(&self.tar_dir, tar_name)));
        }

        let interpreter = FileTarInterpreter::new(
            db_data_dir,
            files_to_unwrap.clone(),
            create_new_incremental_files,
        );

        Ok(ExtractPlan {
            interpreter: Box::new(interpreter),
            reader_makers,
            dir: db_data_dir.to_path_buf(),
        })
    }
}
