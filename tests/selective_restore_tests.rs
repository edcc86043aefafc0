use std::cell::RefCell;
use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use selective_restore::backup::{FileDescription, StaticBackup};
use selective_restore::extract::{FileTarInterpreter, TarSetProvider};
use selective_restore::restore::{filter_files_to_unwrap, make_restore_patterns};
use selective_restore::{
    Backup, BackupSentinel, DatabaseRecord, DatabasesByName, ExtractPlan, ExtractProvider,
    FilesMetadata, RestoreConfig, RestoreError, RestoreFilterDecorator, RestorePattern,
    plan_selective_restore,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sentinel() -> BackupSentinel {
    BackupSentinel {
        backup_name: "base_000000010000000000000007".to_string(),
        start_time: Utc::now(),
        pg_version: 150004,
    }
}

fn databases() -> DatabasesByName {
    vec![
        DatabaseRecord::new("postgres", 1),
        DatabaseRecord::new("template0", 2),
        DatabaseRecord::new("template1", 3),
        DatabaseRecord::new("app", 5),
    ]
    .into_iter()
    .collect()
}

fn backup_with(databases: DatabasesByName) -> StaticBackup {
    let metadata = FilesMetadata {
        databases_by_names: databases,
        ..Default::default()
    };
    StaticBackup::new(sentinel(), metadata)
}

fn file_set(files: &[&str]) -> HashSet<String> {
    files.iter().map(|s| s.to_string()).collect()
}

/// Records the file set it was handed and returns an empty plan.
#[derive(Default)]
struct RecordingProvider {
    seen: RefCell<Option<HashSet<String>>>,
    calls: RefCell<usize>,
}

impl ExtractProvider for RecordingProvider {
    fn get(
        &self,
        _backup: &dyn Backup,
        files_to_unwrap: &mut HashSet<String>,
        _skip_redundant_tars: bool,
        db_data_dir: &Path,
        create_new_incremental_files: bool,
    ) -> selective_restore::Result<ExtractPlan> {
        *self.calls.borrow_mut() += 1;
        *self.seen.borrow_mut() = Some(files_to_unwrap.clone());
        Ok(ExtractPlan {
            interpreter: Box::new(FileTarInterpreter::new(
                db_data_dir,
                files_to_unwrap.clone(),
                create_new_incremental_files,
            )),
            reader_makers: Vec::new(),
            dir: db_data_dir.to_path_buf(),
        })
    }
}

struct FailingBackup;

impl Backup for FailingBackup {
    fn name(&self) -> &str {
        "broken"
    }

    fn get_sentinel_and_files_metadata(
        &self,
    ) -> selective_restore::Result<(BackupSentinel, FilesMetadata)> {
        Err(RestoreError::Metadata("files metadata is missing".to_string()))
    }
}

#[test]
fn system_databases_and_outside_files_survive() -> anyhow::Result<()> {
    init_tracing();
    let provider = RestoreFilterDecorator::new(RecordingProvider::default(), vec!["app".to_string()]);
    let mut files = file_set(&["/base/5/1", "/base/1/2", "/other/7/9"]);

    provider.get(&backup_with(databases()), &mut files, false, Path::new("/pgdata"), false)?;

    let expected = file_set(&["/base/5/1", "/base/1/2", "/other/7/9"]);
    assert_eq!(files, expected);
    assert_eq!(provider.inner().seen.borrow().as_ref(), Some(&expected));
    Ok(())
}

#[test]
fn unknown_database_leaves_file_set_untouched() {
    init_tracing();
    let provider = RestoreFilterDecorator::new(RecordingProvider::default(), vec!["ghost".to_string()]);
    let mut files = file_set(&["/base/5/1", "/base/6/1"]);

    let err = provider
        .get(&backup_with(databases()), &mut files, false, Path::new("/pgdata"), false)
        .unwrap_err();

    match err {
        RestoreError::DatabaseNotFound { name } => assert_eq!(name, "ghost"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(files, file_set(&["/base/5/1", "/base/6/1"]));
    assert_eq!(*provider.inner().calls.borrow(), 0);
}

#[test]
fn metadata_failure_is_propagated_before_filtering() {
    let provider = RestoreFilterDecorator::new(RecordingProvider::default(), Vec::new());
    let mut files = file_set(&["/base/9/1"]);

    let err = provider
        .get(&FailingBackup, &mut files, false, Path::new("/pgdata"), false)
        .unwrap_err();

    assert!(matches!(err, RestoreError::Metadata(_)));
    assert_eq!(files.len(), 1);
    assert_eq!(*provider.inner().calls.borrow(), 0);
}

#[test]
fn file_survives_iff_its_oid_was_requested() -> anyhow::Result<()> {
    let mut meta = databases();
    for oid in 10..20u32 {
        meta.insert(DatabaseRecord::new(format!("db{}", oid), oid));
    }
    let requested = vec!["db12".to_string(), "db17".to_string()];
    let provider = RestoreFilterDecorator::new(RecordingProvider::default(), requested);

    let mut files: HashSet<String> = (1..20u32)
        .flat_map(|oid| (0..3).map(move |n| format!("/base/{}/{}", oid, 16000 + n)))
        .collect();
    provider.get(&backup_with(meta), &mut files, false, Path::new("/pgdata"), false)?;

    let kept_oids: HashSet<u32> = [1, 2, 3, 12, 17].into_iter().collect();
    for oid in 1..20u32 {
        for n in 0..3 {
            let file = format!("/base/{}/{}", oid, 16000 + n);
            assert_eq!(files.contains(&file), kept_oids.contains(&oid), "{}", file);
        }
    }
    Ok(())
}

#[test]
fn empty_request_restores_only_system_databases() -> anyhow::Result<()> {
    let patterns = make_restore_patterns(
        &selective_restore::restore::with_system_databases(&[]),
        &databases(),
    )?;
    assert_eq!(
        patterns,
        vec![
            RestorePattern::for_oid(2),
            RestorePattern::for_oid(3),
            RestorePattern::for_oid(1)
        ]
    );

    let mut files = file_set(&["/base/1/1", "/base/2/1", "/base/3/1", "/base/5/1"]);
    filter_files_to_unwrap(&mut files, &patterns)?;
    assert_eq!(files, file_set(&["/base/1/1", "/base/2/1", "/base/3/1"]));
    Ok(())
}

// Files of non-default tablespaces are not pruned, even for databases that were not requested.
#[test]
fn non_default_tablespace_files_are_not_pruned() -> anyhow::Result<()> {
    let provider = RestoreFilterDecorator::new(RecordingProvider::default(), Vec::new());
    let mut files = file_set(&[
        "/base/5/1",
        "/pg_tblspc/16500/PG_15_202209061/5/16501",
        "/global/pg_control",
    ]);

    provider.get(&backup_with(databases()), &mut files, false, Path::new("/pgdata"), false)?;

    assert_eq!(
        files,
        file_set(&["/pg_tblspc/16500/PG_15_202209061/5/16501", "/global/pg_control"])
    );
    Ok(())
}

#[test]
fn decorators_stack() -> anyhow::Result<()> {
    let mut meta = databases();
    meta.insert(DatabaseRecord::new("reports", 6));
    let inner = RestoreFilterDecorator::new(RecordingProvider::default(), vec!["app".to_string()]);
    let outer = RestoreFilterDecorator::new(inner, vec!["app".to_string(), "reports".to_string()]);
    let mut files = file_set(&["/base/5/1", "/base/6/1", "/base/7/1"]);

    outer.get(&backup_with(meta), &mut files, false, Path::new("/pgdata"), false)?;

    assert_eq!(files, file_set(&["/base/5/1"]));
    assert_eq!(*outer.inner().inner().calls.borrow(), 1);
    Ok(())
}

#[test]
fn boxed_provider_can_be_wrapped() -> anyhow::Result<()> {
    let inner: Box<dyn ExtractProvider> = Box::new(TarSetProvider::new("/tars"));
    let provider = RestoreFilterDecorator::new(inner, vec!["app".to_string()]);
    let mut files = file_set(&["/base/5/1", "/base/4/1"]);

    let plan = provider.get(&backup_with(databases()), &mut files, true, Path::new("/pgdata"), true)?;

    assert_eq!(files, file_set(&["/base/5/1"]));
    assert!(plan.interpreter.create_new_incremental_files());
    Ok(())
}

#[test]
fn plan_selective_restore_uses_metadata_candidates() -> anyhow::Result<()> {
    init_tracing();
    let mut metadata = FilesMetadata {
        databases_by_names: databases(),
        ..Default::default()
    };
    for file in ["/base/1/1", "/base/5/1", "/base/5/2", "/base/8/1", "/global/pg_control"] {
        metadata.files.insert(file.to_string(), FileDescription::default());
    }
    metadata.files.insert(
        "/base/5/3".to_string(),
        FileDescription {
            is_incremented: false,
            is_skipped: true,
        },
    );
    metadata.tar_file_sets.insert(
        "part_1.tar.br".to_string(),
        vec!["/base/1/1".to_string(), "/base/5/1".to_string()],
    );
    metadata
        .tar_file_sets
        .insert("part_2.tar.br".to_string(), vec!["/base/8/1".to_string()]);
    metadata.tar_file_sets.insert(
        "pg_control.tar.br".to_string(),
        vec!["/global/pg_control".to_string()],
    );
    let backup = StaticBackup::new(sentinel(), metadata);

    let config = RestoreConfig::from_json_str(
        r#"{"database_list": ["app"], "target_data_dir": "/pgdata", "tar_dir": "/tars"}"#,
    )?;
    let plan = plan_selective_restore(&backup, &config)?;

    assert_eq!(
        plan.files_to_unwrap,
        file_set(&["/base/1/1", "/base/5/1", "/base/5/2", "/global/pg_control"])
    );
    let tars: Vec<&str> = plan.extract_plan.reader_makers.iter().map(|r| r.path()).collect();
    assert_eq!(tars, vec!["part_1.tar.br", "pg_control.tar.br"]);
    assert_eq!(plan.extract_plan.dir, Path::new("/pgdata"));
    Ok(())
}
