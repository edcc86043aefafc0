// selective-restore/src/config/mod.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

// Shape of the restore section of config.json
#[derive(Debug, Clone, Deserialize)]
pub struct RawJsonConfig {
    pub database_list: Option<serde_json::Value>,
    pub target_data_dir: Option<PathBuf>,
    pub tar_dir: Option<PathBuf>,
    pub skip_redundant_tars: Option<bool>,
    pub create_incremental_files: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct RestoreConfig {
    /// Databases to restore besides the system ones. Empty means system databases only.
    pub databases_to_restore: Vec<String>,
    pub target_data_dir: PathBuf,
    pub tar_dir: PathBuf,
    pub skip_redundant_tars: bool,
    pub create_incremental_files: bool,
}

impl RestoreConfig {
    pub fn load_from_json(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;
        Self::from_json_str(&config_content).with_context(|| {
            format!(
                "Failed to load restore configuration from {}",
                config_path.display()
            )
        })
    }

    pub fn from_json_str(config_content: &str) -> Result<Self> {
        let raw_config: RawJsonConfig =
            serde_json::from_str(config_content).context("Failed to parse restore config JSON")?;
        load_restore_config_from_json(&raw_config)
    }
}

pub fn load_restore_config_from_json(raw_config: &RawJsonConfig) -> Result<RestoreConfig> {
    let target_data_dir = required_dir(&raw_config.target_data_dir, "target_data_dir")?;
    let tar_dir = required_dir(&raw_config.tar_dir, "tar_dir")?;

    let mut databases_to_restore = parse_database_list_for_restore(&raw_config.database_list)?;
    databases_to_restore.sort();

    Ok(RestoreConfig {
        databases_to_restore,
        target_data_dir,
        tar_dir,
        skip_redundant_tars: raw_config.skip_redundant_tars.unwrap_or(true),
        create_incremental_files: raw_config.create_incremental_files.unwrap_or(false),
    })
}

fn required_dir(value: &Option<PathBuf>, key: &str) -> Result<PathBuf> {
    let dir = value
        .as_ref()
        .with_context(|| format!("{} must be set in config.json for restore", key))?;
    if dir.as_os_str().is_empty() {
        return Err(anyhow::anyhow!("{} cannot be empty in config.json.", key));
    }
    Ok(dir.clone())
}

/// Parses the database_list configuration into the source database names to restore.
/// Accepts `["db1", "db2"]` or `{"source_db": "target_db"}`; only source names matter here.
fn parse_database_list_for_restore(database_list: &Option<serde_json::Value>) -> Result<Vec<String>> {
    match database_list {
        Some(value) if value.is_array() => {
            let databases: Vec<String> = serde_json::from_value(value.clone())
                .context("Failed to parse database_list as array")?;
            Ok(databases)
        }
        Some(value) if value.is_object() => {
            let mapping: HashMap<String, String> = serde_json::from_value(value.clone())
                .context("Failed to parse database_list as mapping object")?;
            Ok(mapping.into_keys().collect())
        }
        Some(_) => Err(anyhow::anyhow!(
            "database_list must be either an array of database names or a mapping object"
        )),
        None => Ok(Vec::new()),
    }
}
