// Storage layout constants shared by pattern resolution and filtering

/// Name of the storage root that holds one directory per database oid.
pub const DEFAULT_TABLESPACE: &str = "base";

/// Databases that are restored regardless of the requested list.
pub const SYSTEM_DATABASES: &[&str] = &["template0", "template1", "postgres"];

/// Prefix every file under the default storage root starts with.
pub fn default_tablespace_prefix() -> String {
    format!("/{}/", DEFAULT_TABLESPACE)
}
