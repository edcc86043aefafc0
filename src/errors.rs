// selective-restore/src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RestoreError {
    #[error("Database '{name}' not found in backup metadata")]
    DatabaseNotFound { name: String },

    #[error("Malformed restore pattern '{pattern}': {source}")]
    MalformedPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Backup metadata error: {0}")]
    Metadata(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction provider failed: {0}")]
    Provider(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RestoreError>;
