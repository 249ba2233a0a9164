use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file type: {0} (expected .csv or .vcf)")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;
