use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid contact id: {0}")]
    InvalidContactId(String),
    #[error("unknown file format: {0}")]
    UnknownFileFormat(String),
}
