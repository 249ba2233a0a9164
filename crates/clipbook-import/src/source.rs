use crate::error::{ImportError, Result};
use clipbook_core::domain::FileFormat;
use std::fs;
use std::path::PathBuf;

/// Somewhere contact text comes from.
pub trait ContactSource {
    fn source_name(&self) -> String;
    fn read_text(&self) -> Result<String>;

    /// Format implied by the source itself, such as a file extension.
    fn format_hint(&self) -> Option<FileFormat> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContactSource for FileSource {
    fn source_name(&self) -> String {
        self.path.display().to_string()
    }

    fn read_text(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|source| ImportError::Read {
            path: self.path.clone(),
            source,
        })
    }

    fn format_hint(&self) -> Option<FileFormat> {
        FileFormat::from_path(&self.path)
    }
}

/// Text already held in memory, e.g. read from stdin.
#[derive(Debug, Clone)]
pub struct TextSource {
    name: String,
    text: String,
}

impl TextSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl ContactSource for TextSource {
    fn source_name(&self) -> String {
        self.name.clone()
    }

    fn read_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}
