//! Contact file import: CSV and vCard decoding plus format selection.
//!
//! The decoders in [`csv`] and [`vcf`] are pure functions over text. They
//! never fail; input without usable records yields an empty list.

pub mod csv;
pub mod error;
pub mod source;
pub mod vcf;

pub use error::{ImportError, Result};
pub use source::{ContactSource, FileSource, TextSource};

use clipbook_core::domain::{FileFormat, ParsedContact};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Forces a decoder regardless of the source.
    pub format: Option<FileFormat>,
    /// Used when neither the source nor the content identifies a format.
    pub default_format: Option<FileFormat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBatch {
    pub source: String,
    pub format: FileFormat,
    pub contacts: Vec<ParsedContact>,
}

pub fn parse_contacts(format: FileFormat, data: &str) -> Vec<ParsedContact> {
    match format {
        FileFormat::Csv => csv::parse_csv(data),
        FileFormat::Vcf => vcf::parse_vcf(data),
    }
}

/// Recognizes vCard text by its card marker. CSV has no reliable signature.
pub fn sniff_format(data: &str) -> Option<FileFormat> {
    data.to_ascii_uppercase()
        .contains("BEGIN:VCARD")
        .then_some(FileFormat::Vcf)
}

/// Picks a decoder: explicit option, then the source's own hint, then the
/// content, then the configured default.
pub fn resolve_format(
    source: &dyn ContactSource,
    data: &str,
    options: ImportOptions,
) -> Result<FileFormat> {
    options
        .format
        .or_else(|| source.format_hint())
        .or_else(|| sniff_format(data))
        .or(options.default_format)
        .ok_or_else(|| ImportError::UnsupportedFormat(source.source_name()))
}

pub fn import_contacts(source: &dyn ContactSource, options: ImportOptions) -> Result<ImportBatch> {
    let name = source.source_name();
    let data = source.read_text()?;
    let format = resolve_format(source, &data, options)?;
    debug!(source = %name, format = %format, bytes = data.len(), "decoding contacts");

    let contacts = parse_contacts(format, &data);
    debug!(source = %name, count = contacts.len(), "decoded contacts");

    Ok(ImportBatch {
        source: name,
        format,
        contacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_format_detects_vcards() {
        assert_eq!(
            sniff_format("begin:vcard\nFN:A\nend:vcard"),
            Some(FileFormat::Vcf)
        );
        assert_eq!(sniff_format("name,email\nA,a@test.com"), None);
    }

    #[test]
    fn resolve_format_prefers_explicit_option() {
        let source = TextSource::new("stdin", "BEGIN:VCARD\nFN:A\nEND:VCARD\n");
        let options = ImportOptions {
            format: Some(FileFormat::Csv),
            default_format: None,
        };
        let format = resolve_format(&source, "BEGIN:VCARD", options).unwrap();
        assert_eq!(format, FileFormat::Csv);
    }

    #[test]
    fn resolve_format_uses_default_for_unknown_text() {
        let source = TextSource::new("stdin", "name,email\n");
        let options = ImportOptions {
            format: None,
            default_format: Some(FileFormat::Csv),
        };
        assert_eq!(
            resolve_format(&source, "name,email\n", options).unwrap(),
            FileFormat::Csv
        );
    }

    #[test]
    fn resolve_format_rejects_unknown_text_without_default() {
        let source = TextSource::new("notes.txt", "hello");
        let err = resolve_format(&source, "hello", ImportOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(name) if name == "notes.txt"));
    }

    #[test]
    fn import_contacts_from_text_source() {
        let source = TextSource::new("stdin", "BEGIN:VCARD\nFN:Ada\nEND:VCARD\n");
        let batch = import_contacts(&source, ImportOptions::default()).unwrap();
        assert_eq!(batch.source, "stdin");
        assert_eq!(batch.format, FileFormat::Vcf);
        assert_eq!(batch.contacts.len(), 1);
        assert_eq!(batch.contacts[0].name, "Ada");
    }
}
