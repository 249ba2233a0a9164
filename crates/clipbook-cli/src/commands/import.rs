use crate::commands::{print_json, Context};
use crate::error::no_contacts;
use anyhow::{anyhow, Result};
use clap::Args;
use clipbook_core::domain::{Contact, FileFormat, ParsedContact};
use clipbook_import::{import_contacts, ContactSource, FileSource, ImportOptions, TextSource};
use serde::Serialize;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

const STDIN_PATH: &str = "-";

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Contact file (.csv or .vcf), or `-` to read stdin
    pub file: PathBuf,
    /// Decoder to use instead of guessing from the file
    #[arg(long)]
    pub format: Option<FileFormat>,
    /// Print records without generated ids
    #[arg(long)]
    pub no_ids: bool,
    /// Fail when the file yields no contacts
    #[arg(long)]
    pub require_contacts: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ImportedContacts {
    WithIds(Vec<Contact>),
    Parsed(Vec<ParsedContact>),
}

#[derive(Debug, Serialize)]
struct ImportReport {
    source: String,
    format: FileFormat,
    count: usize,
    contacts: ImportedContacts,
}

pub fn import(ctx: &Context<'_>, args: ImportArgs) -> Result<()> {
    let source = open_source(&args.file)?;
    let options = ImportOptions {
        format: args.format,
        default_format: ctx.config.import.default_format,
    };
    let batch = import_contacts(&*source, options)?;

    if batch.contacts.is_empty() && args.require_contacts {
        return Err(no_contacts(batch.source));
    }

    let assign_ids = ctx.config.import.assign_ids && !args.no_ids;
    debug!(assign_ids, "preparing import report");
    let count = batch.contacts.len();
    let contacts = if assign_ids {
        ImportedContacts::WithIds(
            batch
                .contacts
                .into_iter()
                .map(ParsedContact::into_contact_with_generated_id)
                .collect(),
        )
    } else {
        ImportedContacts::Parsed(batch.contacts)
    };
    let report = ImportReport {
        source: batch.source,
        format: batch.format,
        count,
        contacts,
    };

    if ctx.json {
        return print_json(&report);
    }

    print_report(&report);
    Ok(())
}

fn open_source(path: &Path) -> Result<Box<dyn ContactSource>> {
    if path.as_os_str() != STDIN_PATH {
        return Ok(Box::new(FileSource::new(path)));
    }

    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .map_err(|err| anyhow!("failed to read contacts from stdin: {err}"))?;
    Ok(Box::new(TextSource::new("stdin", text)))
}

fn print_report(report: &ImportReport) {
    if report.count == 0 {
        println!("No contacts found in {} ({})", report.source, report.format);
        return;
    }

    println!(
        "Parsed {} contact{} from {} ({})",
        report.count,
        if report.count == 1 { "" } else { "s" },
        report.source,
        report.format
    );
    match &report.contacts {
        ImportedContacts::WithIds(contacts) => {
            for contact in contacts {
                let line = summary_line(&contact.name, &contact.email, &contact.phone);
                println!("- {line}  [{}]", contact.id);
            }
        }
        ImportedContacts::Parsed(contacts) => {
            for contact in contacts {
                println!(
                    "- {}",
                    summary_line(&contact.name, &contact.email, &contact.phone)
                );
            }
        }
    }
}

fn summary_line(name: &str, email: &str, phone: &str) -> String {
    let mut line = clipbook_core::display_name(name, email);
    if !email.is_empty() && !name.trim().is_empty() {
        line.push_str(&format!(" <{email}>"));
    }
    if !phone.is_empty() {
        line.push_str(&format!(" {phone}"));
    }
    line
}
