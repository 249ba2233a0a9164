//! vCard decoding.
//!
//! Input is cut into cards on every `BEGIN:VCARD` marker, matched without
//! regard to case. `END:VCARD` is not a split point, so a card that never
//! closes does not swallow the cards after it. Inside a card each line is
//! read as one property and the first occurrence of a property wins.

use clipbook_core::domain::{join_components, sanitize_phone, ParsedContact};
use std::borrow::Cow;

const CARD_MARKER: &str = "BEGIN:VCARD";

pub fn parse_vcf(data: &str) -> Vec<ParsedContact> {
    split_cards(data)
        .into_iter()
        .filter(|chunk| !chunk.trim().is_empty())
        .filter_map(|chunk| RawCard::scan(chunk).into_contact())
        .collect()
}

/// Splits on `BEGIN:VCARD`. The first chunk is whatever precedes the first
/// marker and is usually blank.
fn split_cards(data: &str) -> Vec<&str> {
    // ASCII uppercasing keeps byte offsets identical to `data`.
    let upper = data.to_ascii_uppercase();
    let mut chunks = Vec::new();
    let mut start = 0;
    while let Some(offset) = upper[start..].find(CARD_MARKER) {
        let marker_at = start + offset;
        chunks.push(&data[start..marker_at]);
        start = marker_at + CARD_MARKER.len();
    }
    chunks.push(&data[start..]);
    chunks
}

#[derive(Debug, Default)]
struct RawCard {
    formatted_name: Option<String>,
    structured_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    organization: Option<String>,
}

impl RawCard {
    fn scan(chunk: &str) -> Self {
        let mut card = RawCard::default();
        for line in normalize_line_endings(chunk).lines() {
            let trimmed = line.trim();
            if trimmed.eq_ignore_ascii_case("END:VCARD") {
                break;
            }

            let Some((key, value)) = split_property(trimmed) else {
                continue;
            };

            let slot = match key.as_str() {
                "FN" => &mut card.formatted_name,
                "N" => &mut card.structured_name,
                "EMAIL" => &mut card.email,
                "TEL" => &mut card.phone,
                "ADR" => &mut card.address,
                "ORG" => &mut card.organization,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        card
    }

    fn into_contact(self) -> Option<ParsedContact> {
        let name = self
            .formatted_name
            .map(|raw| unescape_vcard_value(&raw).trim().to_string())
            .filter(|value| !value.is_empty())
            .or_else(|| self.structured_name.as_deref().map(join_structured_name))
            .unwrap_or_default();

        let email = self
            .email
            .map(|raw| last_segment(&raw).trim().to_string())
            .unwrap_or_default();

        let phone = self
            .phone
            .map(|raw| sanitize_phone(last_segment(&raw)))
            .unwrap_or_default();

        // ORG stands in for a missing ADR. An organization is not an address,
        // but imported records have always been filled this way.
        let address = match self.address {
            Some(raw) => Some(join_address(&raw)),
            None => self
                .organization
                .map(|raw| unescape_vcard_value(&raw).trim().to_string()),
        }
        .filter(|value| !value.is_empty());

        let contact = ParsedContact {
            name,
            email,
            phone,
            address,
            ..ParsedContact::default()
        };
        contact.has_identity().then_some(contact)
    }
}

/// Text after the last `:` or `;`, which drops `mailto:`/`tel:` schemes and
/// any parameters left in the value.
fn last_segment(raw: &str) -> &str {
    raw.rsplit([':', ';']).next().unwrap_or(raw)
}

fn join_structured_name(raw: &str) -> String {
    let parts = split_components(raw);
    join_components(parts.iter().map(String::as_str), " ")
}

fn join_address(raw: &str) -> String {
    let parts = split_components(raw);
    join_components(parts.iter().map(String::as_str), ", ")
}

fn split_components(raw: &str) -> Vec<String> {
    split_escaped(raw, ';')
        .iter()
        .map(|part| unescape_vcard_value(part))
        .collect()
}

fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if !input.contains('\r') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if matches!(chars.peek(), Some('\n')) {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

/// Returns the uppercased property name (parameters and group prefix
/// removed) and everything after the first `:`.
fn split_property(line: &str) -> Option<(String, String)> {
    let (left, value) = line.split_once(':')?;
    let mut name = left.split(';').next()?.trim();
    if let Some((_, ungrouped)) = name.rsplit_once('.') {
        name = ungrouped;
    }
    if name.is_empty() {
        return None;
    }
    Some((name.to_ascii_uppercase(), value.to_string()))
}

fn split_escaped(value: &str, separator: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut escape = false;

    for ch in value.chars() {
        if escape {
            current.push(ch);
            escape = false;
            continue;
        }

        if ch == '\\' {
            current.push(ch);
            escape = true;
            continue;
        }

        if ch == separator {
            items.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }

    items.push(current);
    items
}

fn unescape_vcard_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') | Some('N') => out.push('\n'),
                Some(other) => out.push(other),
                None => break,
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_vcf_empty_input() {
        assert!(parse_vcf("").is_empty());
        assert!(parse_vcf("  \n\n").is_empty());
    }

    #[test]
    fn parse_vcf_basic() {
        let data = "BEGIN:VCARD\nVERSION:3.0\nFN:John Doe\nEMAIL:john@example.com\nTEL:+1 (555) 123-4567\nEND:VCARD\n";
        let parsed = parse_vcf(data);
        assert_eq!(parsed.len(), 1);
        let contact = &parsed[0];
        assert_eq!(contact.name, "John Doe");
        assert_eq!(contact.email, "john@example.com");
        assert_eq!(contact.phone, "+1(555)123-4567");
        assert!(contact.address.is_none());
        assert!(contact.extra.is_empty());
    }

    #[test]
    fn parse_vcf_keeps_card_order() {
        let data = "BEGIN:VCARD\nFN:First\nEND:VCARD\nBEGIN:VCARD\nFN:Second\nEND:VCARD\n";
        let names: Vec<String> = parse_vcf(data).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn parse_vcf_marker_is_case_insensitive() {
        let data = "begin:vcard\nfn:Lower Case\nend:vcard\nBegin:VCard\nFN:Mixed\nEND:VCARD\n";
        let parsed = parse_vcf(data);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "Lower Case");
        assert_eq!(parsed[1].name, "Mixed");
    }

    #[test]
    fn parse_vcf_without_markers_yields_nothing() {
        assert!(parse_vcf("just some text\nwith lines\n").is_empty());
    }

    #[test]
    fn parse_vcf_missing_end_does_not_stop_later_cards() {
        let data = "BEGIN:VCARD\nFN:Unclosed\nEMAIL:open@example.com\nBEGIN:VCARD\nFN:Closed\nEND:VCARD\n";
        let parsed = parse_vcf(data);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "Unclosed");
        assert_eq!(parsed[0].email, "open@example.com");
        assert_eq!(parsed[1].name, "Closed");
        assert_eq!(parsed[1].email, "");
    }

    #[test]
    fn parse_vcf_falls_back_to_structured_name() {
        let data = "BEGIN:VCARD\nN:Doe;Jane;;Dr.;\nEND:VCARD\n";
        let parsed = parse_vcf(data);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "Doe Jane Dr.");
    }

    #[test]
    fn parse_vcf_blank_formatted_name_uses_structured_name() {
        let data = "BEGIN:VCARD\nFN:   \nN:Smith;Ann\nEND:VCARD\n";
        assert_eq!(parse_vcf(data)[0].name, "Smith Ann");
    }

    #[test]
    fn parse_vcf_formatted_name_wins_over_structured_name() {
        let data = "BEGIN:VCARD\nN:Doe;John\nFN:Johnny D\nEND:VCARD\n";
        assert_eq!(parse_vcf(data)[0].name, "Johnny D");
    }

    #[test]
    fn parse_vcf_reads_properties_with_parameters() {
        let data = "BEGIN:VCARD\nVERSION:3.0\nFN;CHARSET=UTF-8:Zoë Park\nEMAIL;TYPE=INTERNET,HOME:zoe@example.com\nTEL;TYPE=CELL:555.010.9999\nEND:VCARD\n";
        let contact = &parse_vcf(data)[0];
        assert_eq!(contact.name, "Zoë Park");
        assert_eq!(contact.email, "zoe@example.com");
        assert_eq!(contact.phone, "5550109999");
    }

    #[test]
    fn parse_vcf_first_email_and_phone_win() {
        let data = "BEGIN:VCARD\nFN:Multi\nEMAIL:work@example.com\nEMAIL:home@example.com\nTEL:111\nTEL:222\nEND:VCARD\n";
        let contact = &parse_vcf(data)[0];
        assert_eq!(contact.email, "work@example.com");
        assert_eq!(contact.phone, "111");
    }

    #[test]
    fn parse_vcf_uri_phone_is_sanitized() {
        let data = "BEGIN:VCARD\nVERSION:4.0\nFN:Uri\nTEL;VALUE=uri;TYPE=cell:tel:+1-555-0100\nEND:VCARD\n";
        assert_eq!(parse_vcf(data)[0].phone, "+1-555-0100");
    }

    #[test]
    fn parse_vcf_joins_address_components() {
        let data = "BEGIN:VCARD\nFN:Addr\nADR;TYPE=HOME:;;123 Main St;Springfield;IL;62704;USA\nORG:Ignored Inc\nEND:VCARD\n";
        assert_eq!(
            parse_vcf(data)[0].address.as_deref(),
            Some("123 Main St, Springfield, IL, 62704, USA")
        );
    }

    #[test]
    fn parse_vcf_uses_org_when_adr_missing() {
        let data = "BEGIN:VCARD\nFN:Org Only\nORG: Sharp Cuts Barbershop \nEND:VCARD\n";
        assert_eq!(
            parse_vcf(data)[0].address.as_deref(),
            Some("Sharp Cuts Barbershop")
        );
    }

    #[test]
    fn parse_vcf_blank_adr_skips_org_fallback() {
        let data = "BEGIN:VCARD\nFN:Blank Adr\nADR:;;;;\nORG:Fallback Co\nEND:VCARD\n";
        assert!(parse_vcf(data)[0].address.is_none());
    }

    #[test]
    fn parse_vcf_email_drops_uri_scheme() {
        let data = "BEGIN:VCARD\nVERSION:4.0\nFN:Uri Mail\nEMAIL;VALUE=uri:mailto:j@x.com\nEND:VCARD\n";
        assert_eq!(parse_vcf(data)[0].email, "j@x.com");
    }

    #[test]
    fn parse_vcf_phone_uses_text_after_last_separator() {
        let data = "BEGIN:VCARD\nFN:Extension\nTEL;TYPE=CELL:+1-555-0100;ext=12\nEND:VCARD\n";
        assert_eq!(parse_vcf(data)[0].phone, "12");
    }

    #[test]
    fn parse_vcf_drops_cards_without_name_or_email() {
        let data = "BEGIN:VCARD\nTEL:555-0000\nORG:Nobody\nEND:VCARD\nBEGIN:VCARD\nEMAIL:only@example.com\nEND:VCARD\n";
        let parsed = parse_vcf(data);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "");
        assert_eq!(parsed[0].email, "only@example.com");
    }

    #[test]
    fn parse_vcf_handles_crlf_and_cr_line_endings() {
        let crlf = "BEGIN:VCARD\r\nFN:Jane Doe\r\nEMAIL:jane@example.com\r\nEND:VCARD\r\n";
        let cr = "BEGIN:VCARD\rFN:Jane Doe\rEMAIL:jane@example.com\rEND:VCARD\r";
        for data in [crlf, cr] {
            let parsed = parse_vcf(data);
            assert_eq!(parsed.len(), 1);
            assert_eq!(parsed[0].name, "Jane Doe");
            assert_eq!(parsed[0].email, "jane@example.com");
        }
    }

    #[test]
    fn parse_vcf_ignores_lines_after_end() {
        let data = "BEGIN:VCARD\nFN:Closed\nEND:VCARD\nEMAIL:stray@example.com\n";
        let parsed = parse_vcf(data);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].email, "");
    }

    #[test]
    fn parse_vcf_reads_grouped_properties() {
        let data = "BEGIN:VCARD\nFN:Grouped\nitem1.EMAIL;type=INTERNET:grouped@example.com\nEND:VCARD\n";
        assert_eq!(parse_vcf(data)[0].email, "grouped@example.com");
    }

    #[test]
    fn parse_vcf_tolerates_indented_lines() {
        let data = "BEGIN:VCARD\n    FN:Indented\n    EMAIL:indented@example.com\n    END:VCARD\n";
        let parsed = parse_vcf(data);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "Indented");
        assert_eq!(parsed[0].email, "indented@example.com");
    }

    #[test]
    fn parse_vcf_unescapes_values() {
        let data = "BEGIN:VCARD\nFN:Doe\\, Jane\nADR:;;1 Main St\\; Unit 2;Town\nEND:VCARD\n";
        let contact = &parse_vcf(data)[0];
        assert_eq!(contact.name, "Doe, Jane");
        assert_eq!(contact.address.as_deref(), Some("1 Main St; Unit 2, Town"));
    }

    #[test]
    fn parse_vcf_is_deterministic() {
        let data = "BEGIN:VCARD\nFN:A\nEND:VCARD\nBEGIN:VCARD\nN:B;C\nEMAIL:bc@example.com\nEND:VCARD\n";
        assert_eq!(parse_vcf(data), parse_vcf(data));
    }

    #[test]
    fn split_cards_keeps_leading_chunk() {
        let chunks = split_cards("preamble\nBEGIN:VCARD\nFN:A\n");
        assert_eq!(chunks, vec!["preamble\n", "\nFN:A\n"]);
    }
}
