//! Comma-separated contact lists with a header row.
//!
//! Columns are recognized by substring match on the lowercased header text,
//! so "Full Name", "Contact" and "username" all land in the name column.
//! Quoted fields are not supported: a literal comma inside a value shifts
//! the remaining cells of that row.

use clipbook_core::domain::{ExtraFields, ParsedContact};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Email,
    Phone,
    Address,
}

/// Header categories and the substrings that select them. Each category
/// takes the first header (left to right) containing any of its candidates.
const HEADER_CATEGORIES: [(Column, &[&str]); 4] = [
    (Column::Name, &["name", "full name", "contact"]),
    (Column::Email, &["email", "e-mail"]),
    (Column::Phone, &["phone", "mobile", "tel"]),
    (Column::Address, &["address", "location", "street", "city"]),
];

/// Headers containing any of these are not carried over as extra fields.
const RESERVED_HEADER_TERMS: [&str; 7] = [
    "name", "email", "phone", "address", "location", "street", "city",
];

#[derive(Debug, Default)]
struct ColumnMap {
    name: Option<usize>,
    email: Option<usize>,
    phone: Option<usize>,
    address: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &[String]) -> Self {
        let mut map = ColumnMap::default();
        for (column, candidates) in HEADER_CATEGORIES {
            let index = headers
                .iter()
                .position(|header| candidates.iter().any(|term| header.contains(term)));
            match column {
                Column::Name => map.name = index,
                Column::Email => map.email = index,
                Column::Phone => map.phone = index,
                Column::Address => map.address = index,
            }
        }
        map
    }
}

const BYTE_ORDER_MARK: char = '\u{feff}';

pub fn parse_csv(data: &str) -> Vec<ParsedContact> {
    // Spreadsheet exports often start with a UTF-8 byte order mark.
    let data = data.strip_prefix(BYTE_ORDER_MARK).unwrap_or(data);
    let mut lines = data.lines().filter(|line| !line.trim().is_empty());
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };

    let headers: Vec<String> = split_row(header_line)
        .map(|header| header.to_lowercase())
        .collect();
    let columns = ColumnMap::resolve(&headers);
    let extra_columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, header)| !is_reserved_header(header))
        .map(|(index, header)| (index, header.as_str()))
        .collect();

    lines
        .filter_map(|line| {
            let values: Vec<&str> = split_row(line).collect();
            let contact = build_contact(&values, &columns, &extra_columns);
            contact.has_identity().then_some(contact)
        })
        .collect()
}

fn build_contact(
    values: &[&str],
    columns: &ColumnMap,
    extra_columns: &[(usize, &str)],
) -> ParsedContact {
    let mut extra = ExtraFields::new();
    for (index, header) in extra_columns {
        extra.insert(*header, cell(values, Some(*index)));
    }

    ParsedContact {
        name: cell(values, columns.name).to_string(),
        email: cell(values, columns.email).to_string(),
        phone: cell(values, columns.phone).to_string(),
        address: columns
            .address
            .map(|index| cell(values, Some(index)))
            .filter(|value| !value.is_empty())
            .map(str::to_string),
        extra,
    }
}

fn split_row(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(str::trim)
}

fn cell<'a>(values: &[&'a str], index: Option<usize>) -> &'a str {
    index
        .and_then(|index| values.get(index).copied())
        .unwrap_or("")
}

fn is_reserved_header(header: &str) -> bool {
    RESERVED_HEADER_TERMS
        .iter()
        .any(|term| header.contains(term))
}
