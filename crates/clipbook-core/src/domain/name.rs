/// Trims each component, drops the empty ones and joins the rest.
pub fn join_components<'a, I>(parts: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Name shown for a contact: the name with whitespace collapsed, or the email
/// when the name is blank.
pub fn display_name(name: &str, email: &str) -> String {
    let collapsed = join_components(name.split_whitespace(), " ");
    if collapsed.is_empty() {
        return email.trim().to_string();
    }
    collapsed
}
