/// Keeps digits and `+ - ( )`; everything else is dropped.
pub fn sanitize_phone(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-' | '(' | ')'))
        .collect()
}
