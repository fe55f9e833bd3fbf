/// Clean raw extracted page text before chunking:
/// - Newlines become a single space
/// - C0 controls (U+0000..=U+001F) are removed
/// - DEL and C1 controls (U+007F..=U+009F) are removed
///
/// Nothing else is touched: case, repeated spaces and Unicode forms are kept.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '\n' => Some(' '),
            c if is_invisible(c) => None,
            c => Some(c),
        })
        .collect()
}

/// Control characters that never carry visible content
fn is_invisible(c: char) -> bool {
    matches!(c as u32, 0x00..=0x1F | 0x7F..=0x9F)
}
