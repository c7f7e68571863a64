/// One-line preview: whitespace runs collapse to single spaces, and text
/// longer than `max_chars` is cut with a trailing `...`.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", flat[..idx].trim_end()),
        None => flat,
    }
}
