//! Text helpers shared by the formatting code.

/// Return the prefix of `s` holding at most `max_chars` characters.
///
/// Counts Unicode scalar values and never splits one, so it is safe on
/// arbitrary remote text.
#[must_use]
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
