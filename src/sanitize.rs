//! Text sanitization ahead of frequency-based layout
//!
//! Raw request text arrives with arbitrary punctuation and short filler
//! tokens that would pollute the frequency counts. The sanitizer strips
//! ASCII punctuation, except that brackets and parentheses become spaces so
//! that `a(b)c` splits into separate words instead of fusing into `abc`.

/// Characters that turn into a space rather than disappearing.
const SEPARATOR_PUNCTUATION: &[char] = &['[', ']', '{', '}', '(', ')'];

/// Minimum surviving token length, exclusive.
const MIN_TOKEN_LEN: usize = 2;

/// Clean raw text into a whitespace-joined token stream.
///
/// Punctuation is removed, bracket characters become word separators, and
/// tokens of 2 characters or fewer are dropped. The operation is pure and
/// idempotent: sanitizing already-sanitized text returns it unchanged.
pub fn sanitize(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for ch in text.chars() {
        if SEPARATOR_PUNCTUATION.contains(&ch) {
            cleaned.push(' ');
        } else if !ch.is_ascii_punctuation() {
            cleaned.push(ch);
        }
    }

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_LEN)
        .collect::<Vec<_>>()
        .join(" ")
}
