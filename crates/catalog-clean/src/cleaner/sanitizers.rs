//! Text sanitization for free-text and URL cells.

use crate::config::TextOptions;
use crate::utils::is_missing_token;

/// Sanitize a raw text cell.
///
/// Trims the value, drops control characters, and collapses runs of
/// whitespace to one space. With `strip_non_ascii` every character outside
/// printable ASCII is removed as well. Returns `None` for empty results and
/// stringified missing values.
pub(crate) fn sanitize_text(value: &str, options: &TextOptions) -> Option<String> {
    let mut cleaned = String::with_capacity(value.len());
    let mut pending_space = false;

    for c in value.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c.is_control() || (options.strip_non_ascii && !is_printable_ascii(c)) {
            continue;
        }
        if pending_space && !cleaned.is_empty() {
            cleaned.push(' ');
        }
        pending_space = false;
        cleaned.push(c);
    }

    if cleaned.is_empty() || is_missing_token(&cleaned) {
        None
    } else {
        Some(cleaned)
    }
}

fn is_printable_ascii(c: char) -> bool {
    ('\x20'..='\x7e').contains(&c)
}
