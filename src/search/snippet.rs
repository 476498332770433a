//! Context snippets around the first match in a document.

/// Characters of context kept before the match.
pub const CONTEXT_BEFORE: usize = 100;

/// Characters of context kept from the match onwards.
pub const CONTEXT_AFTER: usize = 200;

/// Upper bound on snippet length, truncation marker included.
pub const MAX_SNIPPET_CHARS: usize = 300;

/// Appended to text that was cut short.
pub const TRUNCATION_MARKER: &str = "...";

/// Extract a newline-free excerpt of `content` around the first occurrence of
/// `needle` in `content_lower`.
///
/// `content_lower` must be `content.to_lowercase()`. Positions are counted in
/// characters of `content`, so multi-byte text never splits mid-character. When
/// `needle` does not occur, the excerpt starts at the beginning of the document.
#[must_use]
pub fn extract(content: &str, content_lower: &str, needle: &str) -> String {
    let chars: Vec<char> = content.chars().collect();

    let anchor = content_lower
        .find(needle)
        .map(|byte| original_index(&chars, content_lower[..byte].chars().count()));

    let (start, end) = match anchor {
        Some(i) => (i.saturating_sub(CONTEXT_BEFORE), i + CONTEXT_AFTER),
        None => (0, CONTEXT_AFTER),
    };
    let end = end.min(chars.len());
    let start = start.min(end);

    let window: String = chars[start..end]
        .iter()
        .map(|&c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    let window = window.trim();
    match truncate_chars(window, MAX_SNIPPET_CHARS - TRUNCATION_MARKER.len()) {
        Some(head) if window.chars().count() > MAX_SNIPPET_CHARS => {
            format!("{head}{TRUNCATION_MARKER}")
        }
        _ => window.to_string(),
    }
}

/// Map a character index in the lowercased text back to the original character
/// it was produced from.
///
/// Some characters lowercase to several (`İ` becomes `i` plus a combining dot),
/// so the two texts can differ in length.
fn original_index(chars: &[char], lowered: usize) -> usize {
    let mut seen = 0;
    for (i, c) in chars.iter().enumerate() {
        let width = c.to_lowercase().count();
        if seen + width > lowered {
            return i;
        }
        seen += width;
    }
    chars.len()
}

/// Return the first `max` characters of `text`, or `None` if it is not longer.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> Option<&str> {
    text.char_indices().nth(max).map(|(byte, _)| &text[..byte])
}
