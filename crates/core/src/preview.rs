//! Content preview / paywall truncation.
//!
//! Anonymous readers only see a prefix of an article. The cut prefers, in
//! order: a blank-line paragraph break, the end of a sentence, a word
//! boundary, and finally a hard cut. Offsets are counted in characters, so
//! multi-byte text is never split inside a code point.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Marker appended when the cut does not land on a sentence or paragraph end.
pub const ELLIPSIS: char = '\u{2026}';

/// Default character budget for the paywall preview.
pub const DEFAULT_PREVIEW_CHARS: usize = 1_200;

const PARAGRAPH_BREAK: &str = "\n\n";

const SENTENCE_ENDINGS: [&str; 3] = [". ", "! ", "? "];

/// Extended previews accept a paragraph break within target / 10 of the target.
const PARAGRAPH_TOLERANCE_DIVISOR: usize = 10;

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// A (possibly) truncated article body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub text: String,
    /// `true` when the text is shorter than the normalized original.
    pub truncated: bool,
}

impl Preview {
    fn full(text: String) -> Self {
        Self {
            text,
            truncated: false,
        }
    }

    fn cut(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            truncated: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Heading normalization
// ---------------------------------------------------------------------------

/// Demote top-level markdown headings (`# `) to `## `.
///
/// The article page already renders the title as the page heading, so body
/// text must never introduce a second one. Deeper headings are untouched.
pub fn normalize_headings(text: &str) -> String {
    text.split('\n')
        .map(|line| match line.strip_prefix("# ") {
            Some(rest) => format!("## {rest}"),
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Previews
// ---------------------------------------------------------------------------

/// Truncate `text` to at most `max_chars` characters on the best boundary.
///
/// Text that already fits is returned unchanged (after heading
/// normalization). Re-applying the function to its own output with the same
/// or a larger budget is a no-op.
///
/// # Examples
///
/// ```
/// use newsdesk_core::preview::content_preview;
///
/// let preview = content_preview("The quick brown fox jumps over the lazy dog", 20);
/// assert_eq!(preview.text, "The quick brown fox\u{2026}");
/// assert!(preview.truncated);
/// ```
pub fn content_preview(text: &str, max_chars: usize) -> Preview {
    let normalized = normalize_headings(text);
    let chars = CharIndex::new(&normalized);

    if chars.len() <= max_chars {
        return Preview::full(normalized);
    }

    let floor = max_chars / 2;
    let paragraph = chars
        .prefix(max_chars)
        .rmatch_indices(PARAGRAPH_BREAK)
        .map(|(byte, _)| chars.char_pos(byte))
        .find(|&pos| pos > 0 && pos >= floor);

    match paragraph {
        Some(pos) => Preview::cut(chars.prefix(pos).trim_end()),
        None => cut_without_paragraph(&chars, max_chars),
    }
}

/// Truncate `text` to roughly `percentage` percent of its length.
///
/// A paragraph break within 10% of the target (the closest one wins) is
/// preferred and may overrun the target; otherwise the same sentence, word
/// and hard-cut fallbacks as [`content_preview`] apply with the target as
/// the budget.
pub fn extended_preview(text: &str, percentage: u8) -> Preview {
    let normalized = normalize_headings(text);
    let chars = CharIndex::new(&normalized);

    let total = chars.len();
    let target = total * usize::from(percentage.min(100)) / 100;
    if target >= total {
        return Preview::full(normalized);
    }

    let tolerance = target / PARAGRAPH_TOLERANCE_DIVISOR;
    let window = (target - tolerance)..=(target + tolerance);

    let paragraph = normalized
        .match_indices(PARAGRAPH_BREAK)
        .map(|(byte, _)| chars.char_pos(byte))
        .filter(|pos| *pos > 0 && window.contains(pos))
        .min_by_key(|pos| pos.abs_diff(target));

    match paragraph {
        Some(pos) => Preview::cut(chars.prefix(pos).trim_end()),
        None => cut_without_paragraph(&chars, target),
    }
}

/// Sentence end, then word boundary plus ellipsis, then hard cut plus ellipsis.
fn cut_without_paragraph(chars: &CharIndex<'_>, budget: usize) -> Preview {
    // One extra character so a sentence ending exactly at the budget still
    // sees its trailing space.
    let lookahead = chars.prefix(budget + 1);
    let sentence_end = SENTENCE_ENDINGS
        .iter()
        .filter_map(|ending| lookahead.rfind(*ending))
        .max()
        .map(|byte| chars.char_pos(byte) + 1);

    if let Some(end) = sentence_end {
        return Preview::cut(chars.prefix(end));
    }

    let window = chars.prefix(budget);
    let word_end = window
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .last()
        .map(|(byte, _)| window[..byte].trim_end())
        .filter(|head| !head.is_empty());

    let head = word_end.unwrap_or_else(|| chars.prefix(budget.saturating_sub(1)));
    let mut text = String::with_capacity(head.len() + ELLIPSIS.len_utf8());
    text.push_str(head);
    text.push(ELLIPSIS);
    Preview::cut(text)
}

// ---------------------------------------------------------------------------
// Character offsets
// ---------------------------------------------------------------------------

/// Byte offset of every character, for character-based slicing.
struct CharIndex<'a> {
    text: &'a str,
    offsets: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            offsets: text.char_indices().map(|(byte, _)| byte).collect(),
        }
    }

    fn len(&self) -> usize {
        self.offsets.len()
    }

    /// The first `n` characters.
    fn prefix(&self, n: usize) -> &'a str {
        let end = self.offsets.get(n).copied().unwrap_or(self.text.len());
        &self.text[..end]
    }

    /// Character position of a byte offset that lies on a char boundary.
    fn char_pos(&self, byte: usize) -> usize {
        self.offsets.partition_point(|&b| b < byte)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
