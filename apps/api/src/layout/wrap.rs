//! Greedy text wrapping inside a fixed cell width.
//!
//! Same greedy word-fill as a line simulator: words are appended while they fit and
//! a new line starts when the next word would overflow. A word that is wider than
//! the cell on its own is broken between characters, which also covers scripts
//! written without spaces. Embedded newlines always start a new line.

use crate::layout::font_metrics::TextStyle;

/// A cell's text after wrapping. Built once per cell and drawn once.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedCell {
    pub lines: Vec<String>,
}

impl WrappedCell {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Height of the text block at `style`'s leading.
    pub fn text_height(&self, style: &TextStyle) -> f32 {
        self.line_count() as f32 * style.leading_pt
    }
}

/// Wraps `text` to lines no wider than `max_width` points (single characters excepted).
///
/// Always yields at least one line; an empty cell is one empty line.
pub fn wrap_text(text: &str, max_width: f32, style: &TextStyle) -> WrappedCell {
    let space_width = style.width_of(" ");
    let mut lines: Vec<String> = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let mut line = String::new();
        let mut line_width = 0.0_f32;

        for word in paragraph.split_whitespace() {
            let word_width = style.width_of(word);

            if !line.is_empty() && line_width + space_width + word_width <= max_width {
                line.push(' ');
                line.push_str(word);
                line_width += space_width + word_width;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0.0;
            }

            if word_width <= max_width {
                line.push_str(word);
                line_width = word_width;
            } else {
                // Break the oversized word; its tail stays open for following words.
                for c in word.chars() {
                    let char_width = style.width_of(c.encode_utf8(&mut [0; 4]));
                    if !line.is_empty() && line_width + char_width > max_width {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0.0;
                    }
                    line.push(c);
                    line_width += char_width;
                }
            }
        }

        lines.push(line);
    }

    WrappedCell { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{BODY_STYLE, HEADER_STYLE};

    #[test]
    fn test_empty_text_is_one_empty_line() {
        let cell = wrap_text("", 100.0, &BODY_STYLE);
        assert_eq!(cell.lines, vec![String::new()]);
    }

    #[test]
    fn test_short_text_stays_on_one_line() {
        let cell = wrap_text("hello world", 100.0, &BODY_STYLE);
        assert_eq!(cell.lines, vec!["hello world"]);
    }

    #[test]
    fn test_words_wrap_at_width() {
        // "abcd" = 15.176pt at 7pt; two words + space = 32.298pt
        let cell = wrap_text("abcd abcd abcd abcd", 33.0, &BODY_STYLE);
        assert_eq!(cell.lines, vec!["abcd abcd", "abcd abcd"]);
    }

    #[test]
    fn test_no_line_exceeds_width() {
        let text = "The quick brown fox jumps over the lazy dog ".repeat(20);
        let cell = wrap_text(&text, 60.0, &BODY_STYLE);
        assert!(cell.line_count() > 1);
        for line in &cell.lines {
            assert!(BODY_STYLE.width_of(line) <= 60.0 + 1e-3, "{line:?} overflows");
        }
    }

    #[test]
    fn test_oversized_word_breaks_between_characters() {
        let word = "x".repeat(100); // 350pt at 7pt
        let cell = wrap_text(&word, 35.0, &BODY_STYLE);
        assert_eq!(cell.lines.concat(), word);
        assert!(cell.lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(cell.line_count(), 10);
    }

    #[test]
    fn test_unspaced_wide_characters_wrap() {
        let text = "漢字漢字漢字漢字漢字漢字";
        let cell = wrap_text(text, 20.0, &BODY_STYLE);
        assert!(cell.line_count() > 1);
        assert_eq!(cell.lines.concat(), text);
    }

    #[test]
    fn test_newlines_force_breaks() {
        let cell = wrap_text("first\r\nsecond\n\nfourth", 500.0, &HEADER_STYLE);
        assert_eq!(cell.lines, vec!["first", "second", "", "fourth"]);
    }

    #[test]
    fn test_text_height_uses_leading() {
        let cell = wrap_text("a\nb\nc", 100.0, &BODY_STYLE);
        assert_eq!(cell.text_height(&BODY_STYLE), 27.0);
    }
}
