//! Row estimates for word-wrapped transcript lines.

use ratatui::text::Line;
use unicode_width::UnicodeWidthStr;

/// Rows `line` occupies when word-wrapped to `width` columns.
///
/// Words longer than the width are split across rows, like ratatui's
/// paragraph wrapping.
pub fn wrapped_rows(line: &Line<'_>, width: u16) -> u16 {
    let width = width as usize;
    if width == 0 {
        return 1;
    }

    let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
    let mut rows: usize = 1;
    let mut used: usize = 0;

    for word in text.split(' ') {
        let word_width = word.width();
        let needed = if used == 0 { word_width } else { used + 1 + word_width };
        if needed <= width {
            used = needed;
            continue;
        }
        if used > 0 {
            rows += 1;
        }
        if word_width > width {
            rows += (word_width - 1) / width;
            used = word_width - (word_width - 1) / width * width;
        } else {
            used = word_width;
        }
    }

    rows.min(u16::MAX as usize) as u16
}

/// Total wrapped rows for a block of lines.
pub fn wrapped_line_count(lines: &[Line<'_>], width: u16) -> u16 {
    lines
        .iter()
        .fold(0u16, |acc, line| acc.saturating_add(wrapped_rows(line, width)))
}

/// How far a transcript of `total_rows` can scroll in a viewport of
/// `visible_rows`.
pub fn max_scroll_offset(total_rows: u16, visible_rows: u16) -> u16 {
    total_rows.saturating_sub(visible_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_empty_lines_take_one_row() {
        assert_eq!(wrapped_rows(&Line::from("hello"), 10), 1);
        assert_eq!(wrapped_rows(&Line::default(), 10), 1);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(wrapped_rows(&Line::from("aaaa bbbb cccc"), 9), 2);
        assert_eq!(wrapped_rows(&Line::from("aaaa bbbb cccc"), 4), 3);
    }

    #[test]
    fn long_words_are_split() {
        assert_eq!(wrapped_rows(&Line::from("abcdefghij"), 4), 3);
        assert_eq!(wrapped_rows(&Line::from("ab abcdefgh"), 4), 3);
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(wrapped_rows(&Line::from("数学数学"), 4), 2);
    }

    #[test]
    fn totals_and_offsets() {
        let lines = vec![Line::from("one two"), Line::from("three")];
        assert_eq!(wrapped_line_count(&lines, 3), 4);
        assert_eq!(max_scroll_offset(3, 10), 0);
        assert_eq!(max_scroll_offset(30, 10), 20);
    }
}
