//! Display-width aware text helpers for the terminal panes

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate a string to fit within a maximum display width, adding "..." if truncated.
/// Uses unicode display width to handle multi-byte and wide characters correctly.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let ellipsis = "...";
    let ellipsis_width = UnicodeWidthStr::width(ellipsis);

    if max_width <= ellipsis_width {
        return s.chars().take(max_width).collect();
    }

    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }

    let target_width = max_width - ellipsis_width;
    let mut width = 0;
    let mut result = String::new();

    for c in s.chars() {
        let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + char_width > target_width {
            break;
        }
        result.push(c);
        width += char_width;
    }

    result.push_str(ellipsis);
    result
}

/// Word-wrap text to a display width. Explicit newlines are kept, and words
/// longer than the width are split.
pub fn wrap_to_width(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for word in raw_line.split_whitespace() {
            let word_width = UnicodeWidthStr::width(word);
            let gap = usize::from(current_width > 0);

            if current_width + gap + word_width <= max_width {
                if gap == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += gap + word_width;
                continue;
            }

            if current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            for c in word.chars() {
                let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
                if current_width + char_width > max_width && current_width > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(c);
                current_width += char_width;
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
