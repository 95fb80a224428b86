/// Terminal columns taken by one character; CJK and fullwidth forms take 2.
pub fn char_width(c: char) -> usize {
    match c {
        '\u{1100}'..='\u{115F}' // Hangul Jamo
        | '\u{2E80}'..='\u{303F}' // CJK radicals, symbols and punctuation
        | '\u{3040}'..='\u{33FF}' // Kana, Bopomofo, enclosed CJK, compatibility
        | '\u{3400}'..='\u{4DBF}' // CJK Unified Ideographs Extension A
        | '\u{4E00}'..='\u{9FFF}' // CJK Unified Ideographs
        | '\u{A000}'..='\u{A4CF}' // Yi
        | '\u{AC00}'..='\u{D7AF}' // Hangul Syllables
        | '\u{F900}'..='\u{FAFF}' // CJK Compatibility Ideographs
        | '\u{FE10}'..='\u{FE19}' // Vertical Forms
        | '\u{FE30}'..='\u{FE6F}' // CJK Compatibility Forms, Small Form Variants
        | '\u{FF00}'..='\u{FFEF}' // Halfwidth and Fullwidth Forms
        | '\u{1F300}'..='\u{1FAFF}' // Emoji
        | '\u{20000}'..='\u{2EBEF}' => 2, // CJK Extensions B-F
        _ => 1,
    }
}

/// Calculate the display width of a string, accounting for wide characters
pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Wrap a string into lines with a given maximum display width.
pub fn wrap_text(text: &str, max_line_len: usize) -> Vec<String> {
    let max_line_len = max_line_len.max(1);
    let mut lines = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if display_width(remaining) <= max_line_len {
            lines.push(remaining.to_string());
            break;
        }

        // Last space that still fits, and the byte offset where the width runs out
        let mut break_pos = None;
        let mut char_end = 0;
        let mut current_width = 0;
        for (pos, ch) in remaining.char_indices() {
            let width = char_width(ch);
            if current_width + width > max_line_len {
                break;
            }
            if ch == ' ' && pos > 0 {
                break_pos = Some(pos);
            }
            char_end = pos + ch.len_utf8();
            current_width += width;
        }

        match break_pos {
            Some(pos) => {
                lines.push(remaining[..pos].to_string());
                remaining = remaining[pos + 1..].trim_start();
            }
            None => {
                // A single character wider than the line still has to go somewhere
                let end = if char_end == 0 {
                    remaining.chars().next().map_or(remaining.len(), char::len_utf8)
                } else {
                    char_end
                };
                lines.push(remaining[..end].to_string());
                remaining = &remaining[end..];
            }
        }
    }
    lines
}

/// Masks all but the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn wraps_at_spaces() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            ["the quick", "brown fox"]
        );
    }

    #[test]
    fn breaks_long_words() {
        assert_eq!(wrap_text("abcdefghij", 4), ["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("日本語", 4), ["日本", "語"]);
    }

    #[test]
    fn masks_all_but_tail() {
        assert_eq!(mask_secret("AIzaSyABCDEF1234"), "************1234");
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret(""), "");
    }
}
