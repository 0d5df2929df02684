/// Largest lookback, in characters, when searching for a clean cut point.
const MAX_LOOKBACK: usize = 400;

/// Truncates `text` to at most `max_chars` characters.
///
/// Within a lookback window at the end of the kept prefix the cut prefers, in
/// order: a paragraph break, a sentence end, a word boundary. Only when none
/// exists is the text cut mid-word.
#[must_use]
pub fn truncate_at_boundary(text: &str, max_chars: usize) -> String {
    let Some((cut_byte, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let prefix = &text[..cut_byte];
    let window_chars = (max_chars / 5).min(MAX_LOOKBACK);
    let window_start = prefix
        .char_indices()
        .rev()
        .nth(window_chars.saturating_sub(1))
        .map_or(0, |(i, _)| i);
    let window = &prefix[window_start..];

    let cut = paragraph_break(window)
        .or_else(|| sentence_end(window))
        .or_else(|| word_boundary(window))
        .map_or(prefix.len(), |offset| window_start + offset);

    prefix[..cut].trim_end().to_string()
}

fn paragraph_break(window: &str) -> Option<usize> {
    window.rfind("\n\n").filter(|&i| i > 0)
}

/// Byte offset just after the last sentence-ending punctuation that is
/// followed by whitespace (or ends the window).
fn sentence_end(window: &str) -> Option<usize> {
    let mut chars = window.char_indices().peekable();
    let mut last = None;
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let next_is_break = chars.peek().is_none_or(|(_, n)| n.is_whitespace());
            if next_is_break {
                last = Some(i + c.len_utf8());
            }
        }
    }
    last
}

fn word_boundary(window: &str) -> Option<usize> {
    window.rfind(char::is_whitespace).filter(|&i| i > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_at_boundary("short text", 100), "short text");
    }

    #[test]
    fn exact_length_is_untouched() {
        assert_eq!(truncate_at_boundary("abcde", 5), "abcde");
    }

    #[test]
    fn cuts_at_paragraph_break_inside_window() {
        let text = format!("{}\n\n{}", "a".repeat(90), "b".repeat(50));
        let out = truncate_at_boundary(&text, 100);
        assert_eq!(out, "a".repeat(90));
    }

    #[test]
    fn cuts_after_sentence_when_no_paragraph_break() {
        let text = format!("{}. Next sentence goes on and on", "a".repeat(85));
        let out = truncate_at_boundary(&text, 100);
        assert_eq!(out, format!("{}.", "a".repeat(85)));
    }

    #[test]
    fn falls_back_to_word_boundary() {
        let text = format!("{} {}", "a".repeat(95), "b".repeat(20));
        let out = truncate_at_boundary(&text, 100);
        assert_eq!(out, "a".repeat(95));
    }

    #[test]
    fn hard_cut_when_no_boundary_in_window() {
        let text = "x".repeat(150);
        let out = truncate_at_boundary(&text, 100);
        assert_eq!(out.chars().count(), 100);
    }

    #[test]
    fn boundary_outside_window_is_ignored() {
        // The only sentence end sits 60 chars before the cut; the window is 20.
        let text = format!("{}. {}", "a".repeat(40), "b".repeat(100));
        let out = truncate_at_boundary(&text, 100);
        assert_eq!(out.chars().count(), 100);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "é".repeat(30);
        let out = truncate_at_boundary(&text, 10);
        assert_eq!(out.chars().count(), 10);
    }
}
