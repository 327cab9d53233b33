//! Text helpers for article summaries.

use super::types::CONTINUATION_MARKER;

/// Caps `text` at `max_words` whitespace-separated words.
///
/// Text at or under the cap comes back verbatim with `false`. Longer text is
/// cut after the last allowed word, keeping its original spacing, and gets
/// the continuation marker appended.
pub fn truncate_words(text: &str, max_words: usize) -> (String, bool) {
    let mut words = 0;
    let mut in_word = false;
    let mut cut = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if in_word && words == max_words {
                cut.get_or_insert(idx);
            }
            in_word = false;
        } else if !in_word {
            in_word = true;
            words += 1;
            if words > max_words {
                let end = cut.unwrap_or(idx);
                return (
                    format!("{}{}", text[..end].trim_end(), CONTINUATION_MARKER),
                    true,
                );
            }
        }
    }

    (text.to_string(), false)
}

/// Substitutes the language code into an API URL template.
pub fn api_url(template: &str, lang: &str) -> String {
    template.replace("{lang}", lang)
}
