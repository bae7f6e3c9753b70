/// Shortens `text` to at most `max_chars` characters, preferring to cut
/// after the last complete sentence.
///
/// Falls back to the last word boundary, and only cuts mid-word when the
/// first word alone is longer than the limit. Returns the kept text and
/// whether anything was removed.
pub fn truncate_at_sentence(text: &str, max_chars: usize) -> (String, bool) {
    let text = text.trim();
    let Some((limit, _)) = text.char_indices().nth(max_chars) else {
        return (text.to_string(), false);
    };
    let head = &text[..limit];

    let sentence_end = head
        .char_indices()
        .filter(|&(i, c)| {
            matches!(c, '.' | '!' | '?')
                && text[i + c.len_utf8()..]
                    .chars()
                    .next()
                    .map_or(true, char::is_whitespace)
        })
        .map(|(i, c)| i + c.len_utf8())
        .last();

    let kept = match sentence_end {
        Some(end) => &head[..end],
        None => match head.rfind(char::is_whitespace) {
            Some(space) if space > 0 => head[..space].trim_end_matches([',', ';', ':']),
            _ => head,
        },
    };

    (kept.trim_end().to_string(), true)
}
