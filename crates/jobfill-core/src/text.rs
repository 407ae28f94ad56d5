//! Text normalization and word-boundary matching.

pub use jobfill_protocols::field::normalize_label as normalize;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

fn boundary_before(haystack: &str, start: usize) -> bool {
    haystack[..start].chars().next_back().is_none_or(|c| !is_word_char(c))
}

fn boundary_after(haystack: &str, end: usize) -> bool {
    haystack[end..].chars().next().is_none_or(|c| !is_word_char(c))
}

/// `needle` occurs in `haystack` delimited by non-alphanumeric characters or
/// the string ends. Both sides are expected to be normalized already.
pub fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack
        .match_indices(needle)
        .any(|(start, m)| boundary_before(haystack, start) && boundary_after(haystack, start + m.len()))
}

/// `prefix` starts `whole` and ends on a word boundary. Equal strings do not count.
pub fn is_word_prefix(whole: &str, prefix: &str) -> bool {
    !prefix.is_empty()
        && whole.len() > prefix.len()
        && whole.starts_with(prefix)
        && boundary_after(whole, prefix.len())
}

/// Distinct alphanumeric tokens longer than two characters.
pub fn tokens(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in text.split(|c: char| !is_word_char(c)) {
        if token.chars().count() > 2 && !out.iter().any(|t| t == token) {
            out.push(token.to_string());
        }
    }
    out
}

/// Normalized `text` contains any keyword as a whole-word phrase.
pub fn matches_any_keyword(text: &str, keywords: &[&str]) -> bool {
    let text = normalize(text);
    keywords
        .iter()
        .any(|k| contains_whole_word(&text, &normalize(k)))
}

/// Strip required markers and collapse whitespace.
pub fn clean_label(raw: &str) -> String {
    raw.replace('*', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
