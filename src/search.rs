use crate::catalogue::Catalogue;
use crate::models::QuestionRecord;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Lowercases and strips accents (NFD, combining marks dropped).
pub fn normalize(s: &str) -> String {
    s.nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalized search words; runs of whitespace separate them.
pub fn tokens(query: &str) -> Vec<String> {
    normalize(query)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// True when every token occurs in `normalized_text`.
pub fn contains_all(normalized_text: &str, tokens: &[String]) -> bool {
    tokens.iter().all(|t| normalized_text.contains(t.as_str()))
}

/// Questions whose text contains every query word, minus `excluded`.
///
/// Results keep catalogue order. An empty query matches everything.
pub fn search<'a>(
    query: &str,
    catalogue: &'a Catalogue,
    excluded: &HashSet<usize>,
) -> Vec<&'a QuestionRecord> {
    let tokens = tokens(query);

    catalogue
        .iter()
        .filter(|q| !excluded.contains(&q.identifier))
        .filter(|q| tokens.is_empty() || contains_all(&normalize(&q.text), &tokens))
        .collect()
}
