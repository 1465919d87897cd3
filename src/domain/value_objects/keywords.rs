/// Search tokens derived from an item's text attributes: lower-cased,
/// apostrophes stripped, split on runs of non-word characters, singularized,
/// de-duplicated in first-seen order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| *c != '\'' && *c != '\u{2019}')
        .collect();

    let mut keywords: Vec<String> = Vec::new();
    for token in lowered.split(|c: char| !c.is_ascii_alphanumeric() && c != '_') {
        if token.is_empty() {
            continue;
        }
        let singular = singularize(token);
        if !keywords.iter().any(|k| *k == singular) {
            keywords.push(singular);
        }
    }
    keywords
}

/// Plural-to-singular rule for English tokens. Intentionally small: the
/// corpus is short category/style words, not prose.
pub fn singularize(word: &str) -> String {
    if word.len() > 4 && word.ends_with("ies") {
        let stem = &word[..word.len() - 3];
        return format!("{stem}y");
    }
    for suffix in ["sses", "shes", "ches", "xes"] {
        if word.len() > suffix.len() && word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.len() > 1 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}
