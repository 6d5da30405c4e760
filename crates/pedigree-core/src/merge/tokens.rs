//! Token containment for name text.
//!
//! Two name values are compared as sequences of normalized word pieces. A
//! sequence `a` prefix-contains `b` when `b` is no longer than `a` and each
//! `b[i]` is a prefix of `a[i]`, so `"Eliza J"` is contained in
//! `"Elizabeth Jane"` but not the other way round.

/// Split `text` into lower-cased word pieces. Punctuation separates words.
pub fn tokenize(text: &str) -> Vec<String> {
    words(text).map(str::to_lowercase).collect()
}

/// `true` when every token of `b` is a prefix of the token at the same
/// position in `a`.
pub fn prefix_contains(a: &[String], b: &[String]) -> bool {
    b.len() <= a.len() && a.iter().zip(b).all(|(long, short)| long.starts_with(short.as_str()))
}

/// Combine an existing value with an incoming one.
///
/// Keeps `existing` when it contains `incoming`, takes `incoming` when it
/// contains `existing`, and otherwise appends the incoming words that no
/// existing token already covers.
pub fn combine(existing: &str, incoming: &str) -> String {
    let have = tokenize(existing);
    let new = tokenize(incoming);

    if prefix_contains(&have, &new) {
        return existing.trim().to_string();
    }
    if prefix_contains(&new, &have) {
        return incoming.trim().to_string();
    }

    let mut out = existing.trim().to_string();
    for word in words(incoming) {
        let lower = word.to_lowercase();
        if have.iter().any(|t| t.starts_with(lower.as_str())) {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
}
