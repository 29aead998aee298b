use icu_normalizer::ComposingNormalizerBorrowed;

/// Rewrite Hispanic-style spellings into the standard alphabet:
/// `c` → `k` unless part of `ch`, and `qu` → `q`.
pub fn normalize_spelling(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();
        match (ch, next) {
            ('c', Some('h')) | ('C', Some('h')) => out.push(ch),
            ('c', _) => out.push('k'),
            ('C', _) => out.push('K'),
            ('q', Some('u')) | ('Q', Some('u')) => {
                out.push(ch);
                i += 1;
            }
            _ => out.push(ch),
        }
        i += 1;
    }
    out
}

pub fn nfc(text: &str) -> String {
    ComposingNormalizerBorrowed::new_nfc()
        .normalize(text)
        .into_owned()
}

/// Canonical form used for comparing learner input and for search.
pub fn fold(text: &str) -> String {
    normalize_spelling(&nfc(text.trim()).to_lowercase())
}

pub fn answers_match(expected: &str, given: &str) -> bool {
    let given = fold(given);
    !given.is_empty() && fold(expected) == given
}
