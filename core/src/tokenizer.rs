use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ! ( ) - [ ] { } ; : ' " , < > . / ? @ # $ % ^ & * _ ~
    static ref PUNCTUATION: Regex = Regex::new(r#"[!()\-\[\]{};:'",<>./?@#$%^&*_~]"#).expect("valid regex");
}

fn strip(text: &str) -> String {
    PUNCTUATION.replace_all(text, "").to_lowercase()
}

/// Tokenize a course title: punctuation is deleted (not replaced by a space),
/// the rest is lowercased and split on whitespace.
pub fn tokenize(title: &str) -> Vec<String> {
    strip(title).split_whitespace().map(str::to_string).collect()
}

/// Normalize a single query word the same way titles are tokenized.
/// Returns `None` when nothing is left.
pub fn normalize_word(word: &str) -> Option<String> {
    let stripped = strip(word);
    let trimmed = stripped.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}
