use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Punctuation and control whitespace that the index builder never keeps inside a term.
    static ref SEPARATORS: Regex = Regex::new(r#"[\t\r\n"'.,:;!&/\\?%@`\[\]{}()+\-=<>|*^~#$]"#).expect("valid regex");
}

/// A raw input value after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Nothing left after trimming; the result area is cleared.
    Empty,
    Single(String),
    /// Two or more space-separated terms. Interior runs of spaces leave empty
    /// terms in place; those never match a bucket.
    Multi(Vec<String>),
}

impl Query {
    pub fn is_empty(&self) -> bool { matches!(self, Query::Empty) }
}

/// Replace separator characters with spaces, trim plain spaces at both ends,
/// then split on single spaces.
pub fn normalize(raw: &str) -> Query {
    let replaced = SEPARATORS.replace_all(raw, " ");
    let trimmed = replaced.trim_matches(' ');
    if trimmed.is_empty() {
        return Query::Empty;
    }
    let terms: Vec<&str> = trimmed.split(' ').collect();
    if terms.len() > 1 {
        Query::Multi(terms.into_iter().map(str::to_string).collect())
    } else {
        Query::Single(trimmed.to_string())
    }
}
