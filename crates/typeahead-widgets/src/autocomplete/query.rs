//! Query derivation and token substitution.
//!
//! With a delimiter configured, only the trailing token of the field text is
//! searched, and committing a suggestion replaces only that token.

use regex::Regex;

/// Separator between tokens in a multi-value field, e.g. `","` for a
/// comma-separated tag list.
#[derive(Debug, Clone)]
pub enum Delimiter {
    /// A literal separator string.
    Literal(String),
    /// A regular expression; its last match splits the text.
    Pattern(Regex),
}

impl Delimiter {
    /// A literal delimiter.
    pub fn literal(s: impl Into<String>) -> Self {
        Delimiter::Literal(s.into())
    }

    /// A pattern delimiter.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Delimiter::Pattern)
    }

    /// Byte span of the last occurrence in `text`. Empty matches never count.
    fn last_match(&self, text: &str) -> Option<(usize, usize)> {
        match self {
            Delimiter::Literal(lit) if lit.is_empty() => None,
            Delimiter::Literal(lit) => text.rfind(lit.as_str()).map(|at| (at, at + lit.len())),
            Delimiter::Pattern(re) => re
                .find_iter(text)
                .filter(|m| !m.is_empty())
                .last()
                .map(|m| (m.start(), m.end())),
        }
    }
}

impl PartialEq for Delimiter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Delimiter::Literal(a), Delimiter::Literal(b)) => a == b,
            (Delimiter::Pattern(a), Delimiter::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// The effective search query for `text`.
///
/// When the delimiter occurs, this is the segment after its last occurrence,
/// trimmed. Otherwise it is the whole text, untouched.
pub fn derive_query(text: &str, delimiter: Option<&Delimiter>) -> String {
    match delimiter.and_then(|d| d.last_match(text)) {
        Some((_, end)) => text[end..].trim().to_string(),
        None => text.to_string(),
    }
}

/// Replace the trailing token of `current` with `value`.
///
/// Everything up to and including the last delimiter is kept, along with any
/// whitespace that followed it, so `"red, gr"` becomes `"red, green"`.
pub fn substitute_token(current: &str, delimiter: Option<&Delimiter>, value: &str) -> String {
    match delimiter.and_then(|d| d.last_match(current)) {
        Some((_, end)) => {
            let tail = &current[end..];
            let gap = tail.len() - tail.trim_start().len();
            let mut out = String::with_capacity(end + gap + value.len());
            out.push_str(&current[..end + gap]);
            out.push_str(value);
            out
        }
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_delimiter_returns_whole_text() {
        assert_eq!(derive_query("  new york ", None), "  new york ");
    }

    #[test]
    fn absent_delimiter_returns_whole_text() {
        let comma = Delimiter::literal(",");
        assert_eq!(derive_query("apple", Some(&comma)), "apple");
    }

    #[test]
    fn trailing_token_is_trimmed() {
        let comma = Delimiter::literal(",");
        assert_eq!(derive_query("red, green,  bl ", Some(&comma)), "bl");
        assert_eq!(derive_query("red,", Some(&comma)), "");
    }

    #[test]
    fn pattern_uses_last_match() {
        let sep = Delimiter::pattern(r"[;,]\s*").unwrap();
        assert_eq!(derive_query("a; b, cher", Some(&sep)), "cher");
    }

    #[test]
    fn empty_literal_is_ignored() {
        let empty = Delimiter::literal("");
        assert_eq!(derive_query("abc", Some(&empty)), "abc");
    }

    #[test]
    fn derivation_is_idempotent() {
        let comma = Delimiter::literal(",");
        let semi = Delimiter::pattern(";+").unwrap();
        for text in ["", "abc", "a,b", " x , y ", "a;;b;c ", ",,,", "tail,"] {
            for delim in [None, Some(&comma), Some(&semi)] {
                let once = derive_query(text, delim);
                assert_eq!(derive_query(&once, delim), once, "{text:?} / {delim:?}");
            }
        }
    }

    #[test]
    fn substitution_keeps_prefix_and_spacing() {
        let comma = Delimiter::literal(",");
        assert_eq!(substitute_token("red, gr", Some(&comma), "green"), "red, green");
        assert_eq!(substitute_token("red,gr", Some(&comma), "green"), "red,green");
    }

    #[test]
    fn substitution_without_match_replaces_everything() {
        let comma = Delimiter::literal(",");
        assert_eq!(substitute_token("gr", Some(&comma), "green"), "green");
        assert_eq!(substitute_token("a, gr", None, "green"), "green");
    }

    #[test]
    fn substituted_value_derives_to_the_suggestion() {
        let comma = Delimiter::literal(",");
        let committed = substitute_token("red,  gr", Some(&comma), "green");
        assert_eq!(derive_query(&committed, Some(&comma)), "green");
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let arrow = Delimiter::literal("→");
        assert_eq!(derive_query("café → thé", Some(&arrow)), "thé");
        assert_eq!(substitute_token("café → t", Some(&arrow), "thé"), "café → thé");
    }
}
