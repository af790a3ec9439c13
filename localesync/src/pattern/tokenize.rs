use std::path::{MAIN_SEPARATOR_STR, is_separator};

/// Splits a pattern or a path into its segments.
/// Empty segments (repeated or leading separators) and "." are dropped, so
/// `./locales//en.yml` and `locales/en.yml` tokenize the same way.
pub fn tokenize(s: &str) -> Vec<String> {
    s.split(is_separator)
        .filter(|token| !token.is_empty() && *token != ".")
        .map(str::to_owned)
        .collect()
}

/// Joins segments back together with the platform separator.
pub fn join(tokens: &[String]) -> String {
    tokens.join(MAIN_SEPARATOR_STR)
}
