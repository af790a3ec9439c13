use std::collections::HashMap;
use std::path::is_separator;

use regex::Regex;

use super::{Pattern, Placeholder, WILDCARD};
use crate::error::PatternError;
use crate::locale::LocaleFile;

/// Extracts locale attributes from paths matched by a pattern.
///
/// Each pattern segment holding a placeholder is compiled once into an
/// anchored expression with one named group per placeholder. Segments
/// without placeholders are left out: the glob already matched them.
#[derive(Debug, Clone)]
pub struct Reducer {
    tokens: Vec<String>,
    segments: Vec<Option<Regex>>,
}

impl Reducer {
    pub fn new(pattern: &Pattern) -> Result<Self, PatternError> {
        let tokens = pattern.tokens();
        let segments = tokens
            .iter()
            .map(|token| {
                segment_expression(token)
                    .map(|expression| {
                        Regex::new(&expression)
                            .map_err(|source| PatternError::Regex { expression, source })
                    })
                    .transpose()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tokens, segments })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Reduces a tokenized path to the attributes its placeholders captured.
    ///
    /// The path must have exactly as many segments as the pattern. A segment
    /// that does not match its expression contributes nothing.
    pub fn reduce(&self, path_tokens: &[String]) -> Result<LocaleFile, PatternError> {
        if path_tokens.len() != self.tokens.len() {
            return Err(PatternError::SegmentCountMismatch {
                expected: self.tokens.len(),
                actual: path_tokens.len(),
            });
        }

        let mut tagged = self.tag(path_tokens);
        Ok(LocaleFile {
            name: tagged.remove(&Placeholder::LocaleName).unwrap_or_default(),
            code: tagged.remove(&Placeholder::LocaleCode).unwrap_or_default(),
            tag: tagged.remove(&Placeholder::Tag).unwrap_or_default(),
            ..LocaleFile::default()
        })
    }

    fn tag(&self, path_tokens: &[String]) -> HashMap<Placeholder, String> {
        let mut tagged = HashMap::new();

        for (idx, regex) in self.segments.iter().enumerate() {
            let Some(regex) = regex else { continue };
            let segment = &path_tokens[idx];

            let Some(captures) = regex.captures(segment) else {
                log::debug!(
                    "Segment {:?} does not match {:?} from pattern segment {:?}",
                    segment,
                    regex.as_str(),
                    self.tokens[idx]
                );
                continue;
            };

            for name in regex.capture_names().flatten() {
                let Some(placeholder) = Placeholder::from_group_name(name) else {
                    continue;
                };
                if let Some(value) = captures.name(name) {
                    let value = value.as_str().trim_matches(is_separator);
                    if !value.is_empty() {
                        tagged.insert(placeholder, value.to_string());
                    }
                }
            }
        }

        tagged
    }
}

/// Builds the anchored expression for one pattern segment, or `None` when
/// the segment holds no placeholder.
fn segment_expression(segment: &str) -> Option<String> {
    let mut rest = segment;
    let mut expression = String::from("^");
    let mut found = false;

    while let Some((index, placeholder)) = next_placeholder(rest) {
        expression.push_str(&escape_literal(&rest[..index]));
        expression.push_str(&format!("(?P<{}>.+)", placeholder.group_name()));
        rest = &rest[index + placeholder.token().len()..];
        found = true;
    }
    if !found {
        return None;
    }

    expression.push_str(&escape_literal(rest));
    expression.push('$');
    Some(expression)
}

fn next_placeholder(s: &str) -> Option<(usize, Placeholder)> {
    Placeholder::ALL
        .into_iter()
        .filter_map(|p| s.find(p.token()).map(|index| (index, p)))
        .min_by_key(|(index, _)| *index)
}

/// Literal text matches itself, except the wildcard which matches anything.
fn escape_literal(s: &str) -> String {
    s.split(WILDCARD)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*")
}
