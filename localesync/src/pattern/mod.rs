//! Path patterns and the engine that maps between them and locale identity.
//!
//! A pattern such as `./config/<tag>/<locale_code>.yml` is used two ways:
//! as a glob to discover existing files (`glob_resolver` + `reducer`), and as a
//! template to generate paths for remote locales (`substitute`).

mod glob_resolver;
mod reducer;
mod substitute;
mod tokenize;

use std::fmt;
use std::path::is_separator;

use crate::error::PatternError;

pub use glob_resolver::{expand, to_glob};
pub use reducer::Reducer;
pub use substitute::{replace_placeholder_in_param, substitute};
pub use tokenize::{join, tokenize};

/// The filesystem wildcard a pattern may contain once.
pub const WILDCARD: &str = "*";

/// The fixed placeholder vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    LocaleName,
    LocaleCode,
    Tag,
}

impl Placeholder {
    /// In the order duplicates are reported.
    pub const ALL: [Placeholder; 3] = [
        Placeholder::LocaleName,
        Placeholder::LocaleCode,
        Placeholder::Tag,
    ];

    /// The literal token as written in a pattern.
    pub const fn token(self) -> &'static str {
        match self {
            Placeholder::LocaleName => "<locale_name>",
            Placeholder::LocaleCode => "<locale_code>",
            Placeholder::Tag => "<tag>",
        }
    }

    /// The token without its angle brackets, used as capture group name.
    pub const fn group_name(self) -> &'static str {
        match self {
            Placeholder::LocaleName => "locale_name",
            Placeholder::LocaleCode => "locale_code",
            Placeholder::Tag => "tag",
        }
    }

    pub fn from_group_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.group_name() == name)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Checks a raw pattern before anything touches the filesystem or network.
///
/// `expected_extension` is the well-known extension of the configured file
/// format, if any; a literal mismatch is only warned about.
pub fn validate(pattern: &str, expected_extension: Option<&str>) -> Result<(), PatternError> {
    let extension = extension_of(pattern)?;
    if let Some(expected) = expected_extension {
        if !contains_placeholder(&extension) && extension != expected {
            log::warn!(
                "Pattern {:?} has extension {:?} but the file format expects {:?}",
                pattern,
                extension,
                expected
            );
        }
    }

    let mut duplicates: Vec<String> = Placeholder::ALL
        .into_iter()
        .filter(|p| pattern.matches(p.token()).count() > 1)
        .map(|p| p.token().to_string())
        .collect();
    if pattern.matches(WILDCARD).count() > 1 {
        duplicates.push(WILDCARD.to_string());
    }
    if !duplicates.is_empty() {
        return Err(PatternError::Duplicates { tokens: duplicates });
    }

    Ok(())
}

/// The single extension a pattern resolves to, taken from its last segment.
fn extension_of(pattern: &str) -> Result<String, PatternError> {
    if pattern.trim().is_empty() {
        return Err(PatternError::Empty);
    }
    let extension = tokenize(pattern)
        .last()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext.to_string())
        .unwrap_or_default();
    if extension.is_empty() {
        return Err(PatternError::MissingExtension {
            pattern: pattern.to_string(),
        });
    }
    if extension.contains(WILDCARD) {
        return Err(PatternError::AmbiguousExtension {
            pattern: pattern.to_string(),
            extension,
        });
    }
    Ok(extension)
}

fn contains_placeholder(s: &str) -> bool {
    Placeholder::ALL.iter().any(|p| s.contains(p.token()))
}

/// A pattern that passed [`validate`].
///
/// Reduction and substitution only accept this type, so they never see a
/// pattern with duplicated placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    extension: String,
}

impl Pattern {
    /// Validates a pattern used to discover local files (push sources).
    pub fn parse(raw: impl Into<String>, expected_extension: Option<&str>) -> Result<Self, PatternError> {
        let raw = raw.into();
        validate(&raw, expected_extension)?;
        let extension = extension_of(&raw)?;
        Ok(Self { raw, extension })
    }

    /// Validates a pattern used to generate paths (pull targets), which
    /// additionally may not contain the wildcard.
    pub fn parse_target(
        raw: impl Into<String>,
        expected_extension: Option<&str>,
    ) -> Result<Self, PatternError> {
        let raw = raw.into();
        if raw.contains(WILDCARD) {
            return Err(PatternError::WildcardInTarget { pattern: raw });
        }
        Self::parse(raw, expected_extension)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn tokens(&self) -> Vec<String> {
        tokenize(&self.raw)
    }

    pub fn contains(&self, placeholder: Placeholder) -> bool {
        self.raw.contains(placeholder.token())
    }

    /// Whether the pattern can fan out over several locales.
    pub fn contains_locale_placeholder(&self) -> bool {
        self.contains(Placeholder::LocaleCode) || self.contains(Placeholder::LocaleName)
    }

    /// Whether the pattern starts at the filesystem root. Tokenizing drops
    /// the leading separator, so globs have to put it back.
    pub fn is_rooted(&self) -> bool {
        self.raw.starts_with(is_separator)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
