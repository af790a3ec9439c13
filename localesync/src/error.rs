use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the pattern engine.
///
/// Everything here is an expected condition and is returned, never raised.
/// Drivers wrap these into `anyhow::Error` when they bubble further up.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("file patterns may not be empty")]
    Empty,

    #[error("{pattern:?} has no file extension")]
    MissingExtension { pattern: String },

    #[error("{pattern:?} has an ambiguous file extension {extension:?}")]
    AmbiguousExtension { pattern: String, extension: String },

    /// Every placeholder (and the wildcard) that occurs more than once.
    #[error("{} can only occur once in a file pattern!", .tokens.join(", "))]
    Duplicates { tokens: Vec<String> },

    #[error(
        "file pattern {pattern:?} for pull cannot include any '*', specify direct paths with a file name"
    )]
    WildcardInTarget { pattern: String },

    #[error("could not find any files on your system that match: '{}'", .pattern.display())]
    NoFilesMatched { pattern: PathBuf },

    #[error("path has {actual} segments but the pattern has {expected}")]
    SegmentCountMismatch { expected: usize, actual: usize },

    #[error("pattern {pattern:?} needs {placeholder} but the locale has none")]
    MissingAttribute {
        pattern: String,
        placeholder: &'static str,
    },

    /// A remote value that would escape or reshape the generated path.
    #[error("{placeholder} value {value:?} cannot be used in a file path")]
    UnsafeAttribute {
        placeholder: &'static str,
        value: String,
    },

    #[error("no locale code specified")]
    MissingLocaleCode,

    #[error("invalid glob pattern {pattern:?}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("invalid segment expression {expression:?}: {source}")]
    Regex {
        expression: String,
        #[source]
        source: regex::Error,
    },

    #[error("could not resolve an absolute path for {}: {source}", .path.display())]
    Absolute {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PatternError {
    /// Candidates that fail this way could not have been produced by the
    /// pattern and are skipped instead of reported.
    pub fn is_segment_mismatch(&self) -> bool {
        matches!(self, PatternError::SegmentCountMismatch { .. })
    }
}
