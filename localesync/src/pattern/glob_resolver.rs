use std::path::{MAIN_SEPARATOR_STR, PathBuf};

use super::{Pattern, Placeholder, WILDCARD, join, tokenize};
use crate::error::PatternError;

/// Turns a pattern into the wildcard query used to find existing files.
///
/// Placeholders become `*`. A last segment starting with "." (as in
/// `<locale_code>.lproj/.strings`) stands for a file whose name is implicit,
/// so it gets a `*` prefix to absorb that name.
pub fn to_glob(pattern: &Pattern) -> String {
    let without_placeholders = Placeholder::ALL
        .into_iter()
        .fold(pattern.as_str().to_string(), |acc, p| {
            acc.replace(p.token(), WILDCARD)
        });
    let mut tokens = tokenize(&without_placeholders);

    if let Some(file_head) = tokens.last_mut() {
        if file_head.starts_with('.') {
            *file_head = format!("{WILDCARD}{file_head}");
        }
    }

    let query = join(&tokens);
    if pattern.is_rooted() {
        format!("{MAIN_SEPARATOR_STR}{query}")
    } else {
        query
    }
}

/// Lists the files on disk matching the pattern. No match is not an error;
/// the caller decides what an empty result means. Directories that cannot
/// be read while walking are skipped.
pub fn expand(pattern: &Pattern) -> Result<Vec<PathBuf>, PatternError> {
    let query = to_glob(pattern);
    let entries = ::glob::glob(&query).map_err(|source| PatternError::InvalidGlob {
        pattern: query.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::debug!("Skipping unreadable {}: {}", e.path().display(), e.error()),
        }
    }
    files.sort();

    log::debug!(
        "Found {} files matching the source pattern {}",
        files.len(),
        query
    );
    Ok(files)
}
