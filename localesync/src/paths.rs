use std::io;
use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;

pub const CONFIG_FILE_NAME: &str = ".localesync.yml";

/// Finds the closest config file by walking up from the given directory.
///
/// Returns `None` if no config file is found before reaching the filesystem root.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let mut dir = start_dir.as_ref();
    log::debug!("Searching for {} starting from {}", CONFIG_FILE_NAME, dir.display());

    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::debug!("Found config at {}", candidate.display());
            return Some(candidate);
        }

        dir = dir.parent()?;
    }
}

/// Makes a path absolute against the current directory without touching
/// the filesystem, so it works for files that do not exist yet.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}

/// Path relative to the current directory, for messages. Falls back to the
/// path itself when no relative form exists.
pub fn display_path(path: &Path) -> PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| pathdiff::diff_paths(path, cwd))
        .unwrap_or_else(|| path.to_path_buf())
}
