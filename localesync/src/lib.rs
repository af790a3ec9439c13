pub mod config;
pub mod directory;
pub mod error;
pub mod formats;
pub mod locale;
pub mod paths;
pub mod pattern;
pub mod pull;
pub mod push;
pub mod reconcile;

pub use config::Config;
pub use directory::{HttpDirectory, LocaleDirectory};
pub use error::PatternError;
pub use locale::{LocaleFile, RemoteLocale};
pub use pattern::{Pattern, Placeholder};
pub use pull::{LocaleCache, PullResult, PullSummary, Target};
pub use push::{PushResult, PushSummary, Source};

#[cfg(test)]
pub mod testutil {
    use fs_err as fs;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    static CWD_LOCK: Mutex<()> = Mutex::new(());

    /// Creates a file with the given content at the specified path.
    /// Creates parent directories if needed.
    /// Returns the full path to the created file.
    pub fn create_file(dir: &Path, relative_path: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Runs `f` with `dir` as the working directory, restoring the previous
    /// one afterwards. Tests calling this are serialized.
    pub fn in_dir<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
        let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        let result = f();
        std::env::set_current_dir(previous).unwrap();
        result
    }
}
