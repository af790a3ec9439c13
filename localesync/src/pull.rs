//! Pull: generate a path for every remote locale and download into it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::directory::{DownloadParams, LocaleDirectory};
use crate::error::PatternError;
use crate::formats::extension_for;
use crate::locale::{LocaleFile, RemoteLocale};
use crate::pattern::{Pattern, substitute};

/// Budget for downloading all files of one target.
pub const PULL_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// One configured pull target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Target {
    pub file: String,
    pub project_id: String,
    #[serde(skip_serializing)]
    pub access_token: String,
    pub file_format: String,
    pub params: DownloadParams,
}

/// Result of pulling a single locale.
#[derive(Debug, Clone, Serialize)]
pub struct PullResult {
    pub locale: String,
    /// Where the file was (or would have been) written, when known.
    pub path: Option<PathBuf>,
    pub bytes: usize,
    pub error: Option<String>,
}

impl PullResult {
    pub fn success(file: &LocaleFile, bytes: usize) -> Self {
        Self {
            locale: file.to_string(),
            path: Some(file.rel_path()),
            bytes,
            error: None,
        }
    }

    pub fn error(locale: String, path: Option<PathBuf>, message: String) -> Self {
        Self {
            locale,
            path,
            bytes: 0,
            error: Some(message),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary of a pull.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PullSummary {
    pub downloaded: usize,
    pub failed: usize,
    pub results: Vec<PullResult>,
}

impl PullSummary {
    pub fn add(&mut self, result: PullResult) {
        if result.is_error() {
            self.failed += 1;
        } else {
            self.downloaded += 1;
        }
        self.results.push(result);
    }

    pub fn merge(&mut self, other: PullSummary) {
        for result in other.results {
            self.add(result);
        }
    }
}

/// Remote locale lists, fetched once per project and branch and shared by
/// every target.
#[derive(Debug, Default)]
pub struct LocaleCache {
    locales: HashMap<(String, Option<String>), Vec<RemoteLocale>>,
}

impl LocaleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        directory: &dyn LocaleDirectory,
        project_id: &str,
        branch: Option<&str>,
    ) -> Result<&[RemoteLocale]> {
        let key = (project_id.to_string(), branch.map(str::to_string));
        if !self.locales.contains_key(&key) {
            let locales = directory
                .list_locales(project_id, branch)
                .with_context(|| format!("Failed to list locales of project {project_id}"))?;
            self.locales.insert(key.clone(), locales);
        }

        match self.locales.get(&key) {
            Some(locales) if !locales.is_empty() => Ok(locales),
            _ => bail!("could not find any locales for project {project_id:?}"),
        }
    }
}

/// A locale file planned for download, or why it could not be planned.
pub type Planned = Result<LocaleFile, (LocaleFile, PatternError)>;

impl Target {
    pub fn check_preconditions(&self) -> Result<Pattern, PatternError> {
        Pattern::parse_target(self.file.as_str(), extension_for(self.format()))
    }

    pub fn format(&self) -> &str {
        self.params
            .file_format
            .as_deref()
            .unwrap_or(self.file_format.as_str())
    }

    pub fn locale_id(&self) -> &str {
        self.params.locale_id.as_deref().unwrap_or("")
    }

    pub fn tag(&self) -> &str {
        self.params.tag.as_deref().unwrap_or("")
    }

    /// The remote locales this target wants.
    pub fn select<'r>(
        &self,
        pattern: &Pattern,
        remotes: &'r [RemoteLocale],
    ) -> Result<Vec<&'r RemoteLocale>> {
        let locale_id = self.locale_id();
        if !locale_id.is_empty() {
            let remote = remotes
                .iter()
                .find(|remote| remote.id == locale_id || remote.name == locale_id)
                .ok_or_else(|| {
                    anyhow!(
                        "could not find remote locale with name or id {locale_id:?} in project {:?}",
                        self.project_id
                    )
                })?;
            Ok(vec![remote])
        } else if pattern.contains_locale_placeholder() {
            Ok(remotes.iter().collect())
        } else {
            bail!(
                "{:?} names neither a locale_id nor <locale_code>/<locale_name>, nothing to pull for project {:?}",
                self.file,
                self.project_id
            )
        }
    }

    /// Generates the file for one remote locale.
    pub fn locale_file(&self, pattern: &Pattern, remote: &RemoteLocale) -> Planned {
        let mut file = LocaleFile::from_remote(remote);
        file.tag = self.tag().to_string();
        file.file_format = self.format().to_string();
        match substitute(pattern, &file) {
            Ok(path) => {
                file.path = path;
                Ok(file)
            }
            Err(e) => Err((file, e)),
        }
    }

    pub fn locale_files(&self, pattern: &Pattern, remotes: &[RemoteLocale]) -> Result<Vec<Planned>> {
        Ok(self
            .select(pattern, remotes)?
            .into_iter()
            .map(|remote| self.locale_file(pattern, remote))
            .collect())
    }

    fn download_params(&self, file: &LocaleFile, branch: Option<&str>) -> DownloadParams {
        let mut params = self.params.clone();
        params.locale_id = None;
        if params.file_format.is_none() && !file.file_format.is_empty() {
            params.file_format = Some(file.file_format.clone());
        }
        if let Some(branch) = branch {
            params.branch = Some(branch.to_string());
        }
        params
    }

    fn download_to(
        &self,
        directory: &dyn LocaleDirectory,
        file: &LocaleFile,
        branch: Option<&str>,
    ) -> Result<usize> {
        create_file(&file.path)?;

        let params = self.download_params(file, branch);
        let download = directory
            .download(&self.project_id, &file.id, &params)
            .with_context(|| format!("Failed to download {file} for {}", file.path.display()))?;

        if let Some(wait) = download.rate_limit.wait(chrono::Utc::now().timestamp()) {
            log::warn!(
                "Rate limit exceeded. Download will continue in {} seconds",
                wait.as_secs()
            );
            std::thread::sleep(wait);
        }

        fs::write(&file.path, &download.content)?;
        Ok(download.content.len())
    }

    /// Downloads every locale this target resolves to within [`PULL_TIMEOUT`].
    ///
    /// Locales whose path cannot be generated are recorded and skipped; a
    /// failed download aborts the pull.
    pub fn pull(
        &self,
        directory: &dyn LocaleDirectory,
        cache: &mut LocaleCache,
        branch: Option<&str>,
        report: impl FnMut(&PullResult),
    ) -> Result<PullSummary> {
        self.pull_with_budget(directory, cache, branch, PULL_TIMEOUT, report)
    }

    /// Like [`Target::pull`], giving up once `budget` has elapsed.
    pub fn pull_with_budget(
        &self,
        directory: &dyn LocaleDirectory,
        cache: &mut LocaleCache,
        branch: Option<&str>,
        budget: Duration,
        mut report: impl FnMut(&PullResult),
    ) -> Result<PullSummary> {
        let pattern = self.check_preconditions()?;
        let branch = branch.or(self.params.branch.as_deref());
        let remotes = cache.get(directory, &self.project_id, branch)?;
        let planned = self.locale_files(&pattern, remotes)?;

        let started = Instant::now();
        let mut summary = PullSummary::default();
        for entry in planned {
            if started.elapsed() >= budget {
                bail!("timeout of {} minutes exceeded", budget.as_secs() / 60);
            }

            let result = match entry {
                Ok(file) => {
                    let bytes = self.download_to(directory, &file, branch)?;
                    log::info!("Downloaded {file} to {}", file.rel_path().display());
                    PullResult::success(&file, bytes)
                }
                Err((file, e)) => {
                    log::warn!("Skipping {file}: {e}");
                    PullResult::error(file.to_string(), None, e.to_string())
                }
            };
            report(&result);
            summary.add(result);
        }

        Ok(summary)
    }
}

/// Makes sure the file and its parent directories exist.
fn create_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::File::create(path)?;
    Ok(())
}
