//! Push: discover local locale files and upload them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::directory::{LocaleDirectory, LocaleParams, UploadParams, UploadSummary};
use crate::error::PatternError;
use crate::formats::extension_for;
use crate::locale::{LocaleFile, RemoteLocale};
use crate::paths::{CONFIG_FILE_NAME, absolute};
use crate::pattern::{
    Pattern, Placeholder, Reducer, expand, replace_placeholder_in_param, tokenize,
};
use crate::reconcile::{MatchContext, reconcile};

/// One configured push source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    pub file: String,
    pub project_id: String,
    #[serde(skip_serializing)]
    pub access_token: String,
    pub file_format: String,
    pub params: UploadParams,
}

/// Result of pushing a single file.
#[derive(Debug, Clone, Serialize)]
pub struct PushResult {
    pub path: PathBuf,
    pub locale: String,
    /// Whether the locale had to be created remotely first.
    pub created: bool,
    pub summary: UploadSummary,
    pub error: Option<String>,
}

impl PushResult {
    pub fn success(file: &LocaleFile, created: bool, summary: UploadSummary) -> Self {
        Self {
            path: file.rel_path(),
            locale: file.to_string(),
            created,
            summary,
            error: None,
        }
    }

    pub fn error(file: &LocaleFile, message: String) -> Self {
        Self {
            path: file.rel_path(),
            locale: file.to_string(),
            created: false,
            summary: UploadSummary::default(),
            error: Some(message),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary of a push.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PushSummary {
    pub uploaded: usize,
    /// Locales created remotely before uploading.
    pub created: usize,
    pub failed: usize,
    /// Counts reported by the remote, summed over all uploads.
    pub remote: UploadSummary,
    pub results: Vec<PushResult>,
}

impl PushSummary {
    pub fn add(&mut self, result: PushResult) {
        if result.is_error() {
            self.failed += 1;
        } else {
            self.uploaded += 1;
            if result.created {
                self.created += 1;
            }
            self.remote += result.summary;
        }
        self.results.push(result);
    }

    pub fn merge(&mut self, other: PushSummary) {
        for result in other.results {
            self.add(result);
        }
    }
}

impl Source {
    /// Validates the pattern against the configured file format.
    pub fn check_preconditions(&self) -> Result<Pattern, PatternError> {
        Pattern::parse(self.file.as_str(), extension_for(self.format()))
    }

    pub fn format(&self) -> &str {
        self.params
            .file_format
            .as_deref()
            .unwrap_or(self.file_format.as_str())
    }

    /// The configured `locale_id` parameter, empty if unset.
    pub fn locale_id(&self) -> &str {
        self.params.locale_id.as_deref().unwrap_or("")
    }

    fn match_context(&self) -> MatchContext<'_> {
        MatchContext {
            locale_id: self.locale_id(),
        }
    }

    /// Discovers the files matching the pattern and reconciles each with
    /// the remote locales.
    pub fn locale_files(
        &self,
        pattern: &Pattern,
        remotes: &[RemoteLocale],
    ) -> Result<Vec<LocaleFile>, PatternError> {
        let reducer = Reducer::new(pattern)?;
        let ctx = self.match_context();

        let mut files = Vec::new();
        for path in expand(pattern)? {
            if path.file_name().is_some_and(|name| name == CONFIG_FILE_NAME) {
                log::debug!("Skipping the config file {}", path.display());
                continue;
            }
            let path_tokens = tokenize(&path.to_string_lossy());
            let mut file = match reducer.reduce(&path_tokens) {
                Ok(file) => file,
                Err(e) if e.is_segment_mismatch() => {
                    log::debug!("Skipping {}: {e}", path.display());
                    continue;
                }
                Err(e) => return Err(e),
            };

            reconcile(&ctx, &mut file, remotes);
            file.path = absolute(&path).map_err(|source| PatternError::Absolute {
                path: path.clone(),
                source,
            })?;
            file.file_format = self.format().to_string();

            log::debug!(
                "code: {:?}, name: {:?}, tag: {:?}, path: {}",
                file.code,
                file.name,
                file.tag,
                file.path.display()
            );
            files.push(file);
        }

        if files.is_empty() {
            let raw = Path::new(pattern.as_str());
            let pattern = absolute(raw).unwrap_or_else(|_| raw.to_path_buf());
            return Err(PatternError::NoFilesMatched { pattern });
        }
        Ok(files)
    }

    /// Creates the remote locale for a file that has none yet and adopts
    /// its identity.
    pub fn create_locale(
        &self,
        directory: &dyn LocaleDirectory,
        file: &mut LocaleFile,
        branch: Option<&str>,
    ) -> Result<()> {
        if file.code.is_empty() {
            return Err(PatternError::MissingLocaleCode.into());
        }

        let mut name = if file.name.is_empty() {
            file.code.clone()
        } else {
            file.name.clone()
        };
        let from_param = replace_placeholder_in_param(self.locale_id(), &file.code);
        if !from_param.is_empty() && from_param != file.code {
            name = from_param;
        }

        let params = LocaleParams {
            name,
            code: file.code.clone(),
            branch: branch.map(str::to_string),
        };
        log::info!("Creating locale {:?} ({})", params.name, params.code);
        let remote = directory
            .create_locale(&self.project_id, &params)
            .with_context(|| format!("Failed to create locale {}", params.code))?;
        file.adopt(&remote);
        Ok(())
    }

    /// The parameters one file is uploaded with.
    pub fn upload_params(&self, file: &LocaleFile, branch: Option<&str>) -> UploadParams {
        let mut params = self.params.clone();

        let configured = self.locale_id();
        params.locale_id = if !configured.is_empty() && !configured.contains(Placeholder::LocaleCode.token()) {
            Some(configured.to_string())
        } else if !file.id.is_empty() {
            Some(file.id.clone())
        } else if !file.code.is_empty() {
            Some(file.code.clone())
        } else {
            None
        };

        if params.tags.is_none() && !file.tag.is_empty() {
            params.tags = Some(file.tag.clone());
        }
        if params.file_format.is_none() && !file.file_format.is_empty() {
            params.file_format = Some(file.file_format.clone());
        }
        if let Some(branch) = branch {
            params.branch = Some(branch.to_string());
        }
        params
    }

    /// Uploads every file matching this source. `report` sees each result as
    /// it happens.
    ///
    /// A file whose locale cannot be created is recorded and skipped; a
    /// failed upload aborts the push.
    pub fn push(
        &self,
        directory: &dyn LocaleDirectory,
        branch: Option<&str>,
        mut report: impl FnMut(&PushResult),
    ) -> Result<PushSummary> {
        let pattern = self.check_preconditions()?;
        let branch = branch.or(self.params.branch.as_deref());

        let remotes = directory
            .list_locales(&self.project_id, branch)
            .with_context(|| format!("Failed to list locales of project {}", self.project_id))?;
        let files = self.locale_files(&pattern, &remotes)?;

        let mut summary = PushSummary::default();
        for mut file in files {
            log::info!("Uploading {}", file.rel_path().display());

            let created = !file.exists_remote;
            if created {
                if let Err(e) = self.create_locale(directory, &mut file, branch) {
                    log::warn!("Failed to create locale for {}: {e:#}", file.rel_path().display());
                    let result = PushResult::error(&file, format!("{e:#}"));
                    report(&result);
                    summary.add(result);
                    continue;
                }
            }

            let params = self.upload_params(&file, branch);
            let uploaded = directory
                .upload(&self.project_id, &file.path, &params)
                .with_context(|| format!("Failed to upload {}", file.rel_path().display()))?;

            let result = PushResult::success(&file, created, uploaded);
            report(&result);
            summary.add(result);
        }

        Ok(summary)
    }
}
