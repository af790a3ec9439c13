use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow, bail};
use fs_err as fs;

use super::{
    Download, DownloadParams, LocaleDirectory, LocaleParams, RateLimit, UploadParams,
    UploadSummary,
};
use crate::locale::RemoteLocale;

/// An upload as the in-memory directory received it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpload {
    pub project_id: String,
    pub path: PathBuf,
    pub params: UploadParams,
    pub content: Vec<u8>,
}

#[derive(Debug, Default)]
struct State {
    locales: HashMap<String, Vec<RemoteLocale>>,
    contents: HashMap<(String, String), Vec<u8>>,
    created: Vec<LocaleParams>,
    uploads: Vec<RecordedUpload>,
    downloads: Vec<(String, String)>,
    next_id: usize,
}

/// A locale directory kept in memory, for tests.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    state: Mutex<State>,
    rate_limit: RateLimit,
    failing_uploads: Vec<String>,
    failing_downloads: Vec<String>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, project_id: &str, locale: RemoteLocale) -> Self {
        if let Ok(state) = self.state.get_mut() {
            state
                .locales
                .entry(project_id.to_string())
                .or_default()
                .push(locale);
        }
        self
    }

    pub fn with_content(
        mut self,
        project_id: &str,
        locale_id: &str,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        if let Ok(state) = self.state.get_mut() {
            state
                .contents
                .insert((project_id.to_string(), locale_id.to_string()), content.into());
        }
        self
    }

    /// Every download reports this rate limit state.
    pub fn with_rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Uploads for this locale id fail without being recorded.
    pub fn with_failing_upload(mut self, locale_id: &str) -> Self {
        self.failing_uploads.push(locale_id.to_string());
        self
    }

    /// Downloads of this locale are recorded, then fail.
    pub fn with_failing_download(mut self, locale_id: &str) -> Self {
        self.failing_downloads.push(locale_id.to_string());
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("in-memory directory state is poisoned"))
    }

    pub fn created(&self) -> Result<Vec<LocaleParams>> {
        Ok(self.lock()?.created.clone())
    }

    pub fn uploads(&self) -> Result<Vec<RecordedUpload>> {
        Ok(self.lock()?.uploads.clone())
    }

    /// `(project_id, locale_id)` of every download, in order.
    pub fn downloads(&self) -> Result<Vec<(String, String)>> {
        Ok(self.lock()?.downloads.clone())
    }
}

impl LocaleDirectory for MemoryDirectory {
    fn list_locales(&self, project_id: &str, _branch: Option<&str>) -> Result<Vec<RemoteLocale>> {
        Ok(self
            .lock()?
            .locales
            .get(project_id)
            .cloned()
            .unwrap_or_default())
    }

    fn create_locale(&self, project_id: &str, params: &LocaleParams) -> Result<RemoteLocale> {
        if params.code.is_empty() {
            bail!("locale code must not be empty");
        }
        let mut state = self.lock()?;
        state.next_id += 1;
        let locale = RemoteLocale {
            id: format!("locale-{}", state.next_id),
            name: if params.name.is_empty() {
                params.code.clone()
            } else {
                params.name.clone()
            },
            code: params.code.clone(),
        };
        state.created.push(params.clone());
        state
            .locales
            .entry(project_id.to_string())
            .or_default()
            .push(locale.clone());
        Ok(locale)
    }

    fn download(
        &self,
        project_id: &str,
        locale_id: &str,
        _params: &DownloadParams,
    ) -> Result<Download> {
        let mut state = self.lock()?;
        state
            .downloads
            .push((project_id.to_string(), locale_id.to_string()));
        if self.failing_downloads.iter().any(|id| id == locale_id) {
            bail!("download of {locale_id} refused");
        }
        let content = state
            .contents
            .get(&(project_id.to_string(), locale_id.to_string()))
            .cloned()
            .unwrap_or_default();
        Ok(Download {
            content,
            rate_limit: self.rate_limit,
        })
    }

    fn upload(&self, project_id: &str, file: &Path, params: &UploadParams) -> Result<UploadSummary> {
        if let Some(locale_id) = &params.locale_id {
            if self.failing_uploads.contains(locale_id) {
                bail!("upload to {locale_id} refused");
            }
        }
        let content = fs::read(file).context("Failed to read file for upload")?;
        let mut state = self.lock()?;

        let mut summary = UploadSummary::default();
        if let Some(locale_id) = &params.locale_id {
            let key = (project_id.to_string(), locale_id.clone());
            if state.contents.get(&key) != Some(&content) {
                summary.translations_updated = 1;
            }
            state.contents.insert(key, content.clone());
        }

        state.uploads.push(RecordedUpload {
            project_id: project_id.to_string(),
            path: file.to_path_buf(),
            params: params.clone(),
            content,
        });
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::create_file;

    #[test]
    fn lists_locales_per_project() {
        let directory = MemoryDirectory::new().with_locale(
            "p1",
            RemoteLocale {
                id: "1".to_string(),
                name: "english".to_string(),
                code: "en".to_string(),
            },
        );
        assert_eq!(directory.list_locales("p1", None).unwrap().len(), 1);
        assert!(directory.list_locales("p2", None).unwrap().is_empty());
    }

    #[test]
    fn created_locales_get_ids_and_become_listed() {
        let directory = MemoryDirectory::new();
        let locale = directory
            .create_locale(
                "p1",
                &LocaleParams {
                    code: "de".to_string(),
                    ..LocaleParams::default()
                },
            )
            .unwrap();
        assert_eq!(locale.name, "de");
        assert!(!locale.id.is_empty());
        assert_eq!(directory.list_locales("p1", None).unwrap(), vec![locale]);
        assert_eq!(directory.created().unwrap().len(), 1);
    }

    #[test]
    fn uploads_are_recorded_and_downloadable() {
        let tmp = tempfile::tempdir().unwrap();
        let file = create_file(tmp.path(), "en.yml", b"en:\n  hello: Hello\n");
        let directory = MemoryDirectory::new();

        let params = UploadParams {
            locale_id: Some("en-id".to_string()),
            ..UploadParams::default()
        };
        let summary = directory.upload("p1", &file, &params).unwrap();
        assert!(summary.has_changes());

        let download = directory
            .download("p1", "en-id", &DownloadParams::default())
            .unwrap();
        assert_eq!(download.content, b"en:\n  hello: Hello\n");
        assert_eq!(directory.uploads().unwrap()[0].path, file);
        assert_eq!(
            directory.downloads().unwrap(),
            vec![("p1".to_string(), "en-id".to_string())]
        );
    }

    #[test]
    fn failing_modes_only_hit_the_named_locale() {
        let tmp = tempfile::tempdir().unwrap();
        let file = create_file(tmp.path(), "en.yml", b"en:");
        let directory = MemoryDirectory::new()
            .with_failing_upload("de-id")
            .with_failing_download("de-id");

        let params = |id: &str| UploadParams {
            locale_id: Some(id.to_string()),
            ..UploadParams::default()
        };
        assert!(directory.upload("p1", &file, &params("de-id")).is_err());
        assert!(directory.upload("p1", &file, &params("en-id")).is_ok());
        assert_eq!(directory.uploads().unwrap().len(), 1);

        assert!(directory.download("p1", "de-id", &DownloadParams::default()).is_err());
        assert!(directory.download("p1", "en-id", &DownloadParams::default()).is_ok());
        assert_eq!(directory.downloads().unwrap().len(), 2);
    }
}
