//! The remote locale directory: where locales live and files are uploaded
//! to and downloaded from.

use std::collections::BTreeMap;
use std::ops::AddAssign;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::locale::RemoteLocale;

pub mod http;
#[cfg(test)]
pub mod memory;

pub use http::HttpDirectory;
#[cfg(test)]
pub use memory::MemoryDirectory;

pub trait LocaleDirectory: Send + Sync {
    /// All locales of a project, optionally on a branch.
    fn list_locales(&self, project_id: &str, branch: Option<&str>) -> Result<Vec<RemoteLocale>>;

    fn create_locale(&self, project_id: &str, params: &LocaleParams) -> Result<RemoteLocale>;

    /// Downloads one locale rendered in the requested format.
    fn download(&self, project_id: &str, locale_id: &str, params: &DownloadParams)
        -> Result<Download>;

    /// Uploads a locale file and reports what changed remotely.
    fn upload(&self, project_id: &str, file: &Path, params: &UploadParams) -> Result<UploadSummary>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocaleParams {
    pub name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Upload parameters as configured on a push source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadParams {
    pub locale_id: Option<String>,
    pub file_format: Option<String>,
    pub tags: Option<String>,
    pub update_translations: Option<bool>,
    pub update_descriptions: Option<bool>,
    pub skip_unverification: Option<bool>,
    pub skip_upload_tags: Option<bool>,
    pub convert_emoji: Option<bool>,
    pub autotranslate: Option<bool>,
    pub mark_reviewed: Option<bool>,
    pub branch: Option<String>,
    pub format_options: BTreeMap<String, serde_json::Value>,
}

/// Download parameters as configured on a pull target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadParams {
    /// Selects a single remote locale (by id or name) instead of all of them.
    pub locale_id: Option<String>,
    pub file_format: Option<String>,
    pub tag: Option<String>,
    pub include_empty_translations: Option<bool>,
    pub exclude_empty_zero_forms: Option<bool>,
    pub keep_notranslate_tags: Option<bool>,
    pub convert_emoji: Option<bool>,
    pub skip_unverified_translations: Option<bool>,
    pub encoding: Option<String>,
    pub fallback_locale_id: Option<String>,
    pub branch: Option<String>,
    pub format_options: BTreeMap<String, serde_json::Value>,
}

/// Counts reported by the remote after an upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSummary {
    pub locales_created: u64,
    pub translation_keys_created: u64,
    pub translations_created: u64,
    pub translations_updated: u64,
    pub tags_created: u64,
    pub translation_keys_unmentioned: u64,
}

impl UploadSummary {
    pub fn has_changes(&self) -> bool {
        self.locales_created > 0
            || self.translation_keys_created > 0
            || self.translations_created > 0
            || self.translations_updated > 0
    }
}

impl AddAssign for UploadSummary {
    fn add_assign(&mut self, other: Self) {
        self.locales_created += other.locales_created;
        self.translation_keys_created += other.translation_keys_created;
        self.translations_created += other.translations_created;
        self.translations_updated += other.translations_updated;
        self.tags_created += other.tags_created;
        self.translation_keys_unmentioned += other.translation_keys_unmentioned;
    }
}

/// Rate limit state reported alongside a download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub remaining: Option<u64>,
    /// Unix timestamp (seconds) at which the limit resets.
    pub reset: Option<i64>,
}

/// Used when the remote says the limit is exhausted but not when it resets.
pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(10);

impl RateLimit {
    /// How long to wait before the next request, if at all.
    pub fn wait(&self, now: i64) -> Option<Duration> {
        if self.remaining != Some(0) {
            return None;
        }
        match self.reset {
            Some(reset) => {
                let seconds = u64::try_from(reset.saturating_sub(now)).unwrap_or(0);
                Some(Duration::from_secs(seconds))
            }
            None => Some(DEFAULT_RATE_LIMIT_WAIT),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Download {
    pub content: Vec<u8>,
    pub rate_limit: RateLimit,
}
