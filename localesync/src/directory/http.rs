use std::path::Path;

use anyhow::{Context, Result, bail};
use reqwest::blocking::{Client, RequestBuilder, Response, multipart::Form};
use reqwest::header::HeaderMap;
use serde::Deserialize;

use super::{
    Download, DownloadParams, LocaleDirectory, LocaleParams, RateLimit, UploadParams,
    UploadSummary,
};
use crate::locale::RemoteLocale;

pub const DEFAULT_HOST: &str = "https://api.phrase.com/v2";
const PER_PAGE: usize = 100;

/// Talks to a Phrase-style REST API.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: Client,
    host: String,
    access_token: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default)]
    summary: UploadSummary,
}

impl HttpDirectory {
    pub fn new(host: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("localesync/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            host: host.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.host, path.trim_start_matches('/'))
    }

    fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request
            .header("Authorization", format!("token {}", self.access_token))
            .send()
            .with_context(|| format!("Request to {what} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("{what} returned {status}: {}", body.trim());
        }
        log::debug!("{what} returned {status}");
        Ok(response)
    }
}

impl LocaleDirectory for HttpDirectory {
    fn list_locales(&self, project_id: &str, branch: Option<&str>) -> Result<Vec<RemoteLocale>> {
        let url = self.url(&format!("projects/{project_id}/locales"));
        let mut locales = Vec::new();

        for page in 1.. {
            let mut query = vec![
                ("page", page.to_string()),
                ("per_page", PER_PAGE.to_string()),
            ];
            if let Some(branch) = branch {
                query.push(("branch", branch.to_string()));
            }
            let batch: Vec<RemoteLocale> = self
                .send(self.client.get(&url).query(&query), "listing locales")?
                .json()
                .context("Failed to parse locale list")?;

            let done = batch.len() < PER_PAGE;
            locales.extend(batch);
            if done {
                break;
            }
        }

        log::debug!("Project {project_id} has {} remote locales", locales.len());
        Ok(locales)
    }

    fn create_locale(&self, project_id: &str, params: &LocaleParams) -> Result<RemoteLocale> {
        let url = self.url(&format!("projects/{project_id}/locales"));
        self.send(self.client.post(&url).json(params), "creating locale")?
            .json()
            .context("Failed to parse created locale")
    }

    fn download(
        &self,
        project_id: &str,
        locale_id: &str,
        params: &DownloadParams,
    ) -> Result<Download> {
        let url = self.url(&format!("projects/{project_id}/locales/{locale_id}/download"));
        let response = self.send(
            self.client.get(&url).query(&download_query(params)),
            "downloading locale",
        )?;

        let rate_limit = rate_limit(response.headers());
        let content = response
            .bytes()
            .context("Failed to read downloaded content")?
            .to_vec();
        Ok(Download {
            content,
            rate_limit,
        })
    }

    fn upload(&self, project_id: &str, file: &Path, params: &UploadParams) -> Result<UploadSummary> {
        let url = self.url(&format!("projects/{project_id}/uploads"));
        let mut form = Form::new()
            .file("file", file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        for (key, value) in upload_fields(params) {
            form = form.text(key, value);
        }

        let response: UploadResponse = self
            .send(self.client.post(&url).multipart(form), "uploading file")?
            .json()
            .context("Failed to parse upload response")?;
        Ok(response.summary)
    }
}

fn rate_limit(headers: &HeaderMap) -> RateLimit {
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());
    RateLimit {
        remaining: header("X-Rate-Limit-Remaining").and_then(|v| v.trim().parse().ok()),
        reset: header("X-Rate-Limit-Reset").and_then(|v| v.trim().parse().ok()),
    }
}

fn push_opt(fields: &mut Vec<(String, String)>, key: &str, value: Option<impl ToString>) {
    if let Some(value) = value {
        fields.push((key.to_string(), value.to_string()));
    }
}

fn push_format_options(
    fields: &mut Vec<(String, String)>,
    options: &std::collections::BTreeMap<String, serde_json::Value>,
) {
    for (key, value) in options {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        fields.push((format!("format_options[{key}]"), value));
    }
}

fn upload_fields(params: &UploadParams) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    push_opt(&mut fields, "locale_id", params.locale_id.as_ref());
    push_opt(&mut fields, "file_format", params.file_format.as_ref());
    push_opt(&mut fields, "tags", params.tags.as_ref());
    push_opt(&mut fields, "update_translations", params.update_translations);
    push_opt(&mut fields, "update_descriptions", params.update_descriptions);
    push_opt(&mut fields, "skip_unverification", params.skip_unverification);
    push_opt(&mut fields, "skip_upload_tags", params.skip_upload_tags);
    push_opt(&mut fields, "convert_emoji", params.convert_emoji);
    push_opt(&mut fields, "autotranslate", params.autotranslate);
    push_opt(&mut fields, "mark_reviewed", params.mark_reviewed);
    push_opt(&mut fields, "branch", params.branch.as_ref());
    push_format_options(&mut fields, &params.format_options);
    fields
}

fn download_query(params: &DownloadParams) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    push_opt(&mut fields, "file_format", params.file_format.as_ref());
    push_opt(&mut fields, "tag", params.tag.as_ref());
    push_opt(&mut fields, "include_empty_translations", params.include_empty_translations);
    push_opt(&mut fields, "exclude_empty_zero_forms", params.exclude_empty_zero_forms);
    push_opt(&mut fields, "keep_notranslate_tags", params.keep_notranslate_tags);
    push_opt(&mut fields, "convert_emoji", params.convert_emoji);
    push_opt(&mut fields, "skip_unverified_translations", params.skip_unverified_translations);
    push_opt(&mut fields, "encoding", params.encoding.as_ref());
    push_opt(&mut fields, "fallback_locale_id", params.fallback_locale_id.as_ref());
    push_opt(&mut fields, "branch", params.branch.as_ref());
    push_format_options(&mut fields, &params.format_options);
    fields
}
