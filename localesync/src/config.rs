use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::directory::http::DEFAULT_HOST;
use crate::paths::find_config_file;
use crate::pull::Target;
use crate::push::Source;

/// Environment variable overriding the access token from the config file.
pub const ACCESS_TOKEN_ENV: &str = "LOCALESYNC_ACCESS_TOKEN";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
struct ConfigFile {
    localesync: Config,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PushConfig {
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PullConfig {
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// The `localesync` section of `.localesync.yml`.
///
/// Project id, access token and file format set here are defaults for every
/// source and target that does not set its own.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    push: PushConfig,
    pull: PullConfig,
}

impl Config {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        Ok(file.localesync)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads the closest config file above `current_directory`, if any.
    pub fn find(current_directory: impl AsRef<Path>) -> Option<Result<(PathBuf, Self)>> {
        let path = find_config_file(current_directory)?;
        Some(Self::load(&path).map(|config| (path, config)))
    }

    /// Replaces the file's access token, e.g. with one given on the command
    /// line or through [`ACCESS_TOKEN_ENV`]. Empty tokens are ignored.
    pub fn override_access_token(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.access_token = Some(token);
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Push sources with every default filled in.
    pub fn sources(&self) -> Result<Vec<Source>> {
        if self.push.sources.is_empty() {
            bail!("no sources for upload specified");
        }

        self.push
            .sources
            .iter()
            .cloned()
            .map(|mut source| {
                self.fill(
                    &source.file,
                    &mut source.project_id,
                    &mut source.access_token,
                    &mut source.file_format,
                )?;
                if source.params.file_format.is_none() && !source.file_format.is_empty() {
                    source.params.file_format = Some(source.file_format.clone());
                }
                Ok(source)
            })
            .collect()
    }

    /// Pull targets with every default filled in.
    pub fn targets(&self) -> Result<Vec<Target>> {
        if self.pull.targets.is_empty() {
            bail!("no targets for download specified");
        }

        self.pull
            .targets
            .iter()
            .cloned()
            .map(|mut target| {
                self.fill(
                    &target.file,
                    &mut target.project_id,
                    &mut target.access_token,
                    &mut target.file_format,
                )?;
                if target.params.file_format.is_none() && !target.file_format.is_empty() {
                    target.params.file_format = Some(target.file_format.clone());
                }
                Ok(target)
            })
            .collect()
    }

    fn fill(
        &self,
        file: &str,
        project_id: &mut String,
        access_token: &mut String,
        file_format: &mut String,
    ) -> Result<()> {
        fill_default(project_id, self.project_id.as_deref());
        fill_default(access_token, self.access_token.as_deref());
        fill_default(file_format, self.file_format.as_deref());

        if project_id.is_empty() {
            bail!("no project id specified for {file:?}");
        }
        if access_token.is_empty() {
            bail!("no access token specified for {file:?}, set it in the config or with {ACCESS_TOKEN_ENV}");
        }
        Ok(())
    }
}

fn fill_default(value: &mut String, default: Option<&str>) {
    if value.is_empty() {
        if let Some(default) = default {
            *value = default.to_string();
        }
    }
}
