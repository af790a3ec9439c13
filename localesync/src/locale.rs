use std::fmt::{self, Display};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::paths::display_path;
use crate::pattern::Placeholder;

/// A locale as the remote directory knows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteLocale {
    pub id: String,
    pub name: String,
    pub code: String,
}

/// One file on disk and the locale it holds.
///
/// Discovery fills `code`/`name`/`tag` from the path, generation from a
/// remote locale. Empty strings mean "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocaleFile {
    pub code: String,
    pub name: String,
    pub tag: String,
    /// Remote identifier, empty until reconciled with (or created on) the remote.
    pub id: String,
    pub path: PathBuf,
    pub file_format: String,
    pub exists_remote: bool,
}

impl LocaleFile {
    /// Starts a locale file from a remote record, for the generation direction.
    pub fn from_remote(remote: &RemoteLocale) -> Self {
        Self {
            code: remote.code.clone(),
            name: remote.name.clone(),
            id: remote.id.clone(),
            exists_remote: true,
            ..Self::default()
        }
    }

    pub fn attribute(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::LocaleName => &self.name,
            Placeholder::LocaleCode => &self.code,
            Placeholder::Tag => &self.tag,
        }
    }

    /// Takes over the identity of the remote locale it was matched with.
    pub fn adopt(&mut self, remote: &RemoteLocale) {
        self.exists_remote = true;
        self.code = remote.code.clone();
        self.name = remote.name.clone();
        self.id = remote.id.clone();
    }

    pub fn rel_path(&self) -> PathBuf {
        display_path(&self.path)
    }
}

impl Display for LocaleFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.name.is_empty() {
            &self.code
        } else {
            &self.name
        };
        write!(f, "{label}")?;
        if !self.name.is_empty() && !self.code.is_empty() && self.name != self.code {
            write!(f, " ({})", self.code)?;
        }
        if !self.tag.is_empty() {
            write!(f, " [{}]", self.tag)?;
        }
        Ok(())
    }
}
