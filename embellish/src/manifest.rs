use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{EmbellishError, ManifestError, Result};

/// Project metadata read from `package.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackageData {
    pub name: String,
    pub author: String,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub private: Option<bool>,
    #[serde(default)]
    pub stability: Option<Stability>,
    #[serde(default)]
    pub repository: Option<RepositoryField>,
    #[serde(default)]
    pub embellish: Option<Overrides>,
}

/// The `embellish` block of the manifest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overrides {
    #[serde(default)]
    pub license_holder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RepositoryField {
    Url(String),
    Structured {
        #[serde(rename = "type")]
        kind: String,
        url: String,
    },
}

impl RepositoryField {
    pub fn url(&self) -> &str {
        match self {
            RepositoryField::Url(url) => url,
            RepositoryField::Structured { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stability {
    Deprecated,
    Experimental,
    Unstable,
    Stable,
    Frozen,
    Locked,
}

impl Stability {
    pub fn label(self) -> &'static str {
        match self {
            Stability::Deprecated => "deprecated",
            Stability::Experimental => "experimental",
            Stability::Unstable => "unstable",
            Stability::Stable => "stable",
            Stability::Frozen => "frozen",
            Stability::Locked => "locked",
        }
    }

    /// shields.io color for the stability badge.
    pub fn color(self) -> &'static str {
        match self {
            Stability::Deprecated => "aa8899",
            Stability::Experimental => "red",
            Stability::Unstable => "yellowgreen",
            Stability::Stable => "green",
            Stability::Frozen => "blue",
            Stability::Locked => "00bbff",
        }
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl PackageData {
    /// Decode manifest JSON. `path` is only used for error reporting.
    pub fn from_json(source: &str, path: impl AsRef<Path>) -> Result<Self> {
        serde_json::from_str(source).map_err(|err| {
            EmbellishError::from(ManifestError::from_serde(&err, source, path.as_ref()))
        })
    }

    pub async fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| EmbellishError::io(path, e))?;
        Self::from_json(&source, path)
    }

    /// The license holder: the `embellish.licenseHolder` override, else the author.
    pub fn license_holder(&self) -> Option<&str> {
        self.embellish
            .as_ref()
            .and_then(|o| o.license_holder.as_deref())
            .filter(|s| !s.trim().is_empty())
            .or(Some(self.author.as_str()).filter(|s| !s.trim().is_empty()))
    }

    pub fn is_private(&self) -> bool {
        self.private.unwrap_or(false)
    }
}
