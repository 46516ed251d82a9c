use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{EmbellishError, Result};

/// Name of the optional settings file at the project root.
pub const SETTINGS_FILE: &str = ".embellish.toml";

/// Run settings. Every field has a default, so an absent file is fine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Upper bound for any single badge probe.
    pub probe_timeout_secs: u64,
    /// CI configuration file whose presence enables the build badge.
    pub ci_file: String,
    /// Base URL of the repository-metrics service.
    pub metrics_api: String,
    /// License file written at the project root.
    pub license_file: String,
    /// Skip every network lookup.
    pub offline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            probe_timeout_secs: 10,
            ci_file: ".travis.yml".to_string(),
            metrics_api: "https://api.codeclimate.com/v1".to_string(),
            license_file: "LICENSE".to_string(),
            offline: false,
        }
    }
}

impl Settings {
    /// Load `.embellish.toml` from `base`, falling back to defaults when absent.
    pub async fn load(base: &Path) -> Result<Self> {
        let path = base.join(SETTINGS_FILE);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
            Err(e) => return Err(EmbellishError::io(&path, e)),
        };
        toml::from_str(&content).map_err(|e| EmbellishError::Settings {
            path,
            message: e.message().to_string(),
        })
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = self.offline || offline;
        self
    }
}
