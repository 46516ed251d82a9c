use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use tracing::{debug, info};

use crate::error::{EmbellishError, Result};
use crate::manifest::PackageData;
use crate::settings::Settings;
use crate::template;

/// License templates compiled into the binary, keyed by lower-case identifier.
const TEMPLATES: &[(&str, &str)] = &[
    ("apache-2.0", include_str!("../licenses/apache-2.0.txt")),
    ("bsd-2-clause", include_str!("../licenses/bsd-2-clause.txt")),
    ("bsd-3-clause", include_str!("../licenses/bsd-3-clause.txt")),
    ("isc", include_str!("../licenses/isc.txt")),
    ("mit", include_str!("../licenses/mit.txt")),
    ("unlicense", include_str!("../licenses/unlicense.txt")),
];

pub fn template_for(license: &str) -> Option<&'static str> {
    let name = license.trim().to_lowercase();
    TEMPLATES
        .iter()
        .find(|(id, _)| *id == name)
        .map(|(_, text)| *text)
}

/// Identifiers that have a bundled template.
pub fn known_licenses() -> impl Iterator<Item = &'static str> {
    TEMPLATES.iter().map(|(id, _)| *id)
}

/// Render the license text for the project, using the current year.
///
/// `Ok(None)` when no license or no holder is declared. A declared license
/// without a bundled template is an error.
pub fn resolve(data: &PackageData) -> Result<Option<String>> {
    resolve_for_year(data, chrono::Local::now().year())
}

pub fn resolve_for_year(data: &PackageData, year: i32) -> Result<Option<String>> {
    let (Some(license), Some(holder)) = (data.license.as_deref(), data.license_holder()) else {
        debug!("no license or license holder declared");
        return Ok(None);
    };

    let template = template_for(license)
        .ok_or_else(|| EmbellishError::UnknownLicense(license.to_string()))?;

    let vars = HashMap::from([("year", year.to_string()), ("holder", holder.to_string())]);
    info!(license = %license.to_lowercase(), holder, "license rendered");
    Ok(Some(template::render(template, &vars)))
}

/// Where the project's license file lives.
pub fn license_path(base: &Path, settings: &Settings) -> PathBuf {
    base.join(&settings.license_file)
}

/// Overwrite the license file at `path` with `text`.
pub async fn write_license_file(path: &Path, text: &str) -> Result<()> {
    tokio::fs::write(path, text)
        .await
        .map_err(|e| EmbellishError::io(path, e))?;
    debug!(path = %path.display(), "license file written");
    Ok(())
}
