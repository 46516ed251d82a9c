use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::badges::{BadgeEntry, ProbeContext, default_entries, generate_badges};
use crate::error::{EmbellishError, Result};
use crate::license;
use crate::manifest::PackageData;
use crate::patcher;
use crate::settings::Settings;

/// Manifest file looked up next to the markdown document.
pub const MANIFEST_FILE: &str = "package.json";

/// What to embellish.
pub enum Source {
    /// A markdown file; `package.json` and `.embellish.toml` are read from its directory.
    File(PathBuf),
    /// Markdown text with already-loaded metadata.
    Content {
        content: String,
        base_path: PathBuf,
        package: PackageData,
    },
}

/// Output of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Embellished {
    pub markdown: String,
    pub license_text: Option<String>,
    /// Where `license_text` belongs. Set exactly when there is license text.
    pub license_file: Option<PathBuf>,
}

impl Embellished {
    /// Write `license_text` to `license_file`, returning the path written.
    pub async fn write_license(&self) -> Result<Option<&Path>> {
        match (&self.license_text, &self.license_file) {
            (Some(text), Some(path)) => {
                license::write_license_file(path, text).await?;
                Ok(Some(path))
            }
            _ => Ok(None),
        }
    }

    /// Files on disk that do not match this result: `readme` when its content
    /// differs from `markdown`, and the license file when it is missing or
    /// differs from `license_text`.
    pub async fn stale_files(&self, readme: &Path) -> Result<Vec<PathBuf>> {
        let mut stale = Vec::new();
        if read_if_present(readme).await?.as_deref() != Some(self.markdown.as_str()) {
            stale.push(readme.to_path_buf());
        }
        if let (Some(text), Some(path)) = (&self.license_text, &self.license_file) {
            if read_if_present(path).await?.as_deref() != Some(text.as_str()) {
                stale.push(path.clone());
            }
        }
        Ok(stale)
    }
}

/// Embellish with the standard badge layout and write the license file.
///
/// `settings` overrides the project's `.embellish.toml`.
pub async fn embellish(source: Source, settings: Option<Settings>) -> Result<Embellished> {
    embellish_with(source, settings, &default_entries()).await
}

pub async fn embellish_with(
    source: Source,
    settings: Option<Settings>,
    entries: &[BadgeEntry],
) -> Result<Embellished> {
    let result = render_with(source, settings, entries).await?;
    result.write_license().await?;
    Ok(result)
}

/// Like [`embellish`], but nothing is written to disk.
pub async fn render(source: Source, settings: Option<Settings>) -> Result<Embellished> {
    render_with(source, settings, &default_entries()).await
}

pub async fn render_with(
    source: Source,
    settings: Option<Settings>,
    entries: &[BadgeEntry],
) -> Result<Embellished> {
    let (content, base_path, package, settings) = match source {
        Source::File(path) => {
            let base_path = base_dir(&path);
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| EmbellishError::io(&path, e))?;
            let package = PackageData::read_from_file(base_path.join(MANIFEST_FILE)).await?;
            let settings = match settings {
                Some(settings) => settings,
                None => Settings::load(&base_path).await?,
            };
            (content, base_path, package, settings)
        }
        Source::Content {
            content,
            base_path,
            package,
        } => (content, base_path, package, settings.unwrap_or_default()),
    };

    // Fatal license problems surface before anything is touched.
    let license_text = license::resolve(&package)?;

    let mut doc = mdoc::parse(&content);
    let ctx = ProbeContext::new(package, &base_path, settings);
    let badges = generate_badges(entries, &ctx).await;

    patcher::apply_license(&mut doc, license_text.as_deref());
    patcher::apply_badges(&mut doc, badges);

    let license_file = license_text
        .as_ref()
        .map(|_| license::license_path(&base_path, &ctx.settings));

    info!(package = %ctx.data.name, "readme embellished");
    Ok(Embellished {
        markdown: doc.to_string(),
        license_text,
        license_file,
    })
}

async fn read_if_present(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(EmbellishError::io(path, e)),
    }
}

/// Directory holding `path`; `.` for bare file names.
pub fn base_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
