use std::ops::Range;
use std::path::PathBuf;

use codespan_reporting::diagnostic::{Diagnostic, Label};

pub type Result<T> = std::result::Result<T, EmbellishError>;

/// Fatal errors. Anything that merely degrades output is an `Option`, not one of these.
#[derive(Debug, thiserror::Error)]
pub enum EmbellishError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("license template for {0} not found. Consider submitting an embellish template")]
    UnknownLicense(String),

    #[error("invalid settings in {path}: {message}")]
    Settings { path: PathBuf, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EmbellishError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EmbellishError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A manifest that could not be decoded, with the location serde reported.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unable to decode package data in {}: {message}", path.display())]
pub struct ManifestError {
    pub message: String,
    pub path: PathBuf,
    /// Byte span of the offending value within the manifest source.
    pub span: Range<usize>,
    /// The manifest text, kept for diagnostic rendering.
    pub source_text: String,
}

impl ManifestError {
    pub fn from_serde(err: &serde_json::Error, source_text: &str, path: impl Into<PathBuf>) -> Self {
        let offset = byte_offset(source_text, err.line(), err.column());
        let end = (offset + 1).min(source_text.len());
        ManifestError {
            message: err.to_string(),
            path: path.into(),
            span: offset.min(end)..end,
            source_text: source_text.to_string(),
        }
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message("unable to decode package data")
            .with_labels(vec![
                Label::primary(file_id, self.span.clone()).with_message(&self.message),
            ])
            .with_notes(vec![
                "required: `name`, `author`; `stability` must be one of deprecated, experimental, unstable, stable, frozen, locked".to_string(),
            ])
    }
}

/// Translate serde's 1-based line / column into a byte offset.
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_offset_follows_lines() {
        let src = "{\n  \"name\": 3\n}";
        assert_eq!(byte_offset(src, 1, 1), 0);
        assert_eq!(byte_offset(src, 2, 3), 4);
        assert_eq!(byte_offset(src, 0, 0), 0);
        assert_eq!(byte_offset(src, 9, 9), src.len());
    }
}
