//! Structural edits on a parsed document: the license section body and the
//! badge block under the document title.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use mdoc::{Document, DocumentNode, InlineNode};

static LICENSE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^licen(c|s)e$").expect("license heading pattern is valid"));

/// Index of the first heading titled "License" or "Licence", any case.
pub fn find_license_heading(doc: &Document) -> Option<usize> {
    doc.nodes.iter().position(|node| {
        node.heading_text()
            .is_some_and(|text| LICENSE_HEADING.is_match(&text))
    })
}

/// Index of the first heading below the document title (level 2 or deeper).
pub fn find_badge_anchor(doc: &Document) -> Option<usize> {
    doc.nodes
        .iter()
        .position(|node| node.heading_level().is_some_and(|level| level > 1))
}

/// Replace everything after the license heading with `license_text`.
///
/// The license section is treated as the last section of the document. When
/// there is no license heading, or no text, nothing changes. Returns whether
/// the document was modified.
pub fn apply_license(doc: &mut Document, license_text: Option<&str>) -> bool {
    let Some(text) = license_text.filter(|t| !t.trim().is_empty()) else {
        return false;
    };
    let Some(index) = find_license_heading(doc) else {
        debug!("no license heading, license section left alone");
        return false;
    };

    debug!(index, "replacing license section");
    doc.nodes.truncate(index + 1);
    doc.nodes.push(DocumentNode::text_paragraph(text.trim_end()));
    true
}

/// Insert `badges` in order just above the first secondary heading (or at the
/// end of the document), then drop badge-only paragraphs sitting directly
/// above the new block so repeated runs do not stack badges.
///
/// The scan also runs for an empty list, so badges left by an earlier run
/// disappear once the project no longer earns any.
pub fn apply_badges(doc: &mut Document, badges: Vec<DocumentNode>) {
    let anchor = find_badge_anchor(doc).unwrap_or(doc.nodes.len());
    debug!(anchor, count = badges.len(), "inserting badges");
    doc.nodes.splice(anchor..anchor, badges);

    let mut index = anchor;
    while index > 0 && is_badge_paragraph(&doc.nodes[index - 1]) {
        doc.nodes.remove(index - 1);
        index -= 1;
    }
}

/// True for a paragraph made only of badge links, with whitespace between them.
pub fn is_badge_paragraph(node: &DocumentNode) -> bool {
    let Some(content) = node.paragraph_content() else {
        return false;
    };
    let mut spans = content.iter().filter(|span| !span.is_blank()).peekable();
    spans.peek().is_some() && spans.all(is_badge_link)
}

/// A link to a non-empty address whose label is an image.
///
/// Plain text links do not count, so a paragraph of hand-written links such
/// as `[docs](https://example.com)` is kept by the scan in [`apply_badges`].
pub fn is_badge_link(span: &InlineNode) -> bool {
    match span {
        InlineNode::Link { dest, content, .. } => {
            !dest.trim().is_empty() && content.iter().any(InlineNode::contains_image)
        }
        _ => false,
    }
}
