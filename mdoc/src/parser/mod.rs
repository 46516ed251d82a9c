mod structural;

use crate::document::{Document, DocumentNode, InlineNode};

/// Parser entry point.
pub struct Parser {
    source: String,
}

impl Parser {
    pub fn new(source: impl Into<String>) -> Self {
        Parser {
            source: source.into(),
        }
    }

    /// Parse the source Markdown into a flat Document.
    ///
    /// CommonMark accepts every input, so parsing cannot fail.
    pub fn parse(&self) -> Document {
        structural::parse_document(&self.source)
    }
}

/// Inline spans of the first paragraph in a markdown fragment.
///
/// Returns an empty list when the fragment holds no paragraph.
pub fn parse_inline_fragment(fragment: &str) -> Vec<InlineNode> {
    structural::parse_document(fragment)
        .nodes
        .into_iter()
        .find_map(|node| match node {
            DocumentNode::Paragraph { content, .. } => Some(content),
            _ => None,
        })
        .unwrap_or_default()
}
