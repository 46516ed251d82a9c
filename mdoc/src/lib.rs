pub mod document;
pub mod parser;

pub use document::{Document, DocumentNode, InlineNode};
pub use parser::{Parser, parse_inline_fragment};

/// Parse markdown source into a Document.
pub fn parse(source: &str) -> Document {
    Parser::new(source).parse()
}
