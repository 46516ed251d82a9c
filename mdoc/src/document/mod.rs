use std::fmt;

/// A Document is the flat, ordered sequence of top-level Markdown blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub nodes: Vec<DocumentNode>,
}

impl Document {
    pub fn empty() -> Self {
        Document { nodes: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl From<Vec<DocumentNode>> for Document {
    fn from(nodes: Vec<DocumentNode>) -> Self {
        Document { nodes }
    }
}

/// A single top-level block.
///
/// Only headings and paragraphs are modelled structurally. Every other block
/// kind is carried as `Opaque` markdown and is written back untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentNode {
    Heading {
        level: u8,
        content: Vec<InlineNode>,
        /// Verbatim markdown the heading was parsed from.
        source: Option<String>,
    },
    Paragraph {
        content: Vec<InlineNode>,
        /// Verbatim markdown the paragraph was parsed from.
        source: Option<String>,
    },
    Opaque(String),
}

impl DocumentNode {
    /// A generated heading.
    pub fn heading(level: u8, content: Vec<InlineNode>) -> Self {
        DocumentNode::Heading {
            level,
            content,
            source: None,
        }
    }

    /// A generated paragraph.
    pub fn paragraph(content: Vec<InlineNode>) -> Self {
        DocumentNode::Paragraph {
            content,
            source: None,
        }
    }

    /// A generated paragraph holding one literal text span.
    pub fn text_paragraph(text: impl Into<String>) -> Self {
        DocumentNode::paragraph(vec![InlineNode::Text(text.into())])
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, DocumentNode::Heading { .. })
    }

    /// Heading level, or `None` for non-heading nodes.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            DocumentNode::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }

    /// Plain text of a heading: text and code spans concatenated, markup dropped.
    ///
    /// Surrounding whitespace is trimmed, so `## **License** ` yields
    /// `License`. Callers matching titles see this normalized form, not the
    /// raw heading source.
    pub fn heading_text(&self) -> Option<String> {
        match self {
            DocumentNode::Heading { content, .. } => {
                let mut text = String::new();
                for inline in content {
                    inline.push_plain_text(&mut text);
                }
                Some(text.trim().to_string())
            }
            _ => None,
        }
    }

    /// Inline spans of a paragraph.
    pub fn paragraph_content(&self) -> Option<&[InlineNode]> {
        match self {
            DocumentNode::Paragraph { content, .. } => Some(content),
            _ => None,
        }
    }
}

/// Inline elements that appear within a line of text.
/// Inline types nest freely within one another.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineNode {
    Text(String),
    Strong(Vec<InlineNode>),
    Emphasis(Vec<InlineNode>),
    Strikethrough(Vec<InlineNode>),
    CodeSpan(String),
    Link {
        dest: String,
        title: String,
        content: Vec<InlineNode>,
    },
    Image {
        dest: String,
        title: String,
        alt: Vec<InlineNode>,
    },
    SoftBreak,
    HardBreak,
}

impl InlineNode {
    /// True for separators: whitespace-only text and line breaks.
    pub fn is_blank(&self) -> bool {
        match self {
            InlineNode::Text(s) => s.trim().is_empty(),
            InlineNode::SoftBreak | InlineNode::HardBreak => true,
            _ => false,
        }
    }

    /// True if this span is, or contains, an image.
    pub fn contains_image(&self) -> bool {
        match self {
            InlineNode::Image { .. } => true,
            InlineNode::Strong(children)
            | InlineNode::Emphasis(children)
            | InlineNode::Strikethrough(children) => children.iter().any(InlineNode::contains_image),
            InlineNode::Link { content, .. } => content.iter().any(InlineNode::contains_image),
            _ => false,
        }
    }

    fn push_plain_text(&self, out: &mut String) {
        match self {
            InlineNode::Text(s) | InlineNode::CodeSpan(s) => out.push_str(s),
            InlineNode::Strong(children)
            | InlineNode::Emphasis(children)
            | InlineNode::Strikethrough(children) => {
                for child in children {
                    child.push_plain_text(out);
                }
            }
            InlineNode::Link { content, .. } => {
                for child in content {
                    child.push_plain_text(out);
                }
            }
            InlineNode::Image { alt, .. } => {
                for child in alt {
                    child.push_plain_text(out);
                }
            }
            InlineNode::SoftBreak | InlineNode::HardBreak => out.push(' '),
        }
    }
}

/// Serializes back to markdown. Blocks are separated by one blank line and
/// the output ends with a single newline.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", node)?;
        }
        Ok(())
    }
}

impl fmt::Display for DocumentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentNode::Heading {
                source: Some(raw), ..
            }
            | DocumentNode::Paragraph {
                source: Some(raw), ..
            }
            | DocumentNode::Opaque(raw) => write!(f, "{}", raw.trim_end()),
            DocumentNode::Heading {
                level,
                content,
                source: None,
            } => {
                for _ in 0..*level {
                    write!(f, "#")?;
                }
                write!(f, " ")?;
                write_inlines(f, content)
            }
            DocumentNode::Paragraph {
                content,
                source: None,
            } => {
                let mut text = String::new();
                for inline in content {
                    text.push_str(&inline.to_string());
                }
                write!(f, "{}", text.trim_end())
            }
        }
    }
}

fn write_inlines(f: &mut fmt::Formatter<'_>, inlines: &[InlineNode]) -> fmt::Result {
    for inline in inlines {
        write!(f, "{}", inline)?;
    }
    Ok(())
}

fn write_destination(f: &mut fmt::Formatter<'_>, dest: &str, title: &str) -> fmt::Result {
    if title.is_empty() {
        write!(f, "({})", dest)
    } else {
        write!(f, "({} \"{}\")", dest, title.replace('"', "\\\""))
    }
}

impl fmt::Display for InlineNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InlineNode::Text(s) => write!(f, "{}", s),
            InlineNode::Strong(children) => {
                write!(f, "**")?;
                write_inlines(f, children)?;
                write!(f, "**")
            }
            InlineNode::Emphasis(children) => {
                write!(f, "*")?;
                write_inlines(f, children)?;
                write!(f, "*")
            }
            InlineNode::Strikethrough(children) => {
                write!(f, "~~")?;
                write_inlines(f, children)?;
                write!(f, "~~")
            }
            InlineNode::CodeSpan(code) => write!(f, "`{}`", code),
            InlineNode::Link {
                dest,
                title,
                content,
            } => {
                write!(f, "[")?;
                write_inlines(f, content)?;
                write!(f, "]")?;
                write_destination(f, dest, title)
            }
            InlineNode::Image { dest, title, alt } => {
                write!(f, "![")?;
                write_inlines(f, alt)?;
                write!(f, "]")?;
                write_destination(f, dest, title)
            }
            InlineNode::SoftBreak => writeln!(f),
            InlineNode::HardBreak => {
                write!(f, "  ")?;
                writeln!(f)
            }
        }
    }
}
