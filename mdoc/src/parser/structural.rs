use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser as CmarkParser, Tag, TagEnd};

use crate::document::{Document, DocumentNode, InlineNode};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse Markdown source text into a flat sequence of top-level blocks.
pub fn parse_document(source: &str) -> Document {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let parser = CmarkParser::new_ext(source, options);
    let events: Vec<(Event<'_>, Range<usize>)> = parser.into_offset_iter().collect();

    let mut state = ParseState::new(source);
    state.process_events(&events);
    state.finalize()
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

struct ParseState<'a> {
    source: &'a str,
    nodes: Vec<DocumentNode>,
    /// Byte offset just past the last top-level block consumed.
    cursor: usize,
}

impl<'a> ParseState<'a> {
    fn new(source: &'a str) -> Self {
        ParseState {
            source,
            nodes: Vec::new(),
            cursor: 0,
        }
    }

    fn process_events(&mut self, events: &[(Event<'_>, Range<usize>)]) {
        let mut i = 0;

        while i < events.len() {
            let (ref ev, ref range) = events[i];

            match ev {
                Event::Start(Tag::Heading { level, .. }) => {
                    let level = heading_level_to_u8(level);
                    i += 1;
                    let content =
                        collect_inlines(events, &mut i, &|e| matches!(e, TagEnd::Heading(_)));
                    let source = self.take_source(range);
                    self.nodes.push(DocumentNode::Heading {
                        level,
                        content,
                        source: Some(source),
                    });
                }

                Event::Start(Tag::Paragraph) => {
                    i += 1;
                    let content =
                        collect_inlines(events, &mut i, &|e| matches!(e, TagEnd::Paragraph));
                    let source = self.take_source(range);
                    self.nodes.push(DocumentNode::Paragraph {
                        content,
                        source: Some(source),
                    });
                }

                // Lists, code blocks, tables, quotes, HTML blocks: kept verbatim
                Event::Start(_) => {
                    i += 1;
                    skip_to_matching_end(events, &mut i);
                    let raw = self.take_source(range);
                    self.push_opaque(&raw);
                }

                Event::End(_) => {
                    i += 1;
                }

                // Leaf blocks such as thematic breaks
                _ => {
                    let raw = self.take_source(range);
                    self.push_opaque(&raw);
                    i += 1;
                }
            }
        }
    }

    /// Slice the source for a top-level block, first keeping any text the
    /// event stream skipped over (link reference definitions and the like).
    fn take_source(&mut self, range: &Range<usize>) -> String {
        if range.start > self.cursor {
            let gap = self.source[self.cursor..range.start].to_string();
            self.push_opaque(&gap);
        }
        let start = range.start.max(self.cursor).min(range.end);
        self.cursor = self.cursor.max(range.end);
        self.source[start..range.end].to_string()
    }

    fn push_opaque(&mut self, raw: &str) {
        if raw.trim().is_empty() {
            return;
        }
        let raw = raw.trim_start_matches(['\n', '\r']).trim_end();
        self.nodes.push(DocumentNode::Opaque(raw.to_string()));
    }

    fn finalize(mut self) -> Document {
        if self.cursor < self.source.len() {
            let tail = self.source[self.cursor..].to_string();
            self.push_opaque(&tail);
        }
        Document { nodes: self.nodes }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn heading_level_to_u8(level: &HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Advance past the End event that closes an already-consumed Start.
fn skip_to_matching_end(events: &[(Event<'_>, Range<usize>)], i: &mut usize) {
    let mut depth = 1u32;
    while *i < events.len() {
        match events[*i].0 {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    *i += 1;
                    return;
                }
            }
            _ => {}
        }
        *i += 1;
    }
}

/// Collect inline nodes until a matching End tag.
fn collect_inlines(
    events: &[(Event<'_>, Range<usize>)],
    i: &mut usize,
    is_end: &dyn Fn(&TagEnd) -> bool,
) -> Vec<InlineNode> {
    let mut inlines = Vec::new();

    while *i < events.len() {
        let (ref ev, ref _range) = events[*i];
        match ev {
            Event::End(tag_end) if is_end(tag_end) => {
                *i += 1;
                break;
            }
            Event::Text(s) => {
                inlines.push(InlineNode::Text(s.to_string()));
                *i += 1;
            }
            Event::InlineHtml(s) => {
                inlines.push(InlineNode::Text(s.to_string()));
                *i += 1;
            }
            Event::Code(s) => {
                inlines.push(InlineNode::CodeSpan(s.to_string()));
                *i += 1;
            }
            Event::SoftBreak => {
                inlines.push(InlineNode::SoftBreak);
                *i += 1;
            }
            Event::HardBreak => {
                inlines.push(InlineNode::HardBreak);
                *i += 1;
            }
            Event::Start(Tag::Strong) => {
                *i += 1;
                let children = collect_inlines(events, i, &|e| matches!(e, TagEnd::Strong));
                inlines.push(InlineNode::Strong(children));
            }
            Event::Start(Tag::Emphasis) => {
                *i += 1;
                let children = collect_inlines(events, i, &|e| matches!(e, TagEnd::Emphasis));
                inlines.push(InlineNode::Emphasis(children));
            }
            Event::Start(Tag::Strikethrough) => {
                *i += 1;
                let children =
                    collect_inlines(events, i, &|e| matches!(e, TagEnd::Strikethrough));
                inlines.push(InlineNode::Strikethrough(children));
            }
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) => {
                let dest = dest_url.to_string();
                let title = title.to_string();
                *i += 1;
                let content = collect_inlines(events, i, &|e| matches!(e, TagEnd::Link));
                inlines.push(InlineNode::Link {
                    dest,
                    title,
                    content,
                });
            }
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                let dest = dest_url.to_string();
                let title = title.to_string();
                *i += 1;
                let alt = collect_inlines(events, i, &|e| matches!(e, TagEnd::Image));
                inlines.push(InlineNode::Image { dest, title, alt });
            }
            _ => {
                *i += 1;
            }
        }
    }

    inlines
}
