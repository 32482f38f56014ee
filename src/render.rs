//! The structured content renderer: CMS blocks in, UI nodes out.
//!
//! Pure and stateless. Output order always mirrors input order.

use crate::block::{ContentBlock, ListFormat, Marks, Span};
use crate::node::{HeadingRank, ListKind, UiNode};

/// Render a sequence of blocks. Empty input renders to nothing.
pub fn render(blocks: &[ContentBlock]) -> Vec<UiNode> {
    blocks.iter().map(render_block).collect()
}

pub fn render_block(block: &ContentBlock) -> UiNode {
    match block {
        ContentBlock::Paragraph { children } => UiNode::Paragraph(render_spans(children)),
        ContentBlock::Heading { level, children } => UiNode::Heading {
            rank: HeadingRank::from_level(*level),
            children: render_spans(children),
        },
        ContentBlock::List { format, children } => UiNode::List {
            kind: match format {
                ListFormat::Ordered => ListKind::Numbered,
                ListFormat::Unordered => ListKind::Bulleted,
            },
            items: children
                .iter()
                .map(|item| render_spans(&item.children))
                .collect(),
        },
        ContentBlock::Other { kind, children } => {
            log::debug!("no renderer for block type {kind:?}, falling back to plain text");
            UiNode::Unsupported {
                kind: kind.clone(),
                children: children
                    .iter()
                    .map(|span| UiNode::Text {
                        text: span.plain_text().to_string(),
                        marks: Marks::NONE,
                    })
                    .collect(),
            }
        }
    }
}

pub fn render_span(span: &Span) -> UiNode {
    match span {
        Span::Link { url, children } => UiNode::Link {
            href: url.clone(),
            label: Span::link_label(children).to_string(),
        },
        Span::Text { text, marks } => UiNode::Text {
            text: text.clone(),
            marks: *marks,
        },
    }
}

fn render_spans(spans: &[Span]) -> Vec<UiNode> {
    spans.iter().map(render_span).collect()
}
