//! Content blocks as delivered by the CMS rich-text field.
//!
//! The JSON shape is a loose tree of `{ "type": ..., "children": [...] }`
//! nodes. Everything goes through [`RawNode`] so that absent and `null`
//! fields coalesce to empty values instead of failing the whole document.

use serde::{Deserialize, Serialize};

/// Independent inline style flags. Any combination may be active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// A single inline style flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
}

impl Marks {
    pub const NONE: Marks = Marks {
        bold: false,
        italic: false,
        underline: false,
    };

    pub fn is_empty(&self) -> bool {
        !(self.bold || self.italic || self.underline)
    }

    /// Active marks in a fixed order: bold, italic, underline.
    pub fn active(&self) -> impl Iterator<Item = Mark> + '_ {
        [
            (self.bold, Mark::Bold),
            (self.italic, Mark::Italic),
            (self.underline, Mark::Underline),
        ]
        .into_iter()
        .filter_map(|(on, mark)| on.then_some(mark))
    }

    pub fn with(mut self, mark: Mark) -> Self {
        match mark {
            Mark::Bold => self.bold = true,
            Mark::Italic => self.italic = true,
            Mark::Underline => self.underline = true,
        }
        self
    }
}

/// Inline content of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub enum Span {
    Text { text: String, marks: Marks },
    /// Hyperlink. Only the first child's text is shown as the label.
    Link { url: String, children: Vec<Span> },
}

impl Span {
    pub fn text(text: impl Into<String>) -> Self {
        Span::Text {
            text: text.into(),
            marks: Marks::NONE,
        }
    }

    pub fn styled(text: impl Into<String>, marks: Marks) -> Self {
        Span::Text {
            text: text.into(),
            marks,
        }
    }

    pub fn link(url: impl Into<String>, label: impl Into<String>) -> Self {
        Span::Link {
            url: url.into(),
            children: vec![Span::text(label)],
        }
    }

    /// The visible label of a link: the first child's own text, or "".
    pub fn link_label(children: &[Span]) -> &str {
        match children.first() {
            Some(Span::Text { text, .. }) => text,
            _ => "",
        }
    }

    /// Text shown for this span with styling dropped.
    pub fn plain_text(&self) -> &str {
        match self {
            Span::Text { text, .. } => text,
            Span::Link { children, .. } => Span::link_label(children),
        }
    }
}

/// One entry of a list block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub struct ListItem {
    pub children: Vec<Span>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFormat {
    Ordered,
    #[default]
    Unordered,
}

impl ListFormat {
    /// `"ordered"` selects a numbered list; anything else, including
    /// absence, is bulleted.
    pub fn from_wire(format: Option<&str>) -> Self {
        match format {
            Some("ordered") => ListFormat::Ordered,
            _ => ListFormat::Unordered,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            ListFormat::Ordered => "ordered",
            ListFormat::Unordered => "unordered",
        }
    }
}

/// A top level block of a rich-text field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub enum ContentBlock {
    Paragraph {
        children: Vec<Span>,
    },
    Heading {
        /// Stored as delivered; rank mapping happens at render time.
        level: i64,
        children: Vec<Span>,
    },
    List {
        format: ListFormat,
        children: Vec<ListItem>,
    },
    /// Any block type this crate does not know, kept with its type name.
    Other {
        kind: String,
        children: Vec<Span>,
    },
}

impl ContentBlock {
    pub fn paragraph(children: Vec<Span>) -> Self {
        ContentBlock::Paragraph { children }
    }

    pub fn heading(level: i64, children: Vec<Span>) -> Self {
        ContentBlock::Heading { level, children }
    }

    pub fn list(format: ListFormat, items: Vec<Vec<Span>>) -> Self {
        ContentBlock::List {
            format,
            children: items
                .into_iter()
                .map(|children| ListItem { children })
                .collect(),
        }
    }

    /// Wire discriminant of this block.
    pub fn kind(&self) -> &str {
        match self {
            ContentBlock::Paragraph { .. } => PARAGRAPH,
            ContentBlock::Heading { .. } => HEADING,
            ContentBlock::List { .. } => LIST,
            ContentBlock::Other { kind, .. } => kind,
        }
    }

    /// Inline spans of a non-list block. Lists have none of their own.
    pub fn spans(&self) -> &[Span] {
        match self {
            ContentBlock::Paragraph { children }
            | ContentBlock::Heading { children, .. }
            | ContentBlock::Other { children, .. } => children,
            ContentBlock::List { .. } => &[],
        }
    }
}

const PARAGRAPH: &str = "paragraph";
const HEADING: &str = "heading";
const LIST: &str = "list";
const LIST_ITEM: &str = "list-item";
const LINK: &str = "link";
const TEXT: &str = "text";

/// Untyped wire node shared by blocks, list items and spans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<RawNode>>,
}

impl RawNode {
    fn into_spans(children: Option<Vec<RawNode>>) -> Vec<Span> {
        children
            .unwrap_or_default()
            .into_iter()
            .map(Span::from)
            .collect()
    }

    fn from_spans(spans: Vec<Span>) -> Option<Vec<RawNode>> {
        Some(spans.into_iter().map(RawNode::from).collect())
    }
}

impl From<RawNode> for Span {
    fn from(raw: RawNode) -> Self {
        if raw.kind.as_deref() == Some(LINK) {
            return Span::Link {
                url: raw.url.unwrap_or_default(),
                children: RawNode::into_spans(raw.children),
            };
        }
        Span::Text {
            text: raw.text.unwrap_or_default(),
            marks: Marks {
                bold: raw.bold.unwrap_or(false),
                italic: raw.italic.unwrap_or(false),
                underline: raw.underline.unwrap_or(false),
            },
        }
    }
}

impl From<Span> for RawNode {
    fn from(span: Span) -> Self {
        match span {
            Span::Text { text, marks } => RawNode {
                kind: Some(TEXT.to_string()),
                text: Some(text),
                bold: marks.bold.then_some(true),
                italic: marks.italic.then_some(true),
                underline: marks.underline.then_some(true),
                ..RawNode::default()
            },
            Span::Link { url, children } => RawNode {
                kind: Some(LINK.to_string()),
                url: Some(url),
                children: RawNode::from_spans(children),
                ..RawNode::default()
            },
        }
    }
}

impl From<RawNode> for ListItem {
    fn from(raw: RawNode) -> Self {
        ListItem {
            children: RawNode::into_spans(raw.children),
        }
    }
}

impl From<ListItem> for RawNode {
    fn from(item: ListItem) -> Self {
        RawNode {
            kind: Some(LIST_ITEM.to_string()),
            children: RawNode::from_spans(item.children),
            ..RawNode::default()
        }
    }
}

impl From<RawNode> for ContentBlock {
    fn from(raw: RawNode) -> Self {
        match raw.kind.as_deref() {
            Some(PARAGRAPH) => ContentBlock::Paragraph {
                children: RawNode::into_spans(raw.children),
            },
            Some(HEADING) => ContentBlock::Heading {
                level: raw.level.unwrap_or(1),
                children: RawNode::into_spans(raw.children),
            },
            Some(LIST) => ContentBlock::List {
                format: ListFormat::from_wire(raw.format.as_deref()),
                children: raw
                    .children
                    .unwrap_or_default()
                    .into_iter()
                    .map(ListItem::from)
                    .collect(),
            },
            _ => ContentBlock::Other {
                kind: raw.kind.unwrap_or_default(),
                children: RawNode::into_spans(raw.children),
            },
        }
    }
}

impl From<ContentBlock> for RawNode {
    fn from(block: ContentBlock) -> Self {
        match block {
            ContentBlock::Paragraph { children } => RawNode {
                kind: Some(PARAGRAPH.to_string()),
                children: RawNode::from_spans(children),
                ..RawNode::default()
            },
            ContentBlock::Heading { level, children } => RawNode {
                kind: Some(HEADING.to_string()),
                level: Some(level),
                children: RawNode::from_spans(children),
                ..RawNode::default()
            },
            ContentBlock::List { format, children } => RawNode {
                kind: Some(LIST.to_string()),
                format: Some(format.as_wire().to_string()),
                children: Some(children.into_iter().map(RawNode::from).collect()),
                ..RawNode::default()
            },
            ContentBlock::Other { kind, children } => RawNode {
                kind: Some(kind),
                children: RawNode::from_spans(children),
                ..RawNode::default()
            },
        }
    }
}
