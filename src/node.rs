use crate::block::Marks;

/// Structural heading rank, always within 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingRank(u8);

impl HeadingRank {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// Map a CMS heading level to a rank, clamping out of range values.
    pub fn from_level(level: i64) -> Self {
        let clamped = level.clamp(Self::MIN as i64, Self::MAX as i64);
        if clamped != level {
            log::warn!("heading level {level} out of range, rendering as h{clamped}");
        }
        HeadingRank(clamped as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn tag(self) -> &'static str {
        match self.0 {
            1 => "h1",
            2 => "h2",
            3 => "h3",
            4 => "h4",
            5 => "h5",
            _ => "h6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Numbered,
    Bulleted,
}

/// Renderable output of a block or span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiNode {
    Paragraph(Vec<UiNode>),
    Heading {
        rank: HeadingRank,
        children: Vec<UiNode>,
    },
    List {
        kind: ListKind,
        items: Vec<Vec<UiNode>>,
    },
    /// Fallback container for a block type with no dedicated rendering.
    /// Children are unstyled text.
    Unsupported {
        kind: String,
        children: Vec<UiNode>,
    },
    Text {
        text: String,
        marks: Marks,
    },
    /// Hyperlink opening in a new browsing context without a referrer.
    Link {
        href: String,
        label: String,
    },
}

impl UiNode {
    pub fn is_inline(&self) -> bool {
        matches!(self, UiNode::Text { .. } | UiNode::Link { .. })
    }
}
