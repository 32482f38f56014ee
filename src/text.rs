use crate::block::{ContentBlock, Span};

/// Text of the first span of the first block, or "" when there is none.
///
/// This is the summary shown on cards, in search results and in page
/// descriptions.
pub fn excerpt(blocks: &[ContentBlock]) -> &str {
    let Some(first) = blocks.first() else {
        return "";
    };
    let span = match first {
        ContentBlock::List { children, .. } => children.first().and_then(|i| i.children.first()),
        block => block.spans().first(),
    };
    span.map(Span::plain_text).unwrap_or("")
}

/// All text of a document with styling dropped. Blocks are separated by
/// a blank line, list items by a newline.
pub fn plain_text(blocks: &[ContentBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        match block {
            ContentBlock::List { children, .. } => {
                for (i, item) in children.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    push_spans(&item.children, &mut out);
                }
            }
            block => push_spans(block.spans(), &mut out),
        }
    }
    out
}

fn push_spans(spans: &[Span], out: &mut String) {
    for span in spans {
        out.push_str(span.plain_text());
    }
}
