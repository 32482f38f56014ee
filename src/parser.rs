use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::block::{ContentBlock, ListFormat, ListItem, Mark, Marks, Span};

/// Strip YAML frontmatter from the beginning of markdown content
fn strip_frontmatter(markdown: &str) -> &str {
    if !markdown.starts_with("---") {
        return markdown;
    }
    // Find the closing ---
    if let Some(end) = markdown[3..].find("\n---") {
        let after_frontmatter = &markdown[3 + end + 4..];
        after_frontmatter.trim_start_matches('\n')
    } else {
        markdown
    }
}

/// Parse markdown text into CMS content blocks
pub fn parse(markdown: &str) -> Vec<ContentBlock> {
    let markdown = strip_frontmatter(markdown);
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut blocks = Vec::new();
    let mut state = ParseState::default();

    for event in parser {
        process_event(event, &mut state, &mut blocks);
    }

    blocks
}

#[derive(Default)]
struct ParseState {
    // Current inline content being built
    spans: Vec<Span>,
    // Open emphasis/strong, innermost last
    mark_stack: Vec<Mark>,

    heading_level: Option<i64>,

    in_code_block: bool,
    code_content: String,

    // Open link: destination and label spans
    link: Option<(String, Vec<Span>)>,

    // Block quotes collapse into a single fallback block; everything
    // nested inside one is folded into its text
    quote_depth: usize,
    quote_spans: Vec<Span>,

    list_stack: Vec<ListBuilder>,
}

struct ListBuilder {
    ordered: bool,
    items: Vec<ListItem>,
    current_item_spans: Vec<Span>,
}

impl ParseState {
    fn marks(&self) -> Marks {
        self.mark_stack
            .iter()
            .fold(Marks::NONE, |marks, mark| marks.with(*mark))
    }

    /// Append text, merging with the previous span when styling matches.
    fn push_text(&mut self, text: &str) {
        let marks = self.marks();
        let target = match self.link.as_mut() {
            Some((_, label)) => label,
            None => &mut self.spans,
        };
        if let Some(Span::Text {
            text: previous,
            marks: previous_marks,
        }) = target.last_mut()
        {
            if *previous_marks == marks {
                previous.push_str(text);
                return;
            }
        }
        target.push(Span::styled(text, marks));
    }
}

/// Append `content` to `target`, separated by a space when both are non-empty.
fn join_spans(target: &mut Vec<Span>, content: Vec<Span>) {
    if !target.is_empty() && !content.is_empty() {
        target.push(Span::text(" "));
    }
    target.extend(content);
}

/// Emit a block, or fold its text into the enclosing list item or quote.
/// Neither can hold nested blocks in the CMS schema, so headings, code and
/// paragraphs inside them become part of their text.
fn fold_or_push(
    state: &mut ParseState,
    blocks: &mut Vec<ContentBlock>,
    children: Vec<Span>,
    block: impl FnOnce(Vec<Span>) -> ContentBlock,
) {
    if let Some(list) = state.list_stack.last_mut() {
        join_spans(&mut list.current_item_spans, children);
    } else if state.quote_depth > 0 {
        join_spans(&mut state.quote_spans, children);
    } else {
        blocks.push(block(children));
    }
}

fn process_event(event: Event, state: &mut ParseState, blocks: &mut Vec<ContentBlock>) {
    match event {
        // Headings
        Event::Start(Tag::Heading { level, .. }) => {
            state.heading_level = Some(heading_level_to_i64(level));
        }
        Event::End(TagEnd::Heading(_)) => {
            if let Some(level) = state.heading_level.take() {
                let children = std::mem::take(&mut state.spans);
                fold_or_push(state, blocks, children, |children| ContentBlock::Heading {
                    level,
                    children,
                });
            }
        }

        // Paragraphs
        Event::Start(Tag::Paragraph) => {}
        Event::End(TagEnd::Paragraph) => {
            let content = std::mem::take(&mut state.spans);
            if content.is_empty() {
                return;
            }
            fold_or_push(state, blocks, content, |children| ContentBlock::Paragraph {
                children,
            });
        }

        Event::Text(text) => {
            if state.in_code_block {
                state.code_content.push_str(&text);
            } else {
                state.push_text(&text);
            }
        }

        // Inline code has no mark of its own in the CMS schema
        Event::Code(code) => state.push_text(&code),

        Event::Start(Tag::Strong) => state.mark_stack.push(Mark::Bold),
        Event::Start(Tag::Emphasis) => state.mark_stack.push(Mark::Italic),
        Event::End(TagEnd::Strong) | Event::End(TagEnd::Emphasis) => {
            state.mark_stack.pop();
        }

        // Links
        Event::Start(Tag::Link { dest_url, .. }) => {
            state.link = Some((dest_url.into_string(), Vec::new()));
        }
        Event::End(TagEnd::Link) => {
            if let Some((url, children)) = state.link.take() {
                state.spans.push(Span::Link { url, children });
            }
        }

        // Code blocks
        Event::Start(Tag::CodeBlock(_)) => {
            state.in_code_block = true;
            state.code_content.clear();
        }
        Event::End(TagEnd::CodeBlock) => {
            state.in_code_block = false;
            let content = std::mem::take(&mut state.code_content);
            let children = vec![Span::text(content.trim_end_matches('\n'))];
            fold_or_push(state, blocks, children, |children| ContentBlock::Other {
                kind: "code".to_string(),
                children,
            });
        }

        // Block quotes
        Event::Start(Tag::BlockQuote(_)) => {
            state.quote_depth += 1;
        }
        Event::End(TagEnd::BlockQuote(_)) => {
            state.quote_depth = state.quote_depth.saturating_sub(1);
            if state.quote_depth == 0 {
                let children = std::mem::take(&mut state.quote_spans);
                blocks.push(ContentBlock::Other {
                    kind: "quote".to_string(),
                    children,
                });
            }
        }

        // Lists
        Event::Start(Tag::List(first_item)) => {
            // Text of the enclosing item comes before the nested entries
            if let Some(parent) = state.list_stack.last_mut() {
                let pending = std::mem::take(&mut state.spans);
                join_spans(&mut parent.current_item_spans, pending);
            }
            state.list_stack.push(ListBuilder {
                ordered: first_item.is_some(),
                items: Vec::new(),
                current_item_spans: Vec::new(),
            });
        }
        Event::End(TagEnd::List(_)) => {
            let Some(list) = state.list_stack.pop() else {
                return;
            };
            // The CMS list has one level: nested entries follow their parent
            if let Some(parent) = state.list_stack.last_mut() {
                let parent_text = std::mem::take(&mut parent.current_item_spans);
                if !parent_text.is_empty() {
                    parent.items.push(ListItem {
                        children: parent_text,
                    });
                }
                parent.items.extend(list.items);
            } else if state.quote_depth > 0 {
                for item in list.items {
                    join_spans(&mut state.quote_spans, item.children);
                }
            } else {
                let format = if list.ordered {
                    ListFormat::Ordered
                } else {
                    ListFormat::Unordered
                };
                blocks.push(ContentBlock::List {
                    format,
                    children: list.items,
                });
            }
        }

        Event::Start(Tag::Item) => {
            if let Some(list) = state.list_stack.last_mut() {
                list.current_item_spans.clear();
            }
        }
        Event::End(TagEnd::Item) => {
            // Collect any remaining spans
            let remaining = std::mem::take(&mut state.spans);

            if let Some(list) = state.list_stack.last_mut() {
                join_spans(&mut list.current_item_spans, remaining);
                let children = std::mem::take(&mut list.current_item_spans);
                if !children.is_empty() {
                    list.items.push(ListItem { children });
                }
            }
        }

        Event::SoftBreak => state.push_text(" "),
        Event::HardBreak => state.push_text("\n"),

        // Rules, HTML and footnotes have no CMS counterpart
        _ => {}
    }
}

fn heading_level_to_i64(level: HeadingLevel) -> i64 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bold() -> Marks {
        Marks::NONE.with(Mark::Bold)
    }

    #[test]
    fn heading_and_paragraph() {
        assert_eq!(
            parse("## Our story\n\nFounded in Dubai."),
            vec![
                ContentBlock::heading(2, vec![Span::text("Our story")]),
                ContentBlock::paragraph(vec![Span::text("Founded in Dubai.")]),
            ]
        );
    }

    #[test]
    fn nested_emphasis_merges_marks() {
        assert_eq!(
            parse("plain **bold *both*** end"),
            vec![ContentBlock::paragraph(vec![
                Span::text("plain "),
                Span::styled("bold ", bold()),
                Span::styled("both", bold().with(Mark::Italic)),
                Span::text(" end"),
            ])]
        );
    }

    #[test]
    fn soft_break_becomes_space() {
        assert_eq!(
            parse("one\ntwo"),
            vec![ContentBlock::paragraph(vec![Span::text("one two")])]
        );
    }

    #[test]
    fn link() {
        assert_eq!(
            parse("Read [our services](/services) today"),
            vec![ContentBlock::paragraph(vec![
                Span::text("Read "),
                Span::link("/services", "our services"),
                Span::text(" today"),
            ])]
        );
    }

    #[test]
    fn ordered_and_unordered_lists() {
        assert_eq!(
            parse("1. First\n2. Second\n\n- a\n- b"),
            vec![
                ContentBlock::list(
                    ListFormat::Ordered,
                    vec![vec![Span::text("First")], vec![Span::text("Second")]]
                ),
                ContentBlock::list(
                    ListFormat::Unordered,
                    vec![vec![Span::text("a")], vec![Span::text("b")]]
                ),
            ]
        );
    }

    #[test]
    fn nested_list_is_flattened_in_order() {
        assert_eq!(
            parse("- a\n  - b\n  - c\n- d"),
            vec![ContentBlock::list(
                ListFormat::Unordered,
                vec![
                    vec![Span::text("a")],
                    vec![Span::text("b")],
                    vec![Span::text("c")],
                    vec![Span::text("d")],
                ]
            )]
        );
    }

    #[test]
    fn quote_and_code_fall_back() {
        assert_eq!(
            parse("> Said\n\n```\nlet x = 1;\n```"),
            vec![
                ContentBlock::Other {
                    kind: "quote".to_string(),
                    children: vec![Span::text("Said")],
                },
                ContentBlock::Other {
                    kind: "code".to_string(),
                    children: vec![Span::text("let x = 1;")],
                },
            ]
        );
    }

    #[test]
    fn quote_keeps_heading_and_code_inside() {
        assert_eq!(
            parse("> ## Title\n> body\n>\n> ```\n> x = 1\n> ```"),
            vec![ContentBlock::Other {
                kind: "quote".to_string(),
                children: vec![
                    Span::text("Title"),
                    Span::text(" "),
                    Span::text("body"),
                    Span::text(" "),
                    Span::text("x = 1"),
                ],
            }]
        );
    }

    #[test]
    fn list_in_quote_stays_in_quote() {
        assert_eq!(
            parse("> Steps:\n>\n> - one\n> - two"),
            vec![ContentBlock::Other {
                kind: "quote".to_string(),
                children: vec![
                    Span::text("Steps:"),
                    Span::text(" "),
                    Span::text("one"),
                    Span::text(" "),
                    Span::text("two"),
                ],
            }]
        );
    }

    #[test]
    fn heading_in_list_item_stays_in_item() {
        assert_eq!(
            parse("- # Head\n- tail"),
            vec![ContentBlock::list(
                ListFormat::Unordered,
                vec![vec![Span::text("Head")], vec![Span::text("tail")]]
            )]
        );
    }

    #[test]
    fn frontmatter_is_stripped() {
        assert_eq!(
            parse("---\ntitle: x\n---\nBody"),
            vec![ContentBlock::paragraph(vec![Span::text("Body")])]
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse(""), vec![]);
    }
}
