use crate::block::Mark;
use crate::config::{Config, MarkStyle};
use crate::node::{ListKind, UiNode};

const UNSAFE_SCHEMES: [&str; 3] = ["javascript", "vbscript", "data"];

/// Convert rendered nodes to an HTML fragment
pub fn to_html(nodes: &[UiNode], config: &Config) -> String {
    let mut out = String::new();

    let wrapped = !config.container.class.is_empty();
    if wrapped {
        out.push_str("<div");
        push_class(&config.container.class, &mut out);
        out.push_str(">\n");
    }

    for node in nodes {
        if node.is_inline() {
            emit_inline(node, config, &mut out);
        } else {
            emit_block(node, config, &mut out);
        }
    }

    if wrapped {
        out.push_str("</div>\n");
    }
    out
}

fn emit_block(node: &UiNode, config: &Config, out: &mut String) {
    match node {
        UiNode::Paragraph(children) => {
            out.push_str("<p");
            push_class(&config.classes.paragraph, out);
            out.push('>');
            emit_inlines(children, config, out);
            out.push_str("</p>\n");
        }
        UiNode::Heading { rank, children } => {
            out.push('<');
            out.push_str(rank.tag());
            push_class(&config.classes.heading, out);
            out.push('>');
            emit_inlines(children, config, out);
            out.push_str("</");
            out.push_str(rank.tag());
            out.push_str(">\n");
        }
        UiNode::List { kind, items } => {
            let (tag, class) = match kind {
                ListKind::Numbered => ("ol", &config.classes.ordered_list),
                ListKind::Bulleted => ("ul", &config.classes.unordered_list),
            };
            out.push('<');
            out.push_str(tag);
            push_class(class, out);
            out.push_str(">\n");
            for item in items {
                out.push_str("<li");
                push_class(&config.classes.list_item, out);
                out.push('>');
                emit_inlines(item, config, out);
                out.push_str("</li>\n");
            }
            out.push_str("</");
            out.push_str(tag);
            out.push_str(">\n");
        }
        UiNode::Unsupported { kind, children } => {
            out.push_str("<div");
            push_class(&config.classes.unsupported, out);
            push_attr("data-block-type", kind, out);
            out.push('>');
            emit_inlines(children, config, out);
            out.push_str("</div>\n");
        }
        UiNode::Text { .. } | UiNode::Link { .. } => emit_inline(node, config, out),
    }
}

fn emit_inlines(nodes: &[UiNode], config: &Config, out: &mut String) {
    for node in nodes {
        emit_inline(node, config, out);
    }
}

fn emit_inline(node: &UiNode, config: &Config, out: &mut String) {
    match node {
        UiNode::Text { text, marks } if marks.is_empty() => push_text(text, out),
        UiNode::Text { text, marks } => match config.marks.style {
            MarkStyle::Classes => {
                let classes: Vec<&str> = marks
                    .active()
                    .map(|mark| mark_class(mark, config))
                    .filter(|class| !class.is_empty())
                    .collect();
                out.push_str("<span");
                push_class(&classes.join(" "), out);
                out.push('>');
                push_text(text, out);
                out.push_str("</span>");
            }
            MarkStyle::Elements => {
                let tags: Vec<&str> = marks.active().map(mark_tag).collect();
                for tag in &tags {
                    out.push('<');
                    out.push_str(tag);
                    out.push('>');
                }
                push_text(text, out);
                for tag in tags.iter().rev() {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
            }
        },
        UiNode::Link { href, label } => {
            out.push_str("<a");
            push_attr("href", safe_href(href, config), out);
            if !config.links.target.is_empty() {
                push_attr("target", &config.links.target, out);
            }
            if !config.links.rel.is_empty() {
                push_attr("rel", &config.links.rel, out);
            }
            push_class(&config.links.class, out);
            out.push('>');
            push_text(label, out);
            out.push_str("</a>");
        }
        // Block nodes never appear inside inline content produced by the
        // renderer; render them in place if a caller builds such a tree.
        block => emit_block(block, config, out),
    }
}

fn mark_class(mark: Mark, config: &Config) -> &str {
    match mark {
        Mark::Bold => &config.marks.bold,
        Mark::Italic => &config.marks.italic,
        Mark::Underline => &config.marks.underline,
    }
}

fn mark_tag(mark: Mark) -> &'static str {
    match mark {
        Mark::Bold => "strong",
        Mark::Italic => "em",
        Mark::Underline => "u",
    }
}

fn safe_href<'a>(href: &'a str, config: &Config) -> &'a str {
    if config.links.allow_unsafe_schemes || !has_unsafe_scheme(href) {
        return href;
    }
    log::warn!("dropping link with unsafe scheme: {href:?}");
    "#"
}

fn has_unsafe_scheme(href: &str) -> bool {
    // Browsers ignore whitespace and control characters inside the scheme.
    let compact: String = href
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take_while(|c| *c != ':')
        .collect::<String>()
        .to_ascii_lowercase();
    let has_colon = href.contains(':');
    has_colon && UNSAFE_SCHEMES.contains(&compact.as_str())
}

fn push_class(class: &str, out: &mut String) {
    if !class.is_empty() {
        push_attr("class", class, out);
    }
}

fn push_attr(name: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

fn push_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}
