mod block;
pub mod config;
mod decode;
mod error;
mod html;
mod node;
mod parser;
mod render;
pub mod search;
mod text;

pub use block::{ContentBlock, ListFormat, ListItem, Mark, Marks, Span};
pub use config::Config;
pub use decode::{Decoded, Skipped, decode_str, decode_value};
pub use error::{Error, Result};
pub use html::to_html;
pub use node::{HeadingRank, ListKind, UiNode};
pub use render::{render, render_block, render_span};
pub use text::{excerpt, plain_text};

/// Parse markdown text into CMS content blocks.
pub fn parse_markdown(markdown: &str) -> Vec<ContentBlock> {
    parser::parse(markdown)
}

/// Render blocks straight to HTML.
pub fn blocks_to_html(blocks: &[ContentBlock], config: &Config) -> String {
    to_html(&render(blocks), config)
}

/// Convert a JSON block array to HTML. Malformed blocks are skipped.
pub fn json_to_html(json: &str, config: &Config) -> Result<String> {
    let decoded = decode_str(json, None)?;
    Ok(blocks_to_html(&decoded.blocks, config))
}

/// Convert markdown to HTML through the CMS block model.
pub fn markdown_to_html(markdown: &str, config: &Config) -> String {
    blocks_to_html(&parse_markdown(markdown), config)
}
