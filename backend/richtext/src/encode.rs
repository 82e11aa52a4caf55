//! Renderers for the document tree
//!
//! Transforms a [`Doc`] into the HTML stored alongside it for public pages,
//! and into plain text for excerpts and search.

use serde_json::Value;
use tracing::warn;

use crate::doc::{Block, Doc, Image, Inline, Mark, Node, Text};

/// Encodes a document to HTML. An absent document encodes to `""`.
pub fn encode(doc: Option<&Doc>) -> String {
    doc.map(Renderer::to_html).unwrap_or_default()
}

/// Encodes a document held in its editor JSON form.
///
/// Never fails: input that cannot be read as a document is returned as its
/// JSON serialization so the caller can still persist something.
pub fn encode_value(value: &Value) -> String {
    if value.is_null() {
        return String::new();
    }
    match Doc::from_value(value) {
        Ok(doc) => Renderer::to_html(&doc),
        Err(e) => {
            warn!(error = %e, "Could not render document; storing JSON diagnostic instead");
            value.to_string()
        }
    }
}

pub struct Renderer;

impl Renderer {
    /// Renders top-level blocks, one per line.
    pub fn to_html(doc: &Doc) -> String {
        doc.content
            .iter()
            .map(render_block)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders the document as plain text, stripping all formatting.
    pub fn to_plain_text(doc: &Doc) -> String {
        let mut output = String::new();
        for block in &doc.content {
            plain_block(block, &mut output);
        }
        output.trim_end().to_string()
    }
}

/// Escapes `&`, `<`, `>`, `"` and `'`.
fn escape(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Paragraph(content) => format!("<p>{}</p>", render_inlines(content)),
        Block::Heading { level, content } => {
            format!("<h{level}>{}</h{level}>", render_inlines(content))
        }
        Block::CodeBlock { language, code } => match language {
            Some(lang) => format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                escape(lang),
                escape(code)
            ),
            None => format!("<pre><code>{}</code></pre>", escape(code)),
        },
        Block::BulletList(items) => format!("<ul>{}</ul>", render_blocks(items)),
        Block::OrderedList(items) => format!("<ol>{}</ol>", render_blocks(items)),
        Block::ListItem(children) => format!("<li>{}</li>", render_blocks(children)),
        Block::Image(image) => render_image(image),
        Block::Unknown { content, .. } => content
            .iter()
            .map(|node| match node {
                Node::Block(block) => render_block(block),
                Node::Inline(inline) => render_inline(inline),
            })
            .collect(),
    }
}

fn render_blocks(blocks: &[Block]) -> String {
    blocks.iter().map(render_block).collect()
}

fn render_inlines(inlines: &[Inline]) -> String {
    inlines.iter().map(render_inline).collect()
}

fn render_inline(inline: &Inline) -> String {
    match inline {
        Inline::Text(text) => render_text(text),
        Inline::Image(image) => render_image(image),
        Inline::Unknown { content, .. } => render_inlines(content),
    }
}

/// Wraps escaped text in one tag per mark; the first mark ends up innermost.
/// Line breaks become `<br>` so they survive re-parsing.
fn render_text(text: &Text) -> String {
    text.marks
        .iter()
        .fold(escape(&text.text).replace('\n', "<br>"), |inner, mark| match mark {
            Mark::Bold => format!("<strong>{inner}</strong>"),
            Mark::Italic => format!("<em>{inner}</em>"),
            Mark::Code => format!("<code>{inner}</code>"),
            Mark::Link { href } => format!("<a href=\"{}\">{inner}</a>", escape(href)),
        })
}

fn render_image(image: &Image) -> String {
    let mut out = format!(
        "<img src=\"{}\" alt=\"{}\"",
        escape(&image.src),
        escape(&image.alt)
    );
    if let Some(title) = &image.title {
        out.push_str(&format!(" title=\"{}\"", escape(title)));
    }
    out.push_str("/>");
    out
}

fn plain_block(block: &Block, output: &mut String) {
    match block {
        Block::Paragraph(content) | Block::Heading { content, .. } => {
            for inline in content {
                plain_inline(inline, output);
            }
            output.push('\n');
        }
        Block::CodeBlock { code, .. } => {
            output.push_str(code);
            output.push('\n');
        }
        Block::BulletList(children) | Block::OrderedList(children) | Block::ListItem(children) => {
            for child in children {
                plain_block(child, output);
            }
        }
        Block::Image(image) => {
            output.push_str(&image.alt);
            output.push('\n');
        }
        Block::Unknown { content, .. } => {
            for node in content {
                match node {
                    Node::Block(block) => plain_block(block, output),
                    Node::Inline(inline) => plain_inline(inline, output),
                }
            }
        }
    }
}

fn plain_inline(inline: &Inline, output: &mut String) {
    match inline {
        Inline::Text(text) => output.push_str(&text.text),
        Inline::Image(image) => output.push_str(&image.alt),
        Inline::Unknown { content, .. } => {
            for inline in content {
                plain_inline(inline, output);
            }
        }
    }
}
