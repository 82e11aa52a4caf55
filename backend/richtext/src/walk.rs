//! Tree traversal helpers.

use std::collections::BTreeSet;

use crate::doc::{Block, Doc, Inline, Node};

/// Collects the `src` of every image in the document, at any depth.
pub fn image_sources(doc: &Doc) -> BTreeSet<String> {
    let mut sources = BTreeSet::new();
    for block in &doc.content {
        visit_block(block, &mut sources);
    }
    sources
}

fn visit_block(block: &Block, out: &mut BTreeSet<String>) {
    match block {
        Block::Paragraph(content) | Block::Heading { content, .. } => {
            for inline in content {
                visit_inline(inline, out);
            }
        }
        Block::BulletList(children) | Block::OrderedList(children) | Block::ListItem(children) => {
            for child in children {
                visit_block(child, out);
            }
        }
        Block::Image(image) => {
            out.insert(image.src.clone());
        }
        Block::Unknown { content, .. } => {
            for node in content {
                match node {
                    Node::Block(block) => visit_block(block, out),
                    Node::Inline(inline) => visit_inline(inline, out),
                }
            }
        }
        Block::CodeBlock { .. } => {}
    }
}

fn visit_inline(inline: &Inline, out: &mut BTreeSet<String>) {
    match inline {
        Inline::Image(image) => {
            out.insert(image.src.clone());
        }
        Inline::Unknown { content, .. } => {
            for inline in content {
                visit_inline(inline, out);
            }
        }
        Inline::Text(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::Image;

    #[test]
    fn finds_images_at_every_depth() {
        let doc = Doc::new(vec![
            Block::Image(Image::new("top.png", "")),
            Block::image_paragraph(Image::new("para.png", "")),
            Block::BulletList(vec![Block::ListItem(vec![Block::image_paragraph(Image::new(
                "item.png", "",
            ))])]),
            Block::Unknown {
                kind: "figure".into(),
                content: vec![Node::Inline(Inline::Unknown {
                    kind: "span".into(),
                    content: vec![Inline::Image(Image::new("deep.png", ""))],
                })],
            },
            // Duplicates collapse.
            Block::image_paragraph(Image::new("top.png", "again")),
        ]);
        let sources: Vec<_> = image_sources(&doc).into_iter().collect();
        assert_eq!(sources, vec!["deep.png", "item.png", "para.png", "top.png"]);
    }

    #[test]
    fn empty_document_has_no_images() {
        assert!(image_sources(&Doc::default()).is_empty());
    }
}
