//! HTML to document conversion
//!
//! Turns stored HTML (usually produced by [`crate::encode`], sometimes
//! hand-written) back into a [`Doc`] for re-editing. Decoding never fails:
//! missing input, a missing parser, or a parser error all yield an empty
//! document.

use std::sync::LazyLock;

use folio_core::FolioError;
use regex::Regex;
use tracing::{debug, warn};

use crate::doc::{Block, Doc, Image, Inline, Mark};
use crate::html::{HtmlElement, HtmlNode, HtmlParser, NullParser};

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Decodes `html` with the default parser for this build.
pub fn decode(html: &str) -> Doc {
    HtmlDecoder::default().decode(Some(html))
}

pub struct HtmlDecoder {
    parser: Box<dyn HtmlParser>,
}

impl Default for HtmlDecoder {
    /// Uses `html5ever` when compiled in, otherwise [`NullParser`].
    fn default() -> Self {
        #[cfg(feature = "html5ever")]
        let parser: Box<dyn HtmlParser> = Box::new(crate::html::Html5everParser);
        #[cfg(not(feature = "html5ever"))]
        let parser: Box<dyn HtmlParser> = Box::new(NullParser);
        Self { parser }
    }
}

impl HtmlDecoder {
    pub fn new(parser: Box<dyn HtmlParser>) -> Self {
        Self { parser }
    }

    /// Decoder for contexts without HTML parsing; always yields empty documents.
    pub fn unavailable() -> Self {
        Self::new(Box::new(NullParser))
    }

    pub fn parser_name(&self) -> &str {
        self.parser.name()
    }

    pub fn decode(&self, html: Option<&str>) -> Doc {
        let Some(html) = html.filter(|html| !html.trim().is_empty()) else {
            return Doc::default();
        };
        match self.parser.parse_fragment(html) {
            Ok(nodes) => Doc::new(nodes.iter().filter_map(block_from_node).collect()),
            Err(FolioError::ParserUnavailable) => {
                debug!(parser = self.parser.name(), "HTML parsing unavailable; decoding to empty document");
                Doc::default()
            }
            Err(e) => {
                warn!(parser = self.parser.name(), error = %e, "Failed to parse HTML; decoding to empty document");
                Doc::default()
            }
        }
    }
}

fn block_from_node(node: &HtmlNode) -> Option<Block> {
    match node {
        HtmlNode::Text(text) => Some(Block::Paragraph(vec![text_inline(text)?])),
        HtmlNode::Element(el) => block_from_element(el),
    }
}

fn block_from_element(el: &HtmlElement) -> Option<Block> {
    let block = match el.tag.as_str() {
        "p" | "div" => Block::Paragraph(inlines_from_nodes(&el.children)),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = el.tag[1..].parse().unwrap_or(1);
            Block::heading(level, inlines_from_nodes(&el.children))
        }
        "pre" => code_block(el),
        "img" => Block::image_paragraph(image_from_element(el)),
        // Caption text is not kept.
        "figure" => match el.find("img") {
            Some(img) => Block::image_paragraph(image_from_element(img)),
            None => return fallback_block(el),
        },
        "ul" => Block::BulletList(list_items(el)),
        "ol" => Block::OrderedList(list_items(el)),
        _ => return fallback_block(el),
    };
    Some(block)
}

/// Unrecognized elements become a paragraph of their flattened inline
/// content, or nothing when that content is empty.
fn fallback_block(el: &HtmlElement) -> Option<Block> {
    let content = inlines_from_nodes(&el.children);
    if content.is_empty() {
        None
    } else {
        Some(Block::Paragraph(content))
    }
}

fn code_block(pre: &HtmlElement) -> Block {
    let code_el = pre.find("code");
    let language = code_el
        .and_then(|code| code.attr("class"))
        .and_then(|class| {
            class
                .split_whitespace()
                .find_map(|name| name.strip_prefix("language-"))
        })
        .filter(|lang| !lang.is_empty())
        .map(str::to_string);
    let code = code_el
        .map(HtmlElement::text_content)
        .unwrap_or_else(|| pre.text_content());
    Block::CodeBlock { language, code }
}

/// Each `<li>` becomes a list item holding a paragraph of its inline content,
/// followed by any lists nested directly inside it.
fn list_items(list: &HtmlElement) -> Vec<Block> {
    list.children
        .iter()
        .filter_map(|child| match child {
            HtmlNode::Element(li) if li.is("li") => Some(list_item(li)),
            _ => None,
        })
        .collect()
}

fn list_item(li: &HtmlElement) -> Block {
    let (nested, inline): (Vec<&HtmlNode>, Vec<&HtmlNode>) = li.children.iter().partition(
        |child| matches!(child, HtmlNode::Element(el) if el.is("ul") || el.is("ol")),
    );
    let mut children = vec![Block::Paragraph(inlines_from_nodes(inline))];
    children.extend(nested.into_iter().filter_map(block_from_node));
    Block::ListItem(children)
}

fn inlines_from_nodes<'a>(nodes: impl IntoIterator<Item = &'a HtmlNode>) -> Vec<Inline> {
    let mut out = Vec::new();
    for node in nodes {
        push_inline(node, &mut out);
    }
    out
}

fn push_inline(node: &HtmlNode, out: &mut Vec<Inline>) {
    let el = match node {
        HtmlNode::Text(text) => {
            out.extend(text_inline(text));
            return;
        }
        HtmlNode::Element(el) => el,
    };
    match el.tag.as_str() {
        "strong" | "b" => push_marked(el, &Mark::Bold, out),
        "em" | "i" => push_marked(el, &Mark::Italic, out),
        "code" => push_marked(el, &Mark::Code, out),
        "a" => match el.attr("href") {
            Some(href) => push_marked(
                el,
                &Mark::Link {
                    href: href.to_string(),
                },
                out,
            ),
            None => out.extend(inlines_from_nodes(&el.children)),
        },
        "br" => out.extend(Inline::text("\n")),
        "img" => out.push(Inline::Image(image_from_element(el))),
        _ => out.extend(inlines_from_nodes(&el.children)),
    }
}

/// Converts the children of `el` and marks every resulting text node.
fn push_marked(el: &HtmlElement, mark: &Mark, out: &mut Vec<Inline>) {
    out.extend(
        inlines_from_nodes(&el.children)
            .into_iter()
            .map(|inline| inline.with_mark(mark)),
    );
}

fn text_inline(text: &str) -> Option<Inline> {
    if text.trim().is_empty() {
        return None;
    }
    Inline::text(WHITESPACE_RUN.replace_all(text, " "))
}

fn image_from_element(img: &HtmlElement) -> Image {
    Image {
        src: img.attr("src").unwrap_or_default().to_string(),
        alt: img.attr("alt").unwrap_or_default().to_string(),
        title: img.attr("title").map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::Text;
    use crate::encode::Renderer;

    fn text(s: &str) -> Inline {
        Inline::text(s).unwrap()
    }

    fn marked(s: &str, marks: Vec<Mark>) -> Inline {
        Inline::marked(s, marks).unwrap()
    }

    /// Parser returning a fixed tree, standing in for an environment DOM.
    struct StaticParser(Vec<HtmlNode>);

    impl HtmlParser for StaticParser {
        fn name(&self) -> &str {
            "static"
        }

        fn parse_fragment(&self, _html: &str) -> Result<Vec<HtmlNode>, FolioError> {
            Ok(self.0.clone())
        }
    }

    struct FailingParser;

    impl HtmlParser for FailingParser {
        fn name(&self) -> &str {
            "failing"
        }

        fn parse_fragment(&self, _html: &str) -> Result<Vec<HtmlNode>, FolioError> {
            Err(FolioError::Parse("boom".into()))
        }
    }

    #[test]
    fn empty_or_absent_input_decodes_to_empty_doc() {
        let decoder = HtmlDecoder::default();
        assert!(decoder.decode(None).is_empty());
        assert!(decoder.decode(Some("")).is_empty());
        assert!(decoder.decode(Some("  \n ")).is_empty());
    }

    #[test]
    fn missing_or_failing_parser_decodes_to_empty_doc() {
        assert!(HtmlDecoder::unavailable().decode(Some("<p>hi</p>")).is_empty());
        assert!(HtmlDecoder::new(Box::new(FailingParser))
            .decode(Some("<p>hi</p>"))
            .is_empty());
    }

    #[test]
    fn injected_parser_drives_decoding() {
        let tree = vec![
            HtmlNode::Element(HtmlElement {
                tag: "h2".into(),
                attrs: vec![],
                children: vec![HtmlNode::Text("Static".into())],
            }),
            HtmlNode::Text("   ".into()),
        ];
        let decoder = HtmlDecoder::new(Box::new(StaticParser(tree)));
        assert_eq!(decoder.parser_name(), "static");
        assert_eq!(
            decoder.decode(Some("ignored")).content,
            vec![Block::heading(2, vec![text("Static")])]
        );
    }

    #[cfg(feature = "html5ever")]
    mod with_html5ever {
        use super::*;

        #[test]
        fn wraps_top_level_image_in_paragraph() {
            let doc = decode(r#"<img src="x.png" alt="y">"#);
            assert_eq!(
                doc.content,
                vec![Block::Paragraph(vec![Inline::Image(Image::new("x.png", "y"))])]
            );
        }

        #[test]
        fn figure_keeps_image_and_drops_caption() {
            let doc = decode(
                r#"<figure><img src="/uploads/p.png" alt="p" title="t"><figcaption>Lost caption</figcaption></figure>"#,
            );
            assert_eq!(
                doc.content,
                vec![Block::image_paragraph(
                    Image::new("/uploads/p.png", "p").with_title("t")
                )]
            );
        }

        #[test]
        fn link_marks_only_apply_to_text() {
            let doc = decode(r#"<p><a href="/x"><img src="i.png"/></a></p>"#);
            assert_eq!(
                doc.content,
                vec![Block::Paragraph(vec![Inline::Image(Image::new("i.png", ""))])]
            );

            let doc = decode(r#"<p><a href="/x">see <img src="i.png" alt="i"> <b>here</b></a></p>"#);
            let link = Mark::Link { href: "/x".into() };
            assert_eq!(
                doc.content,
                vec![Block::Paragraph(vec![
                    marked("see ", vec![link.clone()]),
                    Inline::Image(Image::new("i.png", "i")),
                    marked("here", vec![Mark::Bold, link]),
                ])]
            );
        }

        #[test]
        fn anchors_without_href_are_unwrapped() {
            let doc = decode(r#"<p><a name="top">anchor</a></p>"#);
            assert_eq!(doc.content, vec![Block::Paragraph(vec![text("anchor")])]);
        }

        #[test]
        fn nested_marks_accumulate() {
            let doc = decode("<p><em><strong>x</strong></em><i><code>y</code></i></p>");
            assert_eq!(
                doc.content,
                vec![Block::Paragraph(vec![
                    marked("x", vec![Mark::Bold, Mark::Italic]),
                    marked("y", vec![Mark::Code, Mark::Italic]),
                ])]
            );
        }

        #[test]
        fn collapses_whitespace_and_drops_blank_text() {
            let doc = decode("<p>  Hello \n\t  world  <b>   </b></p>\n\n<p>\n</p>");
            assert_eq!(
                doc.content,
                vec![
                    Block::Paragraph(vec![text(" Hello world ")]),
                    Block::Paragraph(vec![]),
                ]
            );
        }

        #[test]
        fn line_breaks_become_newline_text() {
            let doc = decode("<p>a<br>b</p>");
            assert_eq!(
                doc.content,
                vec![Block::Paragraph(vec![text("a"), text("\n"), text("b")])]
            );
        }

        #[test]
        fn decodes_headings_divs_and_top_level_text() {
            let doc = decode("<h1>One</h1><h6>Six</h6><div>box</div>loose text");
            assert_eq!(
                doc.content,
                vec![
                    Block::heading(1, vec![text("One")]),
                    Block::heading(6, vec![text("Six")]),
                    Block::Paragraph(vec![text("box")]),
                    Block::Paragraph(vec![text("loose text")]),
                ]
            );
        }

        #[test]
        fn decodes_code_blocks() {
            let doc = decode(
                "<pre><code class=\"hl language-rust\">fn main() {\n    1 &lt; 2;\n}</code></pre><pre>plain  text</pre>",
            );
            assert_eq!(
                doc.content,
                vec![
                    Block::CodeBlock {
                        language: Some("rust".into()),
                        code: "fn main() {\n    1 < 2;\n}".into(),
                    },
                    Block::CodeBlock {
                        language: None,
                        code: "plain  text".into(),
                    },
                ]
            );
        }

        #[test]
        fn decodes_lists_including_nested_ones() {
            let doc = decode("<ul><li>A</li><li><p>B</p><ol><li>B1</li></ol></li></ul><ol><li><em>1</em></li></ol>");
            assert_eq!(
                doc.content,
                vec![
                    Block::BulletList(vec![
                        Block::ListItem(vec![Block::Paragraph(vec![text("A")])]),
                        Block::ListItem(vec![
                            Block::Paragraph(vec![text("B")]),
                            Block::OrderedList(vec![Block::ListItem(vec![Block::Paragraph(
                                vec![text("B1")]
                            )])]),
                        ]),
                    ]),
                    Block::OrderedList(vec![Block::ListItem(vec![Block::Paragraph(vec![
                        marked("1", vec![Mark::Italic])
                    ])])]),
                ]
            );
        }

        #[test]
        fn unknown_elements_are_flattened_or_dropped() {
            let doc = decode(
                "<section>Intro <span>to <u>this</u></span></section><section>  </section><hr><blockquote><p>quoted</p></blockquote>",
            );
            assert_eq!(
                doc.content,
                vec![
                    Block::Paragraph(vec![text("Intro "), text("to "), text("this")]),
                    Block::Paragraph(vec![text("quoted")]),
                ]
            );
        }

        #[test]
        fn entities_are_decoded_into_text() {
            let doc = decode("<p>5 &gt; 3 &amp; &quot;ok&quot;</p>");
            assert_eq!(doc.content, vec![Block::Paragraph(vec![text(r#"5 > 3 & "ok""#)])]);
        }

        #[test]
        fn supported_subset_round_trips() {
            let original = Doc::new(vec![
                Block::heading(2, vec![text("About me")]),
                Block::Paragraph(vec![
                    text("I write "),
                    marked("Rust", vec![Mark::Bold]),
                    text(" and "),
                    marked("docs", vec![Mark::Bold, Mark::Italic]),
                    text(", see "),
                    marked("cargo", vec![Mark::Code]),
                    text(" & <friends>."),
                ]),
                Block::image_paragraph(
                    Image::new("/uploads/me.png", "Portrait \"me\"").with_title("Hi"),
                ),
                Block::Paragraph(vec![
                    marked("link", vec![Mark::Link { href: "/blog?a=1&b=2".into() }]),
                    Inline::Image(Image::new("/uploads/inline.png", "")),
                ]),
                Block::heading(4, vec![text("Tail")]),
            ]);
            let html = Renderer::to_html(&original);
            assert_eq!(decode(&html), original);
        }

        #[test]
        fn hard_break_survives_encode_and_decode() {
            let original = Doc::new(vec![Block::Paragraph(vec![text("a"), text("\n"), text("b")])]);
            let html = Renderer::to_html(&original);
            assert_eq!(html, "<p>a<br>b</p>");
            assert_eq!(decode(&html), original);
        }

        #[test]
        fn decoded_text_is_never_empty() {
            let doc = decode("<p><b></b><i> </i>x</p>");
            let Block::Paragraph(inlines) = &doc.content[0] else {
                panic!("expected paragraph");
            };
            assert!(inlines
                .iter()
                .all(|inline| matches!(inline, Inline::Text(Text { text, .. }) if !text.is_empty())));
        }
    }
}
