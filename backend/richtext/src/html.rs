//! Minimal owned HTML tree and the parser capability that produces it.
//!
//! Decoding needs an HTML parser, which some builds or environments do not
//! carry. The capability is injected as an [`HtmlParser`]; [`NullParser`]
//! stands in when none is available.

use folio_core::FolioError;

/// Nesting depth past which parsed subtrees are dropped.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    Element(HtmlElement),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlElement {
    /// Lowercase local tag name.
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<HtmlNode>,
}

impl HtmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// First descendant element with the given tag, depth-first.
    pub fn find(&self, tag: &str) -> Option<&HtmlElement> {
        self.children.iter().find_map(|child| match child {
            HtmlNode::Element(el) if el.is(tag) => Some(el),
            HtmlNode::Element(el) => el.find(tag),
            HtmlNode::Text(_) => None,
        })
    }
}

fn collect_text(nodes: &[HtmlNode], out: &mut String) {
    for node in nodes {
        match node {
            HtmlNode::Text(text) => out.push_str(text),
            HtmlNode::Element(el) => collect_text(&el.children, out),
        }
    }
}

/// Capability to parse an HTML fragment into a traversable tree.
pub trait HtmlParser: Send + Sync {
    fn name(&self) -> &str;

    /// Parses `html` as the content of a `<body>` element.
    fn parse_fragment(&self, html: &str) -> Result<Vec<HtmlNode>, FolioError>;
}

/// Parser used where no HTML parsing is available; every parse reports
/// [`FolioError::ParserUnavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NullParser;

impl HtmlParser for NullParser {
    fn name(&self) -> &str {
        "null"
    }

    fn parse_fragment(&self, _html: &str) -> Result<Vec<HtmlNode>, FolioError> {
        Err(FolioError::ParserUnavailable)
    }
}

#[cfg(feature = "html5ever")]
pub use self::html5ever_parser::Html5everParser;

#[cfg(feature = "html5ever")]
mod html5ever_parser {
    use html5ever::tendril::TendrilSink;
    use html5ever::{local_name, namespace_url, ns, parse_fragment, ParseOpts, QualName};
    use markup5ever_rcdom::{Handle, NodeData, RcDom};
    use tracing::warn;

    use super::{HtmlElement, HtmlNode, HtmlParser, MAX_DEPTH};
    use folio_core::FolioError;

    /// Browser-compatible HTML5 fragment parser backed by `html5ever`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct Html5everParser;

    impl HtmlParser for Html5everParser {
        fn name(&self) -> &str {
            "html5ever"
        }

        fn parse_fragment(&self, html: &str) -> Result<Vec<HtmlNode>, FolioError> {
            let context = QualName::new(None, ns!(html), local_name!("body"));
            let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, vec![])
                .one(html);

            // Fragment parsing yields document > html > (fragment nodes).
            let document_children = dom.document.children.borrow();
            let root = document_children
                .first()
                .ok_or_else(|| FolioError::Parse("fragment produced no root element".into()))?;
            let nodes = root
                .children
                .borrow()
                .iter()
                .filter_map(|child| convert(child, 1))
                .collect();
            Ok(nodes)
        }
    }

    fn convert(handle: &Handle, depth: usize) -> Option<HtmlNode> {
        match &handle.data {
            NodeData::Text { contents } => Some(HtmlNode::Text(contents.borrow().to_string())),
            NodeData::Element { name, attrs, .. } => {
                if depth > MAX_DEPTH {
                    warn!(tag = %name.local, depth, "Dropping HTML subtree nested too deeply");
                    return None;
                }
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                    .collect();
                let children = handle
                    .children
                    .borrow()
                    .iter()
                    .filter_map(|child| convert(child, depth + 1))
                    .collect();
                Some(HtmlNode::Element(HtmlElement {
                    tag: name.local.to_string(),
                    attrs,
                    children,
                }))
            }
            // Comments, doctypes and processing instructions carry no content.
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, children: Vec<HtmlNode>) -> HtmlNode {
        HtmlNode::Element(HtmlElement {
            children,
            ..HtmlElement::new(tag)
        })
    }

    #[test]
    fn text_content_and_find_walk_descendants() {
        let HtmlNode::Element(pre) = element(
            "pre",
            vec![
                HtmlNode::Text("a".into()),
                element("span", vec![element("code", vec![HtmlNode::Text("b".into())])]),
            ],
        ) else {
            unreachable!()
        };
        assert_eq!(pre.text_content(), "ab");
        assert_eq!(pre.find("code").unwrap().text_content(), "b");
        assert!(pre.find("img").is_none());
    }

    #[test]
    fn null_parser_is_unavailable() {
        let err = NullParser.parse_fragment("<p>x</p>").unwrap_err();
        assert!(matches!(err, FolioError::ParserUnavailable));
    }

    #[cfg(feature = "html5ever")]
    #[test]
    fn html5ever_parses_body_fragment() {
        let nodes = Html5everParser
            .parse_fragment(r#"<p class="lead">Hi <b>there</b></p><!-- note --><img src="x.png">"#)
            .unwrap();
        assert_eq!(nodes.len(), 2);
        let HtmlNode::Element(p) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(p.tag, "p");
        assert_eq!(p.attr("class"), Some("lead"));
        assert_eq!(p.text_content(), "Hi there");
        let HtmlNode::Element(img) = &nodes[1] else {
            panic!("expected element");
        };
        assert_eq!(img.attr("src"), Some("x.png"));
        assert!(img.children.is_empty());
    }

    #[cfg(feature = "html5ever")]
    #[test]
    fn html5ever_drops_overly_deep_subtrees() {
        let html = format!("{}x{}", "<span>".repeat(MAX_DEPTH + 10), "</span>".repeat(MAX_DEPTH + 10));
        let nodes = Html5everParser.parse_fragment(&html).unwrap();
        let HtmlNode::Element(outer) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(outer.text_content(), "");
    }
}
