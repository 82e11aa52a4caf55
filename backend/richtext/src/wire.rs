//! Editor JSON wire form
//!
//! Documents are persisted as the editor's JSON tree
//! (`{"type":"doc","content":[...]}`). [`RawNode`] mirrors that shape
//! loosely for serde; conversion into [`Doc`] is where typing happens.

use folio_core::FolioError;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::doc::{Block, Doc, Image, Inline, Mark, Node, Text};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<RawNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<RawMark>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMark {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
}

impl RawNode {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    fn with_content(mut self, content: Vec<RawNode>) -> Self {
        self.content = content;
        self
    }

    fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref().and_then(|attrs| attrs.get(key))
    }

    fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(Value::as_str)
    }
}

impl Doc {
    /// Reads a document from its editor JSON form.
    pub fn from_value(value: &Value) -> Result<Doc, FolioError> {
        let raw = RawNode::deserialize(value).map_err(|e| FolioError::invalid(e.to_string()))?;
        Doc::try_from(raw)
    }

    pub fn to_value(&self) -> Value {
        // RawNode holds only strings, maps and vectors, which always serialize.
        serde_json::to_value(RawNode::from(self)).unwrap_or(Value::Null)
    }
}

impl TryFrom<RawNode> for Doc {
    type Error = FolioError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        if raw.kind != "doc" {
            return Err(FolioError::invalid(format!(
                "expected root node \"doc\", found \"{}\"",
                raw.kind
            )));
        }
        let content = raw
            .content
            .into_iter()
            .map(block_from_raw)
            .collect::<Result<_, _>>()?;
        Ok(Doc { content })
    }
}

impl Serialize for Doc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawNode::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Doc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawNode::deserialize(deserializer)?;
        Doc::try_from(raw).map_err(D::Error::custom)
    }
}

fn is_inline_kind(kind: &str) -> bool {
    matches!(kind, "text" | "hardBreak")
}

fn blocks_from_raw(content: Vec<RawNode>) -> Result<Vec<Block>, FolioError> {
    content.into_iter().map(block_from_raw).collect()
}

fn block_from_raw(raw: RawNode) -> Result<Block, FolioError> {
    let block = match raw.kind.as_str() {
        "paragraph" => Block::Paragraph(inlines_from_raw(raw.content)?),
        "heading" => {
            let level = raw.attr("level").and_then(Value::as_u64).unwrap_or(1);
            Block::heading(level.min(6) as u8, inlines_from_raw(raw.content)?)
        }
        "codeBlock" => {
            let language = raw.attr_str("language").map(str::to_string);
            let code = raw
                .content
                .iter()
                .filter_map(|child| child.text.as_deref())
                .collect::<Vec<_>>()
                .join("\n");
            Block::CodeBlock { language, code }
        }
        "bulletList" => Block::BulletList(blocks_from_raw(raw.content)?),
        "orderedList" => Block::OrderedList(blocks_from_raw(raw.content)?),
        "listItem" => Block::ListItem(blocks_from_raw(raw.content)?),
        "image" => Block::Image(image_from_raw(&raw)),
        // Loose inline content at block level becomes its own paragraph.
        kind if is_inline_kind(kind) => Block::Paragraph(inline_from_raw(raw)?.into_iter().collect()),
        _ => Block::Unknown {
            kind: raw.kind,
            content: raw
                .content
                .into_iter()
                .map(node_from_raw)
                .filter_map(Result::transpose)
                .collect::<Result<_, _>>()?,
        },
    };
    Ok(block)
}

fn node_from_raw(raw: RawNode) -> Result<Option<Node>, FolioError> {
    if is_inline_kind(&raw.kind) {
        Ok(inline_from_raw(raw)?.map(Node::Inline))
    } else {
        block_from_raw(raw).map(|block| Some(Node::Block(block)))
    }
}

fn inlines_from_raw(content: Vec<RawNode>) -> Result<Vec<Inline>, FolioError> {
    content
        .into_iter()
        .map(inline_from_raw)
        .filter_map(Result::transpose)
        .collect()
}

fn inline_from_raw(raw: RawNode) -> Result<Option<Inline>, FolioError> {
    let inline = match raw.kind.as_str() {
        "text" => {
            let Some(text) = raw.text else {
                return Err(FolioError::invalid("text node without a \"text\" string"));
            };
            Text::new(text, marks_from_raw(&raw.marks)).map(Inline::Text)
        }
        "hardBreak" => Text::new("\n", marks_from_raw(&raw.marks)).map(Inline::Text),
        "image" => Some(Inline::Image(image_from_raw(&raw))),
        _ => Some(Inline::Unknown {
            kind: raw.kind,
            content: inlines_from_raw(raw.content)?,
        }),
    };
    Ok(inline)
}

fn marks_from_raw(marks: &[RawMark]) -> Vec<Mark> {
    marks
        .iter()
        .filter_map(|mark| match mark.kind.as_str() {
            "bold" => Some(Mark::Bold),
            "italic" => Some(Mark::Italic),
            "code" => Some(Mark::Code),
            "link" => {
                let href = mark
                    .attrs
                    .as_ref()
                    .and_then(|attrs| attrs.get("href"))
                    .and_then(Value::as_str)?;
                Some(Mark::Link {
                    href: href.to_string(),
                })
            }
            _ => None,
        })
        .collect()
}

fn image_from_raw(raw: &RawNode) -> Image {
    Image {
        src: raw.attr_str("src").unwrap_or_default().to_string(),
        alt: raw.attr_str("alt").unwrap_or_default().to_string(),
        title: raw.attr_str("title").map(str::to_string),
    }
}

impl From<&Doc> for RawNode {
    fn from(doc: &Doc) -> Self {
        RawNode::new("doc").with_content(doc.content.iter().map(RawNode::from).collect())
    }
}

impl From<&Block> for RawNode {
    fn from(block: &Block) -> Self {
        match block {
            Block::Paragraph(content) => RawNode::new("paragraph").with_content(raw_inlines(content)),
            Block::Heading { level, content } => RawNode::new("heading")
                .with_attr("level", *level)
                .with_content(raw_inlines(content)),
            Block::CodeBlock { language, code } => {
                let mut node = RawNode::new("codeBlock");
                if let Some(language) = language {
                    node = node.with_attr("language", language.as_str());
                }
                if !code.is_empty() {
                    node.content.push(RawNode {
                        text: Some(code.clone()),
                        ..RawNode::new("text")
                    });
                }
                node
            }
            Block::BulletList(items) => RawNode::new("bulletList").with_content(raw_blocks(items)),
            Block::OrderedList(items) => RawNode::new("orderedList").with_content(raw_blocks(items)),
            Block::ListItem(children) => RawNode::new("listItem").with_content(raw_blocks(children)),
            Block::Image(image) => raw_image(image),
            Block::Unknown { kind, content } => RawNode::new(kind).with_content(
                content
                    .iter()
                    .map(|node| match node {
                        Node::Block(block) => RawNode::from(block),
                        Node::Inline(inline) => RawNode::from(inline),
                    })
                    .collect(),
            ),
        }
    }
}

impl From<&Inline> for RawNode {
    fn from(inline: &Inline) -> Self {
        match inline {
            Inline::Text(text) => RawNode {
                text: Some(text.text.clone()),
                marks: text.marks.iter().map(RawMark::from).collect(),
                ..RawNode::new("text")
            },
            Inline::Image(image) => raw_image(image),
            Inline::Unknown { kind, content } => RawNode::new(kind).with_content(raw_inlines(content)),
        }
    }
}

impl From<&Mark> for RawMark {
    fn from(mark: &Mark) -> Self {
        let (kind, attrs) = match mark {
            Mark::Bold => ("bold", None),
            Mark::Italic => ("italic", None),
            Mark::Code => ("code", None),
            Mark::Link { href } => {
                let mut attrs = Map::new();
                attrs.insert("href".to_string(), Value::from(href.as_str()));
                ("link", Some(attrs))
            }
        };
        RawMark {
            kind: kind.to_string(),
            attrs,
        }
    }
}

fn raw_blocks(blocks: &[Block]) -> Vec<RawNode> {
    blocks.iter().map(RawNode::from).collect()
}

fn raw_inlines(inlines: &[Inline]) -> Vec<RawNode> {
    inlines.iter().map(RawNode::from).collect()
}

fn raw_image(image: &Image) -> RawNode {
    let node = RawNode::new("image")
        .with_attr("src", image.src.as_str())
        .with_attr("alt", image.alt.as_str());
    match &image.title {
        Some(title) => node.with_attr("title", title.as_str()),
        None => node,
    }
}
