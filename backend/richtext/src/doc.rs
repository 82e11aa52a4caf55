//! Rich document tree
//!
//! A closed set of node types covering what the content editor produces.
//! Node types the editor may grow later are kept as `Unknown` variants so
//! their children still render instead of being lost.

/// Root of a structured document. An empty `content` is a valid document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Doc {
    pub content: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Heading { level: u8, content: Vec<Inline> },
    CodeBlock { language: Option<String>, code: String },
    BulletList(Vec<Block>),
    OrderedList(Vec<Block>),
    ListItem(Vec<Block>),
    /// Image stored directly in block position.
    Image(Image),
    Unknown { kind: String, content: Vec<Node> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(Text),
    Image(Image),
    Unknown { kind: String, content: Vec<Inline> },
}

/// Child of an unknown block, which may hold either kind of node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Block(Block),
    Inline(Inline),
}

/// A run of text sharing the same marks. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
    pub marks: Vec<Mark>,
}

/// An embedded image. Always a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Code,
    Link { href: String },
}

impl Doc {
    pub fn new(content: Vec<Block>) -> Self {
        Self { content }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl Block {
    /// Heading with its level clamped into `1..=6`.
    pub fn heading(level: u8, content: Vec<Inline>) -> Self {
        Block::Heading {
            level: level.clamp(1, 6),
            content,
        }
    }

    /// Paragraph holding a single image.
    pub fn image_paragraph(image: Image) -> Self {
        Block::Paragraph(vec![Inline::Image(image)])
    }
}

impl Inline {
    /// Plain text node, or `None` when `text` is empty.
    pub fn text(text: impl Into<String>) -> Option<Self> {
        Text::new(text, Vec::new()).map(Inline::Text)
    }

    pub fn marked(text: impl Into<String>, marks: Vec<Mark>) -> Option<Self> {
        Text::new(text, marks).map(Inline::Text)
    }

    /// Adds `mark` to this node if it is text; other inlines pass through unmarked.
    pub fn with_mark(mut self, mark: &Mark) -> Self {
        if let Inline::Text(text) = &mut self {
            text.add_mark(mark.clone());
        }
        self
    }
}

impl Text {
    pub fn new(text: impl Into<String>, marks: Vec<Mark>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            return None;
        }
        let mut node = Self {
            text,
            marks: Vec::with_capacity(marks.len()),
        };
        for mark in marks {
            node.add_mark(mark);
        }
        Some(node)
    }

    /// Appends `mark` unless an equal mark is already present.
    pub fn add_mark(&mut self, mark: Mark) {
        if !self.marks.contains(&mark) {
            self.marks.push(mark);
        }
    }
}

impl Image {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
