//! Structured rich-document model and its HTML conversions.
//!
//! The editor stores content as a typed tree ([`Doc`]); public pages store
//! HTML. [`encode`] renders a tree to HTML, [`HtmlDecoder`] turns HTML back
//! into a tree for re-editing, and [`image_sources`] walks a tree for every
//! embedded image reference.

pub mod decode;
pub mod doc;
pub mod encode;
pub mod html;
pub mod walk;
pub mod wire;

pub use decode::{decode, HtmlDecoder};
pub use doc::{Block, Doc, Image, Inline, Mark, Node, Text};
pub use encode::{encode, encode_value, Renderer};
pub use html::{HtmlElement, HtmlNode, HtmlParser, NullParser};
#[cfg(feature = "html5ever")]
pub use html::Html5everParser;
pub use walk::image_sources;
