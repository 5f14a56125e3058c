//! The structured content tree of a post (Portable Text).
//!
//! Every kind of node has its own variant. Names the store may send that are not
//! known here end up in the designated fallback variant of each level
//! ([`ContentNode::Unknown`], [`BlockStyle::Other`], [`ListKind::Other`],
//! [`Decorator::Other`] and [`Annotation::Other`]).

use crate::model::image::Image;
use std::num::NonZeroU32;

#[derive(Clone, PartialEq, Debug)]
pub enum ContentNode {
    Block(TextBlock),
    Image(Image),
    Unknown { kind: String },
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct TextBlock {
    pub style: BlockStyle,
    pub list_item: Option<ListItem>,
    pub children: Vec<Span>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub enum BlockStyle {
    #[default]
    Normal,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Intro,
    Blockquote,
    CustomHeading,
    Other(String),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ListItem {
    pub kind: ListKind,
    pub level: NonZeroU32,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum ListKind {
    Bullet,
    Number,
    Checkmarks,
    Other(String),
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct Span {
    pub text: String,
    pub marks: Vec<Mark>,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Mark {
    Decorator(Decorator),
    Annotation(Annotation),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Decorator {
    Strong,
    Emphasis,
    Underline,
    Code,
    StrikeThrough,
    Other(String),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Annotation {
    Link { href: String },
    Other { kind: String },
}

impl ContentNode {
    /// The `_type` this node has in the content store.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            ContentNode::Block(_) => "block",
            ContentNode::Image(_) => "image",
            ContentNode::Unknown { kind } => kind,
        }
    }
}

impl TextBlock {
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.children.iter().map(|span| span.text.as_str()).collect()
    }
}

impl BlockStyle {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "normal" => BlockStyle::Normal,
            "h1" => BlockStyle::H1,
            "h2" => BlockStyle::H2,
            "h3" => BlockStyle::H3,
            "h4" => BlockStyle::H4,
            "h5" => BlockStyle::H5,
            "h6" => BlockStyle::H6,
            "intro" => BlockStyle::Intro,
            "blockquote" => BlockStyle::Blockquote,
            "customHeading" => BlockStyle::CustomHeading,
            other => BlockStyle::Other(other.to_owned()),
        }
    }
}

impl ListKind {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "bullet" => ListKind::Bullet,
            "number" => ListKind::Number,
            "checkmarks" => ListKind::Checkmarks,
            other => ListKind::Other(other.to_owned()),
        }
    }
}

impl Decorator {
    /// Both the Portable Text names (`strong`, `em`) and the older
    /// aliases (`bold`, `italic`) are accepted.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "strong" | "bold" => Decorator::Strong,
            "em" | "italic" => Decorator::Emphasis,
            "underline" => Decorator::Underline,
            "code" => Decorator::Code,
            "strike-through" => Decorator::StrikeThrough,
            other => Decorator::Other(other.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_fall_back_to_other() {
        assert_eq!(BlockStyle::from_name("h3"), BlockStyle::H3);
        assert_eq!(
            BlockStyle::from_name("pullquote"),
            BlockStyle::Other("pullquote".to_owned())
        );
        assert_eq!(ListKind::from_name("checkmarks"), ListKind::Checkmarks);
        assert_eq!(
            ListKind::from_name("roman"),
            ListKind::Other("roman".to_owned())
        );
        assert_eq!(Decorator::from_name("bold"), Decorator::Strong);
        assert_eq!(Decorator::from_name("em"), Decorator::Emphasis);
        assert_eq!(
            Decorator::from_name("highlight"),
            Decorator::Other("highlight".to_owned())
        );
    }

    #[test]
    fn node_kind() {
        let unknown = ContentNode::Unknown {
            kind: "youtube".to_owned(),
        };
        assert_eq!(unknown.kind(), "youtube");
        assert_eq!(ContentNode::Block(TextBlock::default()).kind(), "block");
    }
}
