//! Renders the content tree of a post.
//!
//! Each kind of node maps to one renderer. Consecutive list items are grouped
//! into (possibly nested) lists, and marks shared by adjacent spans are
//! rendered as one element around all of them.

use crate::render::{Escaped, RenderError};
use breakroom_cms::ImageUrlBuilder;
use breakroom_common::model::{
    content::{
        Annotation, BlockStyle, ContentNode, Decorator, ListItem, ListKind, Mark, Span, TextBlock,
    },
    image::Image,
};
use std::{cmp::Reverse, fmt::Write};
use tracing::warn;

pub const CONTENT_IMAGE_WIDTH: u32 = 500;
pub const CONTENT_IMAGE_HEIGHT: u32 = 300;

type ListEntry<'a> = (&'a TextBlock, &'a ListItem);

pub fn write_content<W: Write>(
    out: &mut W,
    nodes: &[ContentNode],
    images: &ImageUrlBuilder,
) -> Result<(), RenderError> {
    let mut index = 0;
    while index < nodes.len() {
        let list: Vec<ListEntry<'_>> = nodes[index..].iter().map_while(as_list_entry).collect();

        if list.is_empty() {
            write_node(out, &nodes[index], images)?;
            index += 1;
        } else {
            write_lists(out, &list)?;
            index += list.len();
        }
    }

    Ok(())
}

fn as_list_entry(node: &ContentNode) -> Option<ListEntry<'_>> {
    if let ContentNode::Block(block) = node
        && let Some(list_item) = &block.list_item
    {
        Some((block, list_item))
    } else {
        None
    }
}

fn write_node<W: Write>(
    out: &mut W,
    node: &ContentNode,
    images: &ImageUrlBuilder,
) -> Result<(), RenderError> {
    match node {
        ContentNode::Block(block) => write_block(out, block)?,
        ContentNode::Image(image) => write_image(out, image, images)?,
        ContentNode::Unknown { kind } => {
            warn!(%kind, "No renderer for content node, hiding it");
            write!(
                out,
                "<div style=\"display:none\" data-unknown-type=\"{}\"></div>",
                Escaped(kind)
            )?;
        }
    }

    Ok(())
}

fn block_element(style: &BlockStyle) -> (&'static str, Option<&'static str>) {
    match style {
        BlockStyle::H1 => ("h1", Some("text-4xl")),
        BlockStyle::H2 => ("h2", Some("text-3xl mt-8 mb-2")),
        BlockStyle::H3 => ("h3", Some("text-2xl mt-6 mb-2")),
        BlockStyle::H4 => ("h4", Some("text-xl")),
        BlockStyle::H5 => ("h5", Some("text-[19px]")),
        BlockStyle::H6 => ("h6", Some("text-lg")),
        BlockStyle::Normal => ("p", Some("text-md p-1")),
        BlockStyle::Intro => ("p", Some("text-2xl mt-8 mb-4")),
        BlockStyle::Blockquote => ("blockquote", Some("border-l-purple-500")),
        BlockStyle::CustomHeading => ("h2", Some("text-lg text-primary text-purple-700")),
        BlockStyle::Other(_) => ("p", None),
    }
}

fn list_element(kind: &ListKind) -> (&'static str, Option<&'static str>) {
    match kind {
        ListKind::Bullet => ("ul", Some("mt-xl list-disc")),
        ListKind::Number => ("ol", Some("mt-lg list-decimal")),
        ListKind::Checkmarks => ("ol", Some("m-auto text-lg")),
        ListKind::Other(_) => ("ul", None),
    }
}

fn write_open_tag<W: Write>(out: &mut W, tag: &str, class: Option<&str>) -> std::fmt::Result {
    match class {
        Some(class) => write!(out, "<{tag} class=\"{class}\">"),
        None => write!(out, "<{tag}>"),
    }
}

fn write_block<W: Write>(out: &mut W, block: &TextBlock) -> std::fmt::Result {
    let (tag, class) = block_element(&block.style);

    write_open_tag(out, tag, class)?;
    write_spans(out, &block.children)?;
    write!(out, "</{tag}>")
}

fn write_image<W: Write>(
    out: &mut W,
    image: &Image,
    images: &ImageUrlBuilder,
) -> Result<(), RenderError> {
    let url = images.image(image).url()?;

    write!(
        out,
        "<img src=\"{}\" alt=\"{}\" class=\"object-contain\" width=\"{CONTENT_IMAGE_WIDTH}\" height=\"{CONTENT_IMAGE_HEIGHT}\">",
        Escaped(url.as_str()),
        Escaped(image.alt.as_deref().unwrap_or_default())
    )?;

    Ok(())
}

/// Items deeper than the first one nest inside the item before them.
/// A different list kind on the same level starts a new list. Items shallower
/// than the first one stay siblings in the same list.
fn write_lists<W: Write>(out: &mut W, items: &[ListEntry<'_>]) -> std::fmt::Result {
    let Some((_, first)) = items.first() else {
        return Ok(());
    };
    let level = first.level;

    let mut index = 0;
    while index < items.len() {
        let kind = &items[index].1.kind;
        let (tag, class) = list_element(kind);
        write_open_tag(out, tag, class)?;

        loop {
            let (block, _) = items[index];
            out.write_str("<li>")?;
            write_spans(out, &block.children)?;
            index += 1;

            let nested = items[index..]
                .iter()
                .take_while(|(_, item)| item.level > level)
                .count();
            if nested > 0 {
                write_lists(out, &items[index..index + nested])?;
                index += nested;
            }
            out.write_str("</li>")?;

            if index >= items.len() || &items[index].1.kind != kind {
                break;
            }
        }

        write!(out, "</{tag}>")?;
    }

    Ok(())
}

#[derive(Clone, Eq, PartialEq, Debug)]
enum MarkNode<'a> {
    Text(&'a str),
    Marked(&'a Mark, Vec<MarkNode<'a>>),
}

/// Groups spans under their marks. A mark that continues over more of the
/// following spans opens further out, so it is not split by shorter ones.
fn build_mark_tree(spans: &[Span]) -> Vec<MarkNode<'_>> {
    let mut root = Vec::new();
    let mut open: Vec<(&Mark, Vec<MarkNode<'_>>)> = Vec::new();

    for (index, span) in spans.iter().enumerate() {
        let mut marks: Vec<&Mark> = Vec::with_capacity(span.marks.len());
        for mark in &span.marks {
            if !marks.contains(&mark) {
                marks.push(mark);
            }
        }
        marks.sort_by_cached_key(|mark| {
            Reverse(
                spans[index..]
                    .iter()
                    .take_while(|span| span.marks.contains(mark))
                    .count(),
            )
        });

        let still_open = open
            .iter()
            .take_while(|(mark, _)| marks.contains(mark))
            .count();
        close_marks(&mut open, &mut root, still_open);

        for mark in marks {
            if !open.iter().any(|(open_mark, _)| *open_mark == mark) {
                open.push((mark, Vec::new()));
            }
        }

        let text = MarkNode::Text(&span.text);
        match open.last_mut() {
            Some((_, children)) => children.push(text),
            None => root.push(text),
        }
    }

    close_marks(&mut open, &mut root, 0);
    root
}

fn close_marks<'a>(
    open: &mut Vec<(&'a Mark, Vec<MarkNode<'a>>)>,
    root: &mut Vec<MarkNode<'a>>,
    keep: usize,
) {
    while open.len() > keep {
        let Some((mark, children)) = open.pop() else {
            break;
        };

        let node = MarkNode::Marked(mark, children);
        match open.last_mut() {
            Some((_, parent)) => parent.push(node),
            None => root.push(node),
        }
    }
}

fn write_spans<W: Write>(out: &mut W, spans: &[Span]) -> std::fmt::Result {
    write_mark_nodes(out, &build_mark_tree(spans))
}

fn write_mark_nodes<W: Write>(out: &mut W, nodes: &[MarkNode<'_>]) -> std::fmt::Result {
    for node in nodes {
        match node {
            MarkNode::Text(text) => write_text(out, text)?,
            MarkNode::Marked(mark, children) => {
                let tag = write_mark_open(out, mark)?;
                write_mark_nodes(out, children)?;
                write!(out, "</{tag}>")?;
            }
        }
    }

    Ok(())
}

fn write_text<W: Write>(out: &mut W, text: &str) -> std::fmt::Result {
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.write_str("<br/>")?;
        }
        write!(out, "{}", Escaped(line))?;
    }

    Ok(())
}

/// Returns the tag to close the mark with.
fn write_mark_open<W: Write>(out: &mut W, mark: &Mark) -> Result<&'static str, std::fmt::Error> {
    match mark {
        Mark::Decorator(decorator) => {
            let (tag, class) = match decorator {
                Decorator::Emphasis => ("em", Some("italic")),
                Decorator::Strong => ("strong", Some("font-bold")),
                Decorator::Underline => ("u", Some("underline")),
                Decorator::Code => ("code", Some("bg-gray-100")),
                Decorator::StrikeThrough => ("del", None),
                Decorator::Other(name) => return write_unknown_mark(out, name),
            };
            write_open_tag(out, tag, class)?;
            Ok(tag)
        }
        Mark::Annotation(Annotation::Link { href }) => {
            if href.starts_with('/') {
                write!(out, "<a href=\"{}\">", Escaped(href))?;
            } else {
                write!(
                    out,
                    "<a href=\"{}\" rel=\"noreferrer noopener\">",
                    Escaped(href)
                )?;
            }
            Ok("a")
        }
        Mark::Annotation(Annotation::Other { kind }) => write_unknown_mark(out, kind),
    }
}

fn write_unknown_mark<W: Write>(out: &mut W, name: &str) -> Result<&'static str, std::fmt::Error> {
    write!(out, "<span class=\"unknown__pt__mark__{}\">", Escaped(name))?;
    Ok("span")
}
