//! HTML rendering of post pages.

pub mod portable_text;
pub mod widget;

use axum::http::StatusCode;
use breakroom_cms::{ImageFit, ImageUrlBuilder};
use breakroom_common::{model::post::Post, util::format_post_date};
use std::fmt::{Display, Formatter, Write};
use thiserror::Error;

pub const HEADER_IMAGE_WIDTH: u32 = 1920;
pub const HEADER_IMAGE_HEIGHT: u32 = 1080;

const TITLE_CLASS: &str = "bg-gradient-to-r from-[#EB725A] via-[#EF4168] to-[#81CCA5] \
    bg-clip-text text-transparent text-5xl drop-shadow font-extrabold";
const HEADER_IMAGE_CLASS: &str = "mt-10 object-cover rounded-xl max-h-[500px]";
const CONTENT_CLASS: &str = "text-lg text-gray-700 dark:text-white mt-5";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Date could not be formatted: {0}")]
    Date(#[from] time::error::Format),
    #[error("Image url could not be built: {0}")]
    ImageUrl(#[from] url::ParseError),
    #[error("Writing markup failed")]
    Write(#[from] std::fmt::Error),
}

/// Text or attribute value with `&<>"'` escaped.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Escaped<'a>(pub &'a str);

impl Display for Escaped<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut rest = self.0;
        while let Some(index) = rest.find(|c: char| matches!(c, '&' | '<' | '>' | '"' | '\'')) {
            f.write_str(&rest[..index])?;
            let entity = match rest.as_bytes()[index] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'"' => "&quot;",
                _ => "&#39;",
            };
            f.write_str(entity)?;
            rest = &rest[index + 1..];
        }
        f.write_str(rest)
    }
}

fn write_document_start<W: Write>(out: &mut W, title: &str) -> std::fmt::Result {
    write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
        <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
        <title>{}</title>\n</head>\n<body>\n",
        Escaped(title)
    )
}

fn write_document_end<W: Write>(out: &mut W) -> std::fmt::Result {
    out.write_str("</body>\n</html>\n")
}

pub fn post_page(post: &Post, images: &ImageUrlBuilder) -> Result<String, RenderError> {
    let mut out = String::new();
    write_document_start(&mut out, &post.name)?;

    out.write_str("<div>\n")?;
    write!(
        out,
        "<header class=\"flex items-center justify-between\"><h1 class=\"{TITLE_CLASS}\">{}</h1></header>\n",
        Escaped(&post.name)
    )?;
    writeln!(
        out,
        "<p class=\"text-gray-500\">{}</p>",
        format_post_date(post.created_at)?
    )?;

    if let Some(image) = &post.image {
        let url = images
            .image(image)
            .width(HEADER_IMAGE_WIDTH)
            .height(HEADER_IMAGE_HEIGHT)
            .fit(ImageFit::Crop)
            .url()?;
        writeln!(
            out,
            "<img src=\"{}\" alt=\"{}\" width=\"{HEADER_IMAGE_WIDTH}\" height=\"{HEADER_IMAGE_HEIGHT}\" class=\"{HEADER_IMAGE_CLASS}\">",
            Escaped(url.as_str()),
            Escaped(&post.name)
        )?;
    }

    write!(out, "<div class=\"{CONTENT_CLASS}\">")?;
    portable_text::write_content(&mut out, &post.content, images)?;
    out.write_str("</div>\n</div>\n")?;

    write_document_end(&mut out)?;
    Ok(out)
}

/// Minimal page shown for error responses.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct ErrorPage(pub StatusCode);

impl Display for ErrorPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let status = self.0;
        let title = format!(
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Error")
        );

        write_document_start(f, &title)?;
        writeln!(f, "<h1>{}</h1>", Escaped(&title))?;
        write_document_end(f)
    }
}
