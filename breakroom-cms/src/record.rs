use breakroom_common::model::{
    ModelValidationError,
    content::{
        Annotation, BlockStyle, ContentNode, Decorator, ListItem, ListKind, Mark, Span, TextBlock,
    },
    image::{Image, ImageCrop},
    post::Post,
    slug::Slug,
};
use serde::Deserialize;
use std::num::NonZeroU32;
use time::OffsetDateTime;

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct QueryResponse<T> {
    pub result: T,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct PostRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub name: Option<String>,
    pub slug: Option<SlugRecord>,
    pub image: Option<ImageRecord>,
    #[serde(default)]
    pub content: Vec<NodeRecord>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct SlugRecord {
    pub current: Slug,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct SlugProjectionRecord {
    pub slug: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ReferenceRecord {
    #[serde(rename = "_ref")]
    pub reference: String,
}

#[derive(Copy, Clone, Debug, Deserialize)]
pub(crate) struct CropRecord {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub right: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ImageRecord {
    pub asset: Option<ReferenceRecord>,
    pub crop: Option<CropRecord>,
    pub alt: Option<String>,
}

/// Any node of the content tree. Which fields are present depends on `_type`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NodeRecord {
    #[serde(rename = "_type")]
    pub kind: String,
    pub style: Option<String>,
    pub list_item: Option<String>,
    pub level: Option<u32>,
    #[serde(default)]
    pub children: Vec<ChildRecord>,
    #[serde(default)]
    pub mark_defs: Vec<MarkDefRecord>,
    pub asset: Option<ReferenceRecord>,
    pub crop: Option<CropRecord>,
    pub alt: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ChildRecord {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct MarkDefRecord {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    pub href: Option<String>,
}

impl From<CropRecord> for ImageCrop {
    fn from(value: CropRecord) -> Self {
        Self {
            top: value.top,
            bottom: value.bottom,
            left: value.left,
            right: value.right,
        }
    }
}

impl TryFrom<ImageRecord> for Image {
    type Error = ModelValidationError;

    fn try_from(value: ImageRecord) -> Result<Self, Self::Error> {
        let asset = value
            .asset
            .ok_or(ModelValidationError::MissingField("asset"))?;

        Ok(Self {
            asset: asset.reference.parse()?,
            crop: value.crop.map(ImageCrop::from),
            alt: value.alt,
        })
    }
}

impl TryFrom<PostRecord> for Post {
    type Error = ModelValidationError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            slug: value
                .slug
                .ok_or(ModelValidationError::MissingField("slug"))?
                .current,
            name: value.name.ok_or(ModelValidationError::MissingField("name"))?,
            created_at: value.created_at.into(),
            image: value.image.map(Image::try_from).transpose()?,
            content: value
                .content
                .into_iter()
                .map(ContentNode::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl TryFrom<NodeRecord> for ContentNode {
    type Error = ModelValidationError;

    fn try_from(value: NodeRecord) -> Result<Self, Self::Error> {
        match value.kind.as_str() {
            "block" => Ok(ContentNode::Block(value.into_text_block())),
            "image" => {
                let image = ImageRecord {
                    asset: value.asset,
                    crop: value.crop,
                    alt: value.alt,
                };
                Ok(ContentNode::Image(image.try_into()?))
            }
            _ => Ok(ContentNode::Unknown { kind: value.kind }),
        }
    }
}

impl NodeRecord {
    fn into_text_block(self) -> TextBlock {
        let list_item = self.list_item.map(|kind| ListItem {
            kind: ListKind::from_name(&kind),
            level: self.level.and_then(NonZeroU32::new).unwrap_or(NonZeroU32::MIN),
        });

        let mark_defs = self.mark_defs;
        // Inline objects other than spans have no text to render.
        let children = self
            .children
            .into_iter()
            .filter(|child| child.kind == "span")
            .map(|child| Span {
                text: child.text,
                marks: child
                    .marks
                    .iter()
                    .map(|mark| resolve_mark(mark, &mark_defs))
                    .collect(),
            })
            .collect();

        TextBlock {
            style: self
                .style
                .as_deref()
                .map_or(BlockStyle::Normal, BlockStyle::from_name),
            list_item,
            children,
        }
    }
}

/// Span marks name either a key of the block's mark definitions or a decorator.
fn resolve_mark(mark: &str, mark_defs: &[MarkDefRecord]) -> Mark {
    let Some(mark_def) = mark_defs.iter().find(|mark_def| mark_def.key == mark) else {
        return Mark::Decorator(Decorator::from_name(mark));
    };

    let annotation = match (mark_def.kind.as_str(), &mark_def.href) {
        ("link", Some(href)) => Annotation::Link { href: href.clone() },
        (kind, _) => Annotation::Other {
            kind: kind.to_owned(),
        },
    };

    Mark::Annotation(annotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::utc_datetime;

    const POST_JSON: &str = r#"{
        "_id": "3f1c0a7e-post",
        "_createdAt": "2024-03-03T14:15:00Z",
        "name": "Taking better breaks",
        "slug": { "_type": "slug", "current": "better-breaks" },
        "image": {
            "_type": "image",
            "asset": { "_ref": "image-abc123-1920x1080-jpg", "_type": "reference" },
            "crop": { "top": 0.1, "bottom": 0.1, "left": 0, "right": 0 }
        },
        "content": [
            {
                "_type": "block",
                "_key": "k1",
                "style": "h2",
                "markDefs": [{ "_key": "lnk", "_type": "link", "href": "https://example.com" }],
                "children": [
                    { "_type": "span", "_key": "s1", "text": "Read ", "marks": ["strong"] },
                    { "_type": "span", "_key": "s2", "text": "this", "marks": ["strong", "lnk"] },
                    { "_type": "inlineWidget", "_key": "s3" }
                ]
            },
            {
                "_type": "block",
                "_key": "k2",
                "listItem": "bullet",
                "level": 2,
                "children": [{ "_type": "span", "text": "item", "marks": [] }]
            },
            { "_type": "image", "_key": "k3", "asset": { "_ref": "image-def456-500x300-png" }, "alt": "A desk" },
            { "_type": "youtube", "_key": "k4", "url": "https://youtu.be/x" }
        ]
    }"#;

    #[test]
    fn post_record_into_post() {
        let record: PostRecord = serde_json::from_str(POST_JSON).unwrap();
        let post = Post::try_from(record).unwrap();

        assert_eq!(post.id.get(), "3f1c0a7e-post");
        assert_eq!(post.slug.get(), "better-breaks");
        assert_eq!(post.name, "Taking better breaks");
        assert_eq!(post.created_at, utc_datetime!(2024-03-03 14:15));

        let image = post.image.unwrap();
        assert_eq!(image.asset.id, "abc123");
        assert_eq!(image.crop.unwrap().top, 0.1);

        assert_eq!(post.content.len(), 4);

        let ContentNode::Block(heading) = &post.content[0] else {
            panic!("expected a block, got {:?}", post.content[0]);
        };
        assert_eq!(heading.style, BlockStyle::H2);
        assert_eq!(heading.children.len(), 2);
        assert_eq!(
            heading.children[1].marks,
            vec![
                Mark::Decorator(Decorator::Strong),
                Mark::Annotation(Annotation::Link {
                    href: "https://example.com".to_owned()
                }),
            ]
        );

        let ContentNode::Block(item) = &post.content[1] else {
            panic!("expected a block, got {:?}", post.content[1]);
        };
        assert_eq!(item.style, BlockStyle::Normal);
        assert_eq!(
            item.list_item,
            Some(ListItem {
                kind: ListKind::Bullet,
                level: NonZeroU32::new(2).unwrap(),
            })
        );

        let ContentNode::Image(inline_image) = &post.content[2] else {
            panic!("expected an image, got {:?}", post.content[2]);
        };
        assert_eq!(inline_image.alt.as_deref(), Some("A desk"));

        assert_eq!(post.content[3].kind(), "youtube");
    }

    #[test]
    fn missing_fields_are_rejected() {
        let record: PostRecord = serde_json::from_str(
            r#"{ "_id": "x", "_createdAt": "2024-03-03T00:00:00Z", "slug": { "current": "x" } }"#,
        )
        .unwrap();
        assert_eq!(
            Post::try_from(record).unwrap_err(),
            ModelValidationError::MissingField("name")
        );

        let record: PostRecord = serde_json::from_str(
            r#"{
                "_id": "x",
                "_createdAt": "2024-03-03T00:00:00Z",
                "name": "x",
                "slug": { "current": "x" },
                "content": [{ "_type": "image" }]
            }"#,
        )
        .unwrap();
        assert_eq!(
            Post::try_from(record).unwrap_err(),
            ModelValidationError::MissingField("asset")
        );
    }

    #[test]
    fn unresolved_marks_are_decorators() {
        let mark_defs = [MarkDefRecord {
            key: "c0ffee".to_owned(),
            kind: "internalLink".to_owned(),
            href: None,
        }];

        assert_eq!(
            resolve_mark("em", &mark_defs),
            Mark::Decorator(Decorator::Emphasis)
        );
        assert_eq!(
            resolve_mark("c0ffee", &mark_defs),
            Mark::Annotation(Annotation::Other {
                kind: "internalLink".to_owned()
            })
        );
    }
}
