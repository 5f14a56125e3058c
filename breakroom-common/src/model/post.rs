use crate::model::{Id, content::ContentNode, image::Image, slug::Slug};
use time::UtcDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, PartialEq, Debug)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub slug: Slug,
    pub name: String,
    pub created_at: UtcDateTime,
    pub image: Option<Image>,
    pub content: Vec<ContentNode>,
}
