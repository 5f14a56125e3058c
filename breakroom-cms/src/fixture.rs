use crate::{
    client::{ContentStore, Result},
    record::PostRecord,
};
use async_trait::async_trait;
use breakroom_common::model::{post::Post, slug::Slug};
use std::{cmp::Reverse, path::Path};
use tracing::{debug, info};

/// Posts kept in memory, loaded from a JSON array of post documents as
/// exported from the content store.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct FixtureStore {
    posts: Vec<Post>,
}

impl FixtureStore {
    #[must_use]
    pub fn new(mut posts: Vec<Post>) -> Self {
        posts.sort_by_key(|post| Reverse(post.created_at));
        Self { posts }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<PostRecord> = serde_json::from_str(json)?;
        let posts = records
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<_, _>>()?;

        Ok(Self::new(posts))
    }

    /// Newest first.
    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await?;
        let store = Self::from_json(&json)?;

        info!(path = %path.display(), posts = store.posts.len(), "Loaded fixture posts");
        Ok(store)
    }
}

#[async_trait]
impl ContentStore for FixtureStore {
    async fn fetch_post(&self, slug: &Slug) -> Result<Option<Post>> {
        debug!(%slug, "Looking up fixture post");
        Ok(self.posts.iter().find(|post| &post.slug == slug).cloned())
    }

    async fn fetch_slugs(&self) -> Result<Vec<Slug>> {
        Ok(self.posts.iter().map(|post| post.slug.clone()).collect())
    }
}
