use async_trait::async_trait;
use breakroom_cms::{CmsError, ContentStore, FixtureStore, ImageUrlBuilder};
use breakroom_common::model::{post::Post, slug::Slug};
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

pub const FIXTURE: &str = r#"[
    {
        "_id": "post-1",
        "_createdAt": "2024-03-03T09:30:00Z",
        "name": "Taking better breaks",
        "slug": { "_type": "slug", "current": "better-breaks" },
        "image": { "asset": { "_ref": "image-abc123-1920x1080-jpg" } },
        "content": [
            {
                "_type": "block",
                "style": "normal",
                "markDefs": [],
                "children": [{ "_type": "span", "text": "Step away from the screen.", "marks": [] }]
            },
            {
                "_type": "block",
                "style": "h2",
                "markDefs": [],
                "children": [{ "_type": "span", "text": "Why it works", "marks": [] }]
            }
        ]
    },
    {
        "_id": "post-2",
        "_createdAt": "2024-01-15T12:00:00Z",
        "name": "Stretching at your desk",
        "slug": { "_type": "slug", "current": "stretching-at-your-desk" },
        "content": []
    }
]"#;

pub fn fixture_store() -> FixtureStore {
    FixtureStore::from_json(FIXTURE).unwrap()
}

pub fn better_breaks() -> Post {
    fixture_store().posts()[0].clone()
}

pub fn image_urls() -> ImageUrlBuilder {
    ImageUrlBuilder::new("abcd1234", "production").unwrap()
}

/// Counts how often a post was fetched from the wrapped store.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: FixtureStore,
    fetches: AtomicUsize,
    latency: Option<Duration>,
}

impl CountingStore {
    pub fn fixture() -> Self {
        Self {
            inner: fixture_store(),
            ..Self::default()
        }
    }

    /// Every fetch waits for `latency` before answering.
    pub fn slow(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::fixture()
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for CountingStore {
    async fn fetch_post(&self, slug: &Slug) -> breakroom_cms::Result<Option<Post>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.inner.fetch_post(slug).await
    }

    async fn fetch_slugs(&self) -> breakroom_cms::Result<Vec<Slug>> {
        self.inner.fetch_slugs().await
    }
}

/// Fails every request with the error built by `error`.
#[derive(Debug)]
pub struct FailingStore {
    error: fn() -> CmsError,
}

impl FailingStore {
    pub fn new(error: fn() -> CmsError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl ContentStore for FailingStore {
    async fn fetch_post(&self, _slug: &Slug) -> breakroom_cms::Result<Option<Post>> {
        Err((self.error)())
    }

    async fn fetch_slugs(&self) -> breakroom_cms::Result<Vec<Slug>> {
        Err((self.error)())
    }
}
