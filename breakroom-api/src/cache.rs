//! Rendered pages, kept until their revalidation window runs out.

use crate::render::{self, RenderError};
use breakroom_cms::{CmsError, ContentStore, ImageUrlBuilder};
use breakroom_common::{model::slug::Slug, util::PositiveDuration};
use moka::future::Cache;
use std::{
    fmt::{Debug, Formatter},
    sync::Arc,
};
use thiserror::Error;
use time::{Duration, UtcDateTime};
use tracing::{debug, info, warn};

pub const DEFAULT_REVALIDATE: Duration = Duration::seconds(30);
pub const MAX_CACHED_PAGES: u64 = 1_000;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Post with slug {0} was not found.")]
    NotFound(Slug),
    #[error(transparent)]
    Cms(#[from] CmsError),
    #[error("Page could not be rendered: {0}")]
    Render(#[from] RenderError),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct RenderedPage {
    pub html: String,
    pub rendered_at: UtcDateTime,
}

#[derive(Clone)]
pub struct PageCache {
    pages: Cache<Slug, Arc<RenderedPage>>,
    revalidate: PositiveDuration,
}

impl PageCache {
    #[must_use]
    pub fn new(revalidate: PositiveDuration) -> Self {
        let pages = Cache::builder()
            .max_capacity(MAX_CACHED_PAGES)
            .time_to_live(revalidate.to_std())
            .build();

        Self { pages, revalidate }
    }

    #[must_use]
    pub fn revalidate(&self) -> PositiveDuration {
        self.revalidate
    }

    /// Serves the page from the cache while it is fresh. Otherwise the post is
    /// fetched and rendered again. Concurrent misses for one slug share a
    /// single fetch. Missing posts are not cached.
    pub async fn get_or_render(
        &self,
        slug: &Slug,
        store: &dyn ContentStore,
        images: &ImageUrlBuilder,
    ) -> Result<Option<Arc<RenderedPage>>, Arc<PageError>> {
        let render = async {
            debug!(%slug, "Page missing or stale, rendering");
            let post = store
                .fetch_post(slug)
                .await?
                .ok_or_else(|| PageError::NotFound(slug.clone()))?;

            Ok::<_, PageError>(Arc::new(RenderedPage {
                html: render::post_page(&post, images)?,
                rendered_at: UtcDateTime::now(),
            }))
        };

        match self.pages.try_get_with_by_ref(slug, render).await {
            Ok(page) => Ok(Some(page)),
            Err(error) if matches!(*error, PageError::NotFound(_)) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Renders every post the store knows about, one after another.
    pub async fn prerender(
        &self,
        store: &dyn ContentStore,
        images: &ImageUrlBuilder,
    ) -> Result<usize, CmsError> {
        let slugs = store.fetch_slugs().await?;

        let mut rendered = 0;
        for slug in &slugs {
            match self.get_or_render(slug, store, images).await {
                Ok(Some(_)) => rendered += 1,
                Ok(None) => warn!(%slug, "Enumerated post vanished before prerendering"),
                Err(error) => warn!(%slug, %error, "Could not prerender post"),
            }
        }

        info!(rendered, known = slugs.len(), "Prerendered posts");
        Ok(rendered)
    }
}

impl Debug for PageCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCache")
            .field("pages", &self.pages.entry_count())
            .field("revalidate", &self.revalidate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{CountingStore, FailingStore, image_urls};
    use breakroom_common::model::ModelValidationError;

    fn cache(revalidate: Duration) -> PageCache {
        PageCache::new(PositiveDuration::new_unchecked(revalidate))
    }

    #[tokio::test]
    async fn fresh_pages_are_not_fetched_again() {
        let store = CountingStore::fixture();
        let pages = cache(DEFAULT_REVALIDATE);
        let slug = "better-breaks".parse().unwrap();

        let first = pages
            .get_or_render(&slug, &store, &image_urls())
            .await
            .unwrap()
            .unwrap();
        let second = pages
            .get_or_render(&slug, &store, &image_urls())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(store.fetches(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.html.contains("Taking better breaks"));
    }

    #[tokio::test]
    async fn stale_pages_are_fetched_again() {
        let store = CountingStore::fixture();
        let pages = cache(Duration::milliseconds(200));
        let slug = "better-breaks".parse().unwrap();

        pages
            .get_or_render(&slug, &store, &image_urls())
            .await
            .unwrap();
        assert_eq!(store.fetches(), 1);

        tokio::time::sleep(std::time::Duration::from_millis(500)).await;

        pages
            .get_or_render(&slug, &store, &image_urls())
            .await
            .unwrap();
        assert_eq!(store.fetches(), 2);
    }

    #[tokio::test]
    async fn missing_posts_are_not_cached() {
        let store = CountingStore::fixture();
        let pages = cache(DEFAULT_REVALIDATE);
        let slug = "no-such-post".parse().unwrap();

        for _ in 0..2 {
            let page = pages
                .get_or_render(&slug, &store, &image_urls())
                .await
                .unwrap();
            assert_eq!(page, None);
        }

        assert_eq!(store.fetches(), 2);
    }

    #[tokio::test]
    async fn prerender_fills_the_cache() {
        let store = CountingStore::fixture();
        let pages = cache(DEFAULT_REVALIDATE);

        let rendered = pages.prerender(&store, &image_urls()).await.unwrap();
        assert_eq!(rendered, 2);
        assert_eq!(store.fetches(), 2);

        for slug in ["better-breaks", "stretching-at-your-desk"] {
            pages
                .get_or_render(&slug.parse().unwrap(), &store, &image_urls())
                .await
                .unwrap()
                .unwrap();
        }
        assert_eq!(store.fetches(), 2);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_fetch() {
        let store = CountingStore::slow(std::time::Duration::from_millis(50));
        let pages = cache(DEFAULT_REVALIDATE);
        let slug = "better-breaks".parse().unwrap();
        let urls = image_urls();

        let (first, second) = tokio::join!(
            pages.get_or_render(&slug, &store, &urls),
            pages.get_or_render(&slug, &store, &urls),
        );

        assert_eq!(store.fetches(), 1);
        assert!(Arc::ptr_eq(
            &first.unwrap().unwrap(),
            &second.unwrap().unwrap()
        ));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let store = FailingStore::new(|| ModelValidationError::MissingField("name").into());
        let pages = cache(DEFAULT_REVALIDATE);
        let slug = "better-breaks".parse().unwrap();

        let error = pages
            .get_or_render(&slug, &store, &image_urls())
            .await
            .unwrap_err();
        assert!(matches!(
            *error,
            PageError::Cms(CmsError::Data(ModelValidationError::MissingField("name")))
        ));
        assert_eq!(pages.pages.entry_count(), 0);
    }
}
