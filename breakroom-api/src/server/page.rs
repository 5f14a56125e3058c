use crate::cache::RenderedPage;
use axum::response::{IntoResponse, Response};
use axum_extra::TypedHeader;
use breakroom_common::util::PositiveDuration;
use headers::{Age, CacheControl, ContentType};
use std::sync::Arc;
use time::UtcDateTime;

/// A rendered page, served with caching headers for its revalidation window.
#[derive(Clone, Debug)]
pub struct Page {
    page: Arc<RenderedPage>,
    revalidate: PositiveDuration,
}

impl Page {
    #[must_use]
    pub fn new(page: Arc<RenderedPage>, revalidate: PositiveDuration) -> Self {
        Self { page, revalidate }
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        let cache_control = CacheControl::new()
            .with_public()
            .with_s_max_age(self.revalidate.to_std());
        let age = (UtcDateTime::now() - self.page.rendered_at)
            .whole_seconds()
            .max(0)
            .cast_unsigned();

        (
            TypedHeader(ContentType::html()),
            TypedHeader(cache_control),
            TypedHeader(Age::from_secs(age)),
            self.page.html.clone(),
        )
            .into_response()
    }
}
