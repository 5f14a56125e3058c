use crate::{
    cache::PageCache,
    server::{Page, Result, ServerError, ServerRouter},
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use breakroom_cms::{ContentStore, ImageUrlBuilder};
use breakroom_common::model::slug::Slug;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_get(get_post_page)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{post}", rejection(ServerError))]
struct PostPagePath {
    post: Slug,
}

async fn get_post_page(
    PostPagePath { post }: PostPagePath,
    State(store): State<Arc<dyn ContentStore>>,
    State(images): State<Arc<ImageUrlBuilder>>,
    State(pages): State<PageCache>,
) -> Result<Page> {
    let page = pages
        .get_or_render(&post, store.as_ref(), &images)
        .await?
        .ok_or(ServerError::PostBySlugNotFound(post))?;

    Ok(Page::new(page, pages.revalidate()))
}
