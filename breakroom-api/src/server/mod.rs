use crate::{
    cache::{PageCache, PageError},
    render::ErrorPage,
};
use axum::{
    Router,
    extract::{FromRef, Request, rejection::PathRejection},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use axum_extra::TypedHeader;
use breakroom_cms::{ContentStore, ImageUrlBuilder};
use breakroom_common::model::slug::Slug;
use headers::ContentType;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

mod page;
mod routes;

pub use page::Page;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub store: Arc<dyn ContentStore>,
    pub images: Arc<ImageUrlBuilder>,
    pub pages: PageCache,
}

pub fn routes() -> ServerRouter {
    routes::routes().fallback(fallback)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Post with slug {0} was not found.")]
    PostBySlugNotFound(Slug),
    #[error(transparent)]
    Page(#[from] Arc<PageError>),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::PostBySlugNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Page(page_error) => match page_error.as_ref() {
                PageError::NotFound(_) => StatusCode::NOT_FOUND,
                PageError::Cms(cms_error) if cms_error.is_upstream() => StatusCode::BAD_GATEWAY,
                PageError::Cms(_) | PageError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        (
            status,
            TypedHeader(ContentType::html()),
            ErrorPage(status).to_string(),
        )
            .into_response()
    }
}
