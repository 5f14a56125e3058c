use async_trait::async_trait;
use breakroom_common::model::{ModelValidationError, post::Post, slug::Slug};
use std::fmt::Debug;
use thiserror::Error;

pub type Result<T, E = CmsError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("A document in the content store was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error("Request to the content store failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Content store replied with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Content store JSON could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Fixture file could not be read: {0}")]
    Fixture(#[from] std::io::Error),
    #[error("Invalid content store url: {0}")]
    Url(#[from] url::ParseError),
}

impl CmsError {
    /// Whether the store could not be reached or answered with an error,
    /// as opposed to answering with data we could not use.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, CmsError::Request(_) | CmsError::Status { .. })
    }
}

/// Read-only access to the posts of a headless content store.
#[async_trait]
pub trait ContentStore: Debug + Send + Sync {
    /// `None` if no post has this slug.
    async fn fetch_post(&self, slug: &Slug) -> Result<Option<Post>>;

    /// Slugs of every published post, newest first.
    async fn fetch_slugs(&self) -> Result<Vec<Slug>>;
}
