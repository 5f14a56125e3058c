use crate::{
    client::{CmsError, ContentStore, Result},
    record::{PostRecord, QueryResponse, SlugProjectionRecord},
};
use async_trait::async_trait;
use breakroom_common::model::{post::Post, slug::Slug};
use serde::de::DeserializeOwned;
use std::fmt::{Debug, Formatter};
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_API_VERSION: &str = "2023-05-03";

pub const POST_BY_SLUG_QUERY: &str = r#"*[_type == "post" && slug.current == $slug][0]{
    _id,
    _createdAt,
    name,
    slug,
    image,
    content
}"#;

pub const POST_SLUGS_QUERY: &str =
    r#"*[_type == "post" && defined(slug.current)] | order(_createdAt desc){ "slug": slug.current }"#;

#[derive(Clone, Eq, PartialEq, Hash)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub token: Option<String>,
}

/// Queries a Sanity dataset with GROQ over the HTTP query API.
pub struct SanityClient {
    http: reqwest::Client,
    query_url: Url,
    token: Option<String>,
}

impl SanityClient {
    pub fn new(config: &SanityConfig) -> Result<Self> {
        let host = if config.use_cdn { "apicdn" } else { "api" };
        let query_url = Url::parse(&format!(
            "https://{}.{host}.sanity.io/v{}/data/query/{}",
            config.project_id, config.api_version, config.dataset
        ))?;

        Ok(Self {
            http: reqwest::Client::new(),
            query_url,
            token: config.token.clone(),
        })
    }

    /// Parameters are referenced as `$name` in the query and sent JSON encoded.
    pub fn query_url(&self, query: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.query_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            for (name, value) in params {
                pairs.append_pair(&format!("${name}"), &serde_json::to_string(value)?);
            }
        }

        Ok(url)
    }

    async fn query<T: DeserializeOwned>(&self, query: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = self.query_url(query, params)?;

        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CmsError::Status { status, body });
        }

        let response: QueryResponse<T> = response.json().await?;
        Ok(response.result)
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn fetch_post(&self, slug: &Slug) -> Result<Option<Post>> {
        debug!(%slug, "Querying post");

        let record: Option<PostRecord> = self
            .query(POST_BY_SLUG_QUERY, &[("slug", slug.get())])
            .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    async fn fetch_slugs(&self) -> Result<Vec<Slug>> {
        debug!("Querying post slugs");

        let records: Vec<SlugProjectionRecord> = self.query(POST_SLUGS_QUERY, &[]).await?;

        Ok(valid_slugs(records))
    }
}

/// Drops documents whose slug cannot be routed.
fn valid_slugs(records: Vec<SlugProjectionRecord>) -> Vec<Slug> {
    records
        .into_iter()
        .filter_map(|record| match Slug::new(record.slug) {
            Ok(slug) => Some(slug),
            Err(error) => {
                warn!(%error, "Skipping post with invalid slug");
                None
            }
        })
        .collect()
}

impl Debug for SanityConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("use_cdn", &self.use_cdn)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl Debug for SanityClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityClient")
            .field("query_url", &self.query_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}
