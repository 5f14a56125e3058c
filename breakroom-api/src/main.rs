use breakroom_api::{
    cache::{DEFAULT_REVALIDATE, PageCache},
    server::{self, ServerState},
};
use breakroom_cms::{
    CmsError, ContentStore, FixtureStore, ImageUrlBuilder, SanityClient, SanityConfig,
    sanity::DEFAULT_API_VERSION,
};
use breakroom_common::util::{NonPositiveDurationError, PositiveDuration};
use serde::Deserialize;
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};
use thiserror::Error;
use time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Invalid revalidation window: {0}")]
    Revalidate(#[from] NonPositiveDurationError),
    #[error("Error setting up the content store: {0}")]
    ContentStore(#[from] CmsError),
    #[error("Invalid image url base: {0}")]
    ImageUrl(#[from] url::ParseError),
    #[error("Error binding tcp listener: {0}")]
    TcpBind(std::io::Error),
    #[error("Error serving server: {0}")]
    TcpServe(std::io::Error),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    server_address: IpAddr,
    server_port: u16,
    sanity_project_id: String,
    sanity_dataset: String,
    #[serde(default = "default_api_version")]
    sanity_api_version: String,
    #[serde(default)]
    sanity_use_cdn: bool,
    sanity_token: Option<String>,
    fixture_path: Option<PathBuf>,
    #[serde(default = "default_revalidate_seconds")]
    revalidate_seconds: i64,
    #[serde(default = "default_prerender")]
    prerender: bool,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

fn default_revalidate_seconds() -> i64 {
    DEFAULT_REVALIDATE.whole_seconds()
}

fn default_prerender() -> bool {
    true
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "breakroom_api=debug,\
                breakroom_cms=debug,\
                breakroom_common=debug,\
                tower_http=debug,axum::rejection=trace"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(InitError::from)
}

async fn content_store(env: &Env) -> Result<Arc<dyn ContentStore>, InitError> {
    if let Some(fixture_path) = &env.fixture_path {
        info!(path = %fixture_path.display(), "Serving posts from fixture file");
        return Ok(Arc::new(FixtureStore::load(fixture_path).await?));
    }

    let config = SanityConfig {
        project_id: env.sanity_project_id.clone(),
        dataset: env.sanity_dataset.clone(),
        api_version: env.sanity_api_version.clone(),
        use_cdn: env.sanity_use_cdn,
        token: env.sanity_token.clone(),
    };
    info!(?config, "Serving posts from Sanity");

    Ok(Arc::new(SanityClient::new(&config)?))
}

fn shutdown_signal() -> CancellationToken {
    let shutdown = CancellationToken::new();

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Could not listen for ctrl-c");
                return;
            }
            info!("Shutting down");
            shutdown.cancel();
        }
    });

    shutdown
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;

    let revalidate = PositiveDuration::try_from(Duration::seconds(env.revalidate_seconds))?;
    let state = ServerState {
        store: content_store(&env).await?,
        images: Arc::new(ImageUrlBuilder::new(
            &env.sanity_project_id,
            &env.sanity_dataset,
        )?),
        pages: PageCache::new(revalidate),
    };

    if env.prerender
        && let Err(e) = state
            .pages
            .prerender(state.store.as_ref(), &state.images)
            .await
    {
        warn!(error = %e, "Could not enumerate posts to prerender");
    }

    let tracing_layer = TraceLayer::new_for_http();
    let app = server::routes().with_state(state).layer(tracing_layer);

    let server_address = SocketAddr::new(env.server_address, env.server_port);
    let listener = tokio::net::TcpListener::bind(server_address)
        .await
        .map_err(InitError::TcpBind)?;
    info!(%server_address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal().cancelled_owned())
        .await
        .map_err(InitError::TcpServe)?;

    Ok(())
}
