use std::net::SocketAddr;

use dotenvy::dotenv;
use snafu::ResultExt;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use folio::api::{self, App};
use folio::cache::{MemoryCache, VisitorCache};
use folio::config::Config;
use folio::error::{BindAddressSnafu, ConnectDatabaseSnafu, InitError, WebServerSnafu};
use folio::logger;
use folio::store::Store;

#[tokio::main]
async fn main() -> Result<(), InitError> {
    dotenv().ok();

    let config = Config::from_env()?;

    let _guard = logger::init(&config)?;

    let store = config.database().await.context(ConnectDatabaseSnafu)?;

    #[cfg(feature = "redis")]
    if let Some(url) = &config.redis_url {
        let cache = folio::cache::RedisCache::connect(url)
            .await
            .context(folio::error::ConnectCacheSnafu)?;
        return serve(&config, store, cache).await;
    }

    #[cfg(not(feature = "redis"))]
    if config.redis_url.is_some() {
        tracing::warn!("REDIS_URL is set but the `redis` feature is disabled, using the in-memory visitor cache");
    }

    serve(&config, store, MemoryCache::default()).await
}

async fn serve<S, C>(config: &Config, store: S, cache: C) -> Result<(), InitError>
where
    S: Store,
    C: VisitorCache + 'static,
{
    let app = App::new(store, cache, config.analytics());
    let router = api::router(app).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let address = config.host;
    let listener = TcpListener::bind(address)
        .await
        .context(BindAddressSnafu { address })?;

    tracing::info!(%address, "listening");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context(WebServerSnafu)
}
