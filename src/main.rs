use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod models;
mod navigator;
mod registry;
mod resolver;
mod slug;
mod store;

use config::{AppConfig, StoreBackend};
use registry::{Registry, SystemClock};
use resolver::Resolver;
use slug::RandomSlugs;
use store::{FileStore, KeyValueStore, MemoryStore};

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub config: AppConfig,
    /// Sole owner of the link collection; the creation views and the
    /// resolver share this one instance.
    pub registry: Arc<Registry>,
    pub resolver: Resolver,
}

// ── Router ─────────────────────────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route(
            "/links",
            get(handlers::api::list_links).post(handlers::api::create_link),
        )
        .route("/links/:slug", delete(handlers::api::delete_link));

    Router::new()
        // Creation form + analytics dashboard
        .route("/", get(handlers::home::index))
        .route("/links", post(handlers::home::create_link))
        .route("/links/:slug/delete", post(handlers::home::delete_link))
        .route("/health", get(|| async { axum::http::StatusCode::OK }))
        .nest("/api", api_router)
        // Short-link redirect. Static segments outrank `:slug` regardless of
        // registration order, so slugs like `health` or `api` never resolve.
        .route("/:slug", get(handlers::redirect::redirect))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (ignore error if file is absent — env vars may already be set)
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quicklink=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!("Starting Quicklink on {}", config.bind_addr());
    tracing::info!("Base URL: {}", config.base_url);

    let store: Arc<dyn KeyValueStore> = match config.store_backend {
        StoreBackend::File => {
            let store = FileStore::open(&config.data_dir)?;
            tracing::info!("Persisting links under {}", store.dir().display());
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; links are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let registry = Arc::new(
        Registry::new(store)
            .with_clock(Arc::new(SystemClock))
            .with_slug_generator(Arc::new(RandomSlugs)),
    );
    tracing::info!("Loaded {} link(s)", registry.list()?.len());

    let state = Arc::new(AppState {
        resolver: Resolver::new(registry.clone()),
        registry,
        config,
    });

    let listener = tokio::net::TcpListener::bind(state.config.bind_addr()).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;

    Ok(())
}
