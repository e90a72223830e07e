//! Atelier server entry point.

use std::{net::SocketAddr, sync::Arc};

use atelier_api::AppState;
use atelier_common::{Config, LocalMediaStore};
use atelier_core::{
    ActorIdentityProvider, EngagementService, FeedService, SubjectService, VariantService,
};
use atelier_db::repositories::{
    ActorRepository, CatalogTypeRepository, CollectionRepository, EngagementRepository,
    StockRepository, SubjectRepository, VariantMediaRepository, VariantRepository,
};
use axum::Router;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atelier=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting atelier server...");

    let config = Config::load()?;

    let db = Arc::new(atelier_db::init(&config).await?);
    info!("Connected to database");

    info!("Running database migrations...");
    atelier_db::migrate(&db).await?;
    info!("Migrations completed");

    // Repositories
    let actor_repo = ActorRepository::new(Arc::clone(&db));
    let catalog_type_repo = CatalogTypeRepository::new(Arc::clone(&db));
    let collection_repo = CollectionRepository::new(Arc::clone(&db));
    let variant_repo = VariantRepository::new(Arc::clone(&db));
    let stock_repo = StockRepository::new(Arc::clone(&db));
    let media_repo = VariantMediaRepository::new(Arc::clone(&db));
    let subject_repo = SubjectRepository::new(Arc::clone(&db));
    let engagement_repo = EngagementRepository::new(Arc::clone(&db));

    let media_store = Arc::new(LocalMediaStore::new(
        config.media.base_path.clone(),
        config.media.base_url.clone(),
    ));

    // Services
    let state = AppState {
        variant_service: VariantService::new(
            catalog_type_repo,
            collection_repo.clone(),
            variant_repo.clone(),
            stock_repo,
            media_repo.clone(),
            media_store,
        ),
        subject_service: SubjectService::new(subject_repo.clone(), collection_repo),
        engagement_service: EngagementService::new(subject_repo.clone(), engagement_repo.clone()),
        feed_service: FeedService::new(
            subject_repo,
            variant_repo,
            media_repo,
            engagement_repo,
            config.catalog.clone(),
        ),
        identity: Arc::new(ActorIdentityProvider::new(actor_repo)),
    };

    // Build router
    let mut app = Router::new().nest("/api", atelier_api::app(state));

    // Local media is served by this process when its public URL is a path.
    let media_path = config.media.base_url.trim_end_matches('/');
    if media_path.starts_with('/') {
        app = app.nest_service(media_path, ServeDir::new(&config.media.base_path));
    }

    let app = app.layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
