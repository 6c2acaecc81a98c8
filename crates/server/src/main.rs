//! Imgarena server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use imgarena_api::{auth_middleware, middleware::AppState, router as api_router};
use imgarena_common::{storage, Config, TokenService};
use imgarena_core::{ComparisonService, IdentityService, MediaService, RatingService};
use imgarena_db::repositories::{ComparisonRepository, RatingRepository, UserRepository};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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

/// Socket address from the configured host IP and port.
fn bind_addr(host: &str, port: u16) -> Result<SocketAddr, std::net::AddrParseError> {
    Ok(SocketAddr::new(host.parse()?, port))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imgarena=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting imgarena server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = imgarena_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    imgarena_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories over the shared pool
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let comparison_repo = ComparisonRepository::new(Arc::clone(&db));
    let rating_repo = RatingRepository::new(Arc::clone(&db));

    // Initialize storage backend
    let object_storage = storage::from_settings(&config.storage).await?;
    info!("Storage backend ready");

    // Initialize services
    let token_service = TokenService::new(&config.auth.jwt_secret, config.auth.token_expiry_days);
    let identity_service = IdentityService::new(user_repo, token_service);
    let comparison_service = ComparisonService::new(comparison_repo.clone());
    let rating_service = RatingService::new(rating_repo, comparison_repo);
    let media_service = MediaService::new(object_storage);

    // Create app state
    let state = AppState {
        identity_service,
        comparison_service,
        rating_service,
        media_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = bind_addr(&config.server.host, config.server.port)?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_addr_honors_configured_host() {
        let addr = bind_addr("127.0.0.1", 8080).unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8080");

        let any = bind_addr("0.0.0.0", 3000).unwrap();
        assert_eq!(any.to_string(), "0.0.0.0:3000");

        assert!(bind_addr("not-an-ip", 3000).is_err());
    }
}
