//! HTTP server for the Aqualan storefront.
//!
//! Serves the catalog, delivery-date estimates, orders, and business offer
//! requests as JSON under `/api`, plus the storefront build from `STATIC_DIR`.
//!
//! # Environment
//!
//! - `HOST` / `PORT`: bind address (default `0.0.0.0:8001`)
//! - `STATIC_DIR`: storefront files served for non-API paths
//! - `ROUTE_SHEET`: CSV route sheet, file path or http(s) URL
//! - `MAIL_API_URL` / `MAIL_API_KEY` / `MAIL_FROM`: transactional email API
//! - `STAFF_EMAIL`: recipient of order and offer alerts
//! - `RUST_LOG`: log filter (default `info`)

use axum::Router;
use axum::routing::{get, post, put};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use state::AppState;

/// Build the API router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api", get(routes::root))
        .route("/api/", get(routes::root))
        .route("/api/products", get(routes::list_products))
        .route("/api/products/{id}", get(routes::get_product))
        .route("/api/categories", get(routes::categories))
        .route("/api/delivery-zones", get(routes::delivery_zones))
        .route("/api/delivery-date", get(routes::delivery_date))
        .route("/api/routes", get(routes::routes))
        .route("/api/routes/reload", post(routes::reload_routes))
        .route(
            "/api/orders",
            get(routes::list_orders).post(routes::create_order),
        )
        .route("/api/orders/{id}", get(routes::get_order))
        .route("/api/orders/{id}/status", put(routes::update_order_status))
        .route("/api/offer-request", post(routes::offer_request))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Load configuration, build state, and serve until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if state construction fails or the listener cannot bind.
pub async fn start_server() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Loading configuration...");
    let config = Config::load();

    info!("Initializing state...");
    let state = AppState::from_config(&config).await?;

    let app = match &config.static_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "serving storefront files");
            router(state).fallback_service(ServeDir::new(dir))
        }
        None => router(state),
    };

    let address = config.bind_address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                error!(error = %err, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!(error = %err, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
