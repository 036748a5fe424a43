//! Application builder: wires router, layers, and state into an Axum app
//! and runs the server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method};
use tokio::sync::watch;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use repairdesk_cache::CacheManager;
use repairdesk_core::config::AppConfig;
use repairdesk_core::config::app::CorsConfig;
use repairdesk_core::error::AppError;
use repairdesk_database::Stores;
use repairdesk_worker::{CronScheduler, TimeoutSweeper};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and layers.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Builds a CORS tower layer from configuration.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age_seconds));

    if config.allows_any_origin() {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    layer
}

/// Runs the RepairDesk server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting RepairDesk server...");

    // ── Step 1: Durable store ────────────────────────────────────
    tracing::info!("Opening store (backend: {:?})...", config.database.backend);
    let stores = Stores::from_config(&config.database).await?;

    // ── Step 2: Cache ────────────────────────────────────────────
    tracing::info!("Initializing cache (provider: {:?})...", config.cache.provider);
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    // ── Step 3: Services and realtime engine ─────────────────────
    let state = AppState::new(config.clone(), stores.clone(), cache);

    // ── Step 4: Timeout sweeper ──────────────────────────────────
    let scheduler = if config.sweeper.enabled {
        let sweeper = Arc::new(TimeoutSweeper::new(
            Arc::clone(&stores.orders),
            Arc::clone(&stores.users),
            Arc::clone(&state.notification_service),
            &config.sweeper,
        )?);
        let scheduler = CronScheduler::new().await?;
        scheduler
            .register_timeout_sweep(sweeper, &config.sweeper.cron)
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Timeout sweeper disabled");
        None
    };

    // ── Step 5: Serve ────────────────────────────────────────────
    let realtime = Arc::clone(&state.realtime);
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("RepairDesk server listening on {}", addr);

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let (stopping_tx, mut stopping_rx) = watch::channel(false);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Open live connections hold graceful shutdown until closed.
            realtime.shutdown();
            let _ = stopping_tx.send(true);
        })
        .into_future();
    tokio::pin!(server);

    let drain_deadline = async move {
        if stopping_rx.wait_for(|stopping| *stopping).await.is_err() {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = &mut server => {
            result.map_err(|e| AppError::internal(format!("Server error: {}", e)))?;
        }
        _ = drain_deadline => {
            tracing::warn!(
                grace_seconds = grace.as_secs(),
                "Graceful shutdown timed out, dropping remaining connections"
            );
        }
    }

    if let Some(scheduler) = scheduler {
        scheduler.shutdown().await?;
    }

    tracing::info!("RepairDesk server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
