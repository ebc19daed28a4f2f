//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use super::middleware;
use super::openapi::openapi_json;
use super::routes::{self, health};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::data::FlowDataService;
use crate::domain::DashboardService;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Full application router
    pub fn router(dashboard: Arc<DashboardService>, flows: Arc<FlowDataService>) -> Router {
        Router::new()
            .route("/", get(health::root))
            .route("/api/health", get(health::health))
            .route("/api/openapi.json", get(openapi_json))
            .merge(routes::routes(dashboard, flows))
            .fallback(middleware::handle_404)
            .layer(CompressionLayer::new())
            .layer(middleware::cors())
            .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
    }

    /// Serve until shutdown; returns CoreApp once connections drained
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;
        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;

        let router = Self::router(app.dashboard.clone(), app.flows.clone());

        // Host may be a name such as "localhost"
        let listener = TcpListener::bind((host.as_str(), port))
            .await
            .with_context(|| format!("Failed to bind {host}:{port}"))?;
        if let Ok(addr) = listener.local_addr() {
            tracing::debug!(%addr, "Listening");
        }

        let serve = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .into_future();

        tokio::select! {
            result = serve => result?,
            _ = shutdown.drain_deadline() => {
                tracing::warn!("Shutdown timeout reached, dropping open connections");
            }
        }

        Ok(app)
    }
}
