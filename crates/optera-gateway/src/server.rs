//! Axum-based HTTP server.
//!
//! Every route is served both at the root and under `/api`.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Service banner |
//! | `GET`  | `/health` | Liveness check |
//! | `GET`  | `/status` | Site status, prices and BTC quote |
//! | `GET`  | `/btc` | BTC quote |
//! | `GET`  | `/market-intelligence` | Model market analysis |
//! | `POST` | `/allocate` | Advisory allocation workflow |
//! | `POST` | `/evaluate` | Deterministic accounting of a given allocation |
//! | `POST` | `/deploy` | Push an allocation to the site |
//! | `POST` | `/chat` | Operator chat |
//! | `GET`  | `/chat/summary` | Structured system summary |
//! | `GET`/`DELETE` | `/chat/history` | Conversation log |
//! | `GET`  | `/agents/outputs` | Status line per collaborator |

use crate::config::GatewayConfig;
use crate::error::GatewayResult;
use crate::handlers::{
    agents_router, allocation_router, chat_router, health_router, market_router,
};
use crate::state::AppState;
use axum::Router;
use axum::http::Method;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health_router())
        .merge(market_router())
        .merge(allocation_router())
        .merge(chat_router())
        .merge(agents_router())
}

/// Any origin, GET/POST/DELETE/OPTIONS, any header.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Full application router over `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let routes = api_routes();
    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct GatewayServer {
    config: GatewayConfig,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Assemble state from the configuration and build the router.
    pub fn build_app(&self) -> GatewayResult<Router> {
        let state = AppState::from_config(&self.config)?;
        Ok(build_router(Arc::new(state)))
    }

    /// Bind and serve until Ctrl-C.
    pub async fn start(self) -> std::io::Result<()> {
        let app = self
            .build_app()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(addr = %addr, mock_data = self.config.mock_data, "Optera gateway listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
