//! `optera-gateway`: HTTP surface of the Optera allocation service.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | Layered [`GatewayConfig`] (defaults, file, environment) |
//! | [`state`] | [`AppState`] shared by every handler |
//! | [`handlers`] | Endpoint handlers grouped by concern |
//! | [`server`] | Router assembly and [`GatewayServer`] |
//! | [`error`] | [`GatewayError`] and its JSON rendering |
//!
//! # Quick start
//!
//! ```rust,no_run
//! use optera_gateway::{GatewayConfig, GatewayServer};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = GatewayConfig {
//!         mock_data: true,
//!         ..Default::default()
//!     };
//!     GatewayServer::new(config).start().await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use config::{ConfigError, ConfigResult, GatewayConfig};
pub use error::{GatewayError, GatewayResult};
pub use server::{GatewayServer, build_router};
pub use state::AppState;
