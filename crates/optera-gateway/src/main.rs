//! Optera gateway entry point.
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OPTERA_CONFIG` | *(none)* | Configuration file (toml, json, yaml, ...). |
//! | `OPTERA_*` | | Any setting, `__` between levels, e.g. `OPTERA_LLM__MODEL`. |
//! | `ANTHROPIC_API_KEY` | *(none)* | Language model key; offline mode without it. |
//! | `MARA_API_KEY` | *(none)* | Site API key for machine endpoints. |
//! | `PORT` | `8000` | TCP port, unless `OPTERA_PORT` is set. |
//! | `OPTERA_LOG_FORMAT` | `text` | `json` for structured log lines. |
//! | `RUST_LOG` | `optera_gateway=info,optera_foundation=info` | Log filter. |

use optera_gateway::{GatewayConfig, GatewayServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "optera_gateway=info,optera_foundation=info,tower_http=info";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("OPTERA_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    // A missing .env is fine.
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded .env");
    }

    let config = match GatewayConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    info!(
        addr = %config.bind_addr(),
        mock_data = config.mock_data,
        market = %config.market.base_url,
        llm_configured = config.llm.has_api_key(),
        "Optera gateway configuration loaded"
    );

    if let Err(e) = GatewayServer::new(config).start().await {
        eprintln!("Gateway error: {e}");
        std::process::exit(1);
    }
}
