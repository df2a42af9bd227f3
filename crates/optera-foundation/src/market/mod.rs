//! Market data
//!
//! [`MarketDataSource`] covers the site API (prices, inventory, machine
//! status and deployment); [`BtcPriceSource`] covers Bitcoin spot quotes.
//! Live implementations talk HTTP; [`mock`] serves the demo site in-process.

pub mod btc;
pub mod error;
pub mod mara;
pub mod mock;
pub mod source;
pub mod types;

pub use btc::{BtcClientConfig, YahooBtcClient};
pub use error::{MarketError, MarketResult};
pub use mara::{HttpMarketClient, MarketClientConfig};
pub use mock::{MockMarketSource, StaticBtcSource};
pub use source::{BtcPriceSource, MarketDataSource};
pub use types::{BtcQuote, SiteStatus};
