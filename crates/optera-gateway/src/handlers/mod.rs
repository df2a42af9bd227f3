//! Request handlers for the gateway API

pub mod agents;
pub mod allocation;
pub mod chat;
pub mod health;
pub mod market;

pub use agents::agents_router;
pub use allocation::allocation_router;
pub use chat::chat_router;
pub use health::health_router;
pub use market::market_router;
