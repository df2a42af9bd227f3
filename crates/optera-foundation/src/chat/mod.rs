//! Operator chat

pub mod assistant;
pub mod history;

pub use assistant::{CHAT_TEMPERATURE, ChatAssistant, ChatConfig, ChatReply, SystemContext, SystemSummary};
pub use history::{ConversationEntry, ConversationHistory};
