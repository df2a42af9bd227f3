//! `optera-foundation`: the service layer around `optera-kernel`.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`llm`] | Provider trait, Anthropic client, offline stand-in |
//! | [`market`] | Site API client, Bitcoin quotes, demo data |
//! | [`allocation`] | LLM-driven allocation workflow and proposal parser |
//! | [`chat`] | Operator Q&A with bounded history |
//! | [`cache`] | TTL cache |
//! | [`status`] | Per-collaborator status lines |

pub mod allocation;
pub mod cache;
pub mod chat;
pub mod error;
pub mod llm;
pub mod market;
pub mod status;

pub use allocation::{AllocationAgent, AllocationOutcome, AllocationRequest, ProposalSource};
pub use cache::TtlCache;
pub use chat::{ChatAssistant, ChatConfig};
pub use error::{AllocationError, AllocationResult};
pub use status::{AgentOutput, AgentState, AgentStatusBoard};
