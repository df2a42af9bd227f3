//! Allocation advisory workflow

pub mod agent;
pub mod parser;
pub mod prompts;

pub use agent::{
    ALLOCATION_TEMPERATURE, AllocationAgent, AllocationOutcome, AllocationRequest, MarketAnalysis,
    ProposalSource,
};
pub use parser::{FALLBACK_ALLOCATION, Proposal, ProposalParseError, extract_json_object, parse_proposal};
