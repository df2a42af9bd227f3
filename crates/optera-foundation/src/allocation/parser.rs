//! Model proposal parsing
//!
//! Replies are free text that should contain one JSON object
//! `{"allocation": {...}, "reasoning": "..."}`. The object may be fenced
//! (```` ```json ````, plain ```` ``` ````) or embedded in prose.

use optera_kernel::AllocationVector;
use serde::Deserialize;
use thiserror::Error;

/// Used whenever the model cannot produce a usable proposal.
pub const FALLBACK_ALLOCATION: AllocationVector = AllocationVector::new(0, 5, 10, 30, 20);

const NO_REASONING: &str = "No reasoning provided";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProposalParseError {
    #[error("reply contains no JSON object")]
    NoJson,

    #[error("reply JSON is malformed: {0}")]
    MalformedJson(String),

    #[error("reply JSON has no \"allocation\" object")]
    MissingAllocation,

    #[error("allocation counts are invalid: {0}")]
    InvalidAllocation(String),
}

/// A parsed model proposal, before feasibility scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub allocation: AllocationVector,
    pub reasoning: String,
}

impl Proposal {
    pub fn fallback(reasoning: impl Into<String>) -> Self {
        Self {
            allocation: FALLBACK_ALLOCATION,
            reasoning: reasoning.into(),
        }
    }
}

/// Locate the JSON object in a model reply.
///
/// Tries a ```` ```json ```` fence, then a plain fence whose body starts with
/// `{`, then the span from the first `{` to the last `}`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let content = &text[start + 7..];
        if let Some(end) = content.find("```") {
            return Some(content[..end].trim());
        }
    }

    if let Some(start) = text.find("```") {
        let content = &text[start + 3..];
        if let Some(end) = content.find("```") {
            let block = content[..end].trim();
            if block.starts_with('{') {
                return Some(block);
            }
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[derive(Deserialize)]
struct RawProposal {
    allocation: Option<serde_json::Value>,
    reasoning: Option<serde_json::Value>,
}

/// Parse a model reply into a [`Proposal`].
pub fn parse_proposal(text: &str) -> Result<Proposal, ProposalParseError> {
    let json = extract_json_object(text).ok_or(ProposalParseError::NoJson)?;

    let raw: RawProposal = serde_json::from_str(json)
        .map_err(|e| ProposalParseError::MalformedJson(e.to_string()))?;

    let allocation = match raw.allocation {
        Some(value @ serde_json::Value::Object(_)) => serde_json::from_value(value)
            .map_err(|e| ProposalParseError::InvalidAllocation(e.to_string()))?,
        _ => return Err(ProposalParseError::MissingAllocation),
    };

    let reasoning = match raw.reasoning {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s,
        Some(serde_json::Value::Null) | None => NO_REASONING.to_string(),
        Some(serde_json::Value::String(_)) => NO_REASONING.to_string(),
        Some(other) => other.to_string(),
    };

    Ok(Proposal {
        allocation,
        reasoning,
    })
}
