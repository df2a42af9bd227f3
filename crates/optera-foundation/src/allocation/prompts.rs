//! Prompt builders for the allocation workflow

use crate::market::SiteStatus;
use optera_kernel::{InventorySpec, PriceSnapshot};
use serde::Serialize;

pub const ANALYST_SYSTEM_PROMPT: &str = "You are a resource allocation analyst for a combined bitcoin mining \
and AI inference site. Assess current market conditions and explain how they should shape the allocation \
of hardware. Weigh cost efficiency, and favour inference workloads to the degree requested.";

pub const OPTIMIZER_SYSTEM_PROMPT: &str = r#"You are an optimization engine for compute-site resource allocation. Your primary goal is to maximize total revenue.

Respond with a single JSON object and nothing else:
{
  "allocation": {
    "air_miners": <integer>,
    "hydro_miners": <integer>,
    "immersion_miners": <integer>,
    "gpu_compute": <integer>,
    "asic_compute": <integer>
  },
  "reasoning": "<short explanation>"
}

Constraints:
- Total power usage must not exceed the site power limit.
- When revenue is similar, favour inference over mining according to the inference priority."#;

/// Inputs of the market analysis prompt.
pub struct AnalysisInput<'a> {
    pub prices: &'a [PriceSnapshot],
    /// How many of the most recent snapshots to include
    pub window: usize,
    pub inventory: &'a InventorySpec,
    pub site_status: Option<&'a SiteStatus>,
    pub inference_priority: f64,
}

pub fn analysis_prompt(input: &AnalysisInput<'_>) -> String {
    let recent = &input.prices[..input.window.min(input.prices.len())];
    let status = input
        .site_status
        .map_or_else(|| "{}".to_string(), |s| pretty(s));

    format!(
        "Current market data:\n\
         - Prices (most recent first): {prices}\n\
         - Inventory: {inventory}\n\
         - Site status: {status}\n\
         - Inference priority: {priority}\n\n\
         Recommend an allocation strategy. Consider:\n\
         1. Price trends for energy, hashrate and inference tokens\n\
         2. Revenue potential of each resource type\n\
         3. Cost efficiency ratios\n\
         4. The inference priority weighting (higher means more focus on inference)\n\n\
         Keep the analysis to two or three short paragraphs.",
        prices = pretty(&recent),
        inventory = pretty(input.inventory),
        priority = input.inference_priority,
    )
}

/// Inputs of the allocation proposal prompt.
pub struct ProposalInput<'a> {
    pub analysis: &'a str,
    pub power_limit_watts: f64,
    pub current_power_watts: f64,
    pub target_revenue: Option<f64>,
    pub inference_priority: f64,
    pub latest_price: Option<&'a PriceSnapshot>,
}

pub fn proposal_prompt(input: &ProposalInput<'_>) -> String {
    let target = input
        .target_revenue
        .map_or_else(|| "maximize".to_string(), |t| format!("{t:.2}"));
    let prices = input.latest_price.map_or_else(
        || "unavailable".to_string(),
        |p| {
            format!(
                "hash={:.2}, token={:.2}, energy={:.3}",
                p.hash_price, p.token_price, p.energy_price
            )
        },
    );

    format!(
        "Market analysis:\n{analysis}\n\n\
         Power constraints:\n\
         - Total power limit: {limit:.0}W\n\
         - Current power usage: {current:.0}W\n\n\
         Objective:\n\
         - Revenue target: {target}\n\
         - Inference priority: {priority:.0}%\n\
         - Latest prices: {prices}\n\n\
         Find the allocation with the highest total revenue within the power limit. \
         Return only the JSON object.",
        analysis = input.analysis,
        limit = input.power_limit_watts,
        current = input.current_power_watts,
        priority = input.inference_priority * 100.0,
    )
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}
