//! Allocation agent
//!
//! `optimize` runs: fetch → analyze → propose → parse → scale → account.
//! Market data failures abort the run; model failures of any kind degrade to
//! [`FALLBACK_ALLOCATION`](super::parser::FALLBACK_ALLOCATION), still accounted against live market data.

use super::parser::{Proposal, parse_proposal};
use super::prompts::{
    ANALYST_SYSTEM_PROMPT, AnalysisInput, OPTIMIZER_SYSTEM_PROMPT, ProposalInput,
    analysis_prompt, proposal_prompt,
};
use crate::error::{AllocationError, AllocationResult};
use crate::llm::LLMClient;
use crate::market::{MarketDataSource, SiteStatus};
use optera_kernel::accounting::{self, AllocationReport, DEFAULT_POWER_LIMIT_WATTS, RevenueBreakdown};
use optera_kernel::{AllocationVector, InventorySpec, PriceSnapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Sampling temperature for analysis and proposal prompts.
pub const ALLOCATION_TEMPERATURE: f32 = 0.1;

/// Snapshots shown to the model during `optimize`.
const OPTIMIZE_PRICE_WINDOW: usize = 3;
/// Snapshots shown to the model during standalone analysis.
const ANALYSIS_PRICE_WINDOW: usize = 5;
/// Inference priority used for standalone analysis.
const ANALYSIS_INFERENCE_PRIORITY: f64 = 0.8;

/// Parameters of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    #[serde(default)]
    pub target_revenue: Option<f64>,
    /// 0–1; higher favours inference pools
    #[serde(default = "default_inference_priority")]
    pub inference_priority: f64,
    #[serde(default)]
    pub power_limit: Option<f64>,
}

fn default_inference_priority() -> f64 {
    0.8
}

impl Default for AllocationRequest {
    fn default() -> Self {
        Self {
            target_revenue: None,
            inference_priority: default_inference_priority(),
            power_limit: None,
        }
    }
}

impl AllocationRequest {
    pub fn with_inference_priority(mut self, priority: f64) -> Self {
        self.inference_priority = priority;
        self
    }

    pub fn with_power_limit(mut self, watts: f64) -> Self {
        self.power_limit = Some(watts);
        self
    }

    pub fn with_target_revenue(mut self, revenue: f64) -> Self {
        self.target_revenue = Some(revenue);
        self
    }
}

/// Where the accounted allocation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalSource {
    Model,
    Fallback,
}

/// Result of [`AllocationAgent::optimize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub allocation: AllocationVector,
    pub expected_revenue: f64,
    pub expected_cost: f64,
    pub efficiency_score: f64,
    pub reasoning: String,
    pub revenue_breakdown: RevenueBreakdown,
    pub power_usage_watts: f64,
    pub scale_factor: f64,
    pub source: ProposalSource,
}

/// Result of [`AllocationAgent::analyze_market_conditions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub analysis: String,
    pub current_prices: Vec<PriceSnapshot>,
    pub inventory: InventorySpec,
    /// Timestamp of the most recent snapshot
    pub timestamp: Option<String>,
}

/// LLM-driven allocation advisor.
pub struct AllocationAgent {
    market: Arc<dyn MarketDataSource>,
    llm: LLMClient,
    default_power_limit: f64,
}

impl AllocationAgent {
    pub fn new(market: Arc<dyn MarketDataSource>, llm: LLMClient) -> Self {
        Self {
            market,
            llm,
            default_power_limit: DEFAULT_POWER_LIMIT_WATTS,
        }
    }

    /// Power budget used when a request does not set one.
    pub fn with_default_power_limit(mut self, watts: f64) -> Self {
        self.default_power_limit = watts;
        self
    }

    pub fn market(&self) -> &Arc<dyn MarketDataSource> {
        &self.market
    }

    #[instrument(skip(self), fields(source = self.market.name()))]
    pub async fn optimize(&self, request: &AllocationRequest) -> AllocationResult<AllocationOutcome> {
        let (prices, inventory, site_status) = tokio::try_join!(
            self.market.prices(),
            self.market.inventory(),
            self.market.site_status(),
        )?;

        let power_limit = accounting::resolve_power_limit(request.power_limit, self.default_power_limit);

        let (proposal, source) = match self
            .propose(request, power_limit, &prices, &inventory, &site_status)
            .await
        {
            Ok(proposal) => (proposal, ProposalSource::Model),
            Err(reason) => {
                warn!(%reason, "using fallback allocation");
                (
                    Proposal::fallback(format!("Fallback allocation: {reason}")),
                    ProposalSource::Fallback,
                )
            }
        };

        let report = accounting::evaluate(&proposal.allocation, &inventory, &prices, Some(power_limit));

        let outcome = into_outcome(report, proposal.reasoning, source);

        info!(
            allocation = %outcome.allocation,
            revenue = outcome.expected_revenue,
            cost = outcome.expected_cost,
            scale_factor = outcome.scale_factor,
            ?source,
            "allocation optimized"
        );

        Ok(outcome)
    }

    /// Analysis then proposal. Any model or parse failure is returned as a
    /// description for the fallback reasoning.
    async fn propose(
        &self,
        request: &AllocationRequest,
        power_limit: f64,
        prices: &[PriceSnapshot],
        inventory: &InventorySpec,
        site_status: &SiteStatus,
    ) -> Result<Proposal, String> {
        let analysis = self
            .llm
            .ask_with_system(
                ANALYST_SYSTEM_PROMPT,
                analysis_prompt(&AnalysisInput {
                    prices,
                    window: OPTIMIZE_PRICE_WINDOW,
                    inventory,
                    site_status: Some(site_status),
                    inference_priority: request.inference_priority,
                }),
                ALLOCATION_TEMPERATURE,
            )
            .await
            .map_err(|e| format!("market analysis failed: {e}"))?;

        let reply = self
            .llm
            .ask_with_system(
                OPTIMIZER_SYSTEM_PROMPT,
                proposal_prompt(&ProposalInput {
                    analysis: &analysis,
                    power_limit_watts: power_limit,
                    current_power_watts: site_status.total_power_used,
                    target_revenue: request.target_revenue,
                    inference_priority: request.inference_priority,
                    latest_price: prices.first(),
                }),
                ALLOCATION_TEMPERATURE,
            )
            .await
            .map_err(|e| format!("proposal request failed: {e}"))?;

        parse_proposal(&reply).map_err(|e| format!("could not parse model proposal: {e}"))
    }

    /// Market commentary over the latest prices and inventory.
    #[instrument(skip(self), fields(source = self.market.name()))]
    pub async fn analyze_market_conditions(&self) -> AllocationResult<MarketAnalysis> {
        let (prices, inventory) = tokio::try_join!(self.market.prices(), self.market.inventory())?;

        let analysis = self
            .llm
            .ask_with_system(
                ANALYST_SYSTEM_PROMPT,
                analysis_prompt(&AnalysisInput {
                    prices: &prices,
                    window: ANALYSIS_PRICE_WINDOW,
                    inventory: &inventory,
                    site_status: None,
                    inference_priority: ANALYSIS_INFERENCE_PRIORITY,
                }),
                ALLOCATION_TEMPERATURE,
            )
            .await
            .map_err(AllocationError::Llm)?;

        let timestamp = prices
            .first()
            .map(|p| p.timestamp.clone())
            .filter(|t| !t.is_empty());

        Ok(MarketAnalysis {
            analysis,
            current_prices: prices,
            inventory,
            timestamp,
        })
    }
}

fn into_outcome(
    report: AllocationReport,
    mut reasoning: String,
    source: ProposalSource,
) -> AllocationOutcome {
    if report.scale_factor < 1.0 {
        reasoning.push(' ');
        reasoning.push_str(&accounting::scale_annotation(report.scale_factor));
    }
    AllocationOutcome {
        allocation: report.allocation,
        expected_revenue: report.revenue.total,
        expected_cost: report.expected_cost,
        efficiency_score: report.efficiency_score,
        reasoning,
        revenue_breakdown: report.revenue,
        power_usage_watts: report.power_usage_watts,
        scale_factor: report.scale_factor,
        source,
    }
}
