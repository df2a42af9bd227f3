mod common;

use common::Harness;
use common::mock_provider::MockLLMProvider;
use optera_foundation::allocation::{ALLOCATION_TEMPERATURE, FALLBACK_ALLOCATION};
use optera_foundation::llm::LLMError;
use optera_foundation::{AllocationError, AllocationRequest, ProposalSource};
use optera_kernel::AllocationVector;

const PROPOSAL: &str = r#"Based on the analysis:
```json
{
  "allocation": {"hydro_miners": 100, "gpu_compute": 100, "asic_compute": 50},
  "reasoning": "ASIC inference dominates at current token prices"
}
```"#;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * b.abs().max(1.0)
}

#[tokio::test]
async fn model_proposal_is_scaled_to_the_power_budget() {
    let h = Harness::new(
        MockLLMProvider::builder()
            .respond_with("Token prices are strong.")
            .respond_with(PROPOSAL)
            .build(),
    );

    let outcome = h.agent.optimize(&AllocationRequest::default()).await.unwrap();

    assert_eq!(outcome.source, ProposalSource::Model);
    // 1.75 MW requested against the 1 MW default budget.
    assert!(approx(outcome.scale_factor, 1_000_000.0 / 1_750_000.0));
    assert_eq!(outcome.allocation, AllocationVector::new(0, 57, 0, 57, 28));
    assert_eq!(outcome.power_usage_watts, 990_000.0);
    assert!(approx(outcome.expected_cost, 990_000.0 * 1.337));
    assert!(outcome.reasoning.starts_with("ASIC inference dominates"));
    assert!(
        outcome
            .reasoning
            .ends_with("(Scaled down by 0.57 to meet power constraints)")
    );
}

#[tokio::test]
async fn prompts_carry_request_parameters() {
    let h = Harness::new(
        MockLLMProvider::builder()
            .respond_with("analysis")
            .respond_with(PROPOSAL)
            .build(),
    );

    let request = AllocationRequest::default()
        .with_power_limit(2_000_000.0)
        .with_target_revenue(5_000.0)
        .with_inference_priority(0.6);
    let outcome = h.agent.optimize(&request).await.unwrap();
    assert_eq!(outcome.scale_factor, 1.0);

    let calls = h.provider.chat_calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.temperature == Some(ALLOCATION_TEMPERATURE)));

    let analysis_prompt = &calls[0].messages.last().unwrap().content;
    assert!(analysis_prompt.contains("Inference priority: 0.6"));

    let proposal_prompt = &calls[1].messages.last().unwrap().content;
    assert!(proposal_prompt.contains("Market analysis:\nanalysis"));
    assert!(proposal_prompt.contains("Total power limit: 2000000W"));
    assert!(proposal_prompt.contains("Current power usage: 425000W"));
    assert!(proposal_prompt.contains("Revenue target: 5000.00"));
}

#[tokio::test]
async fn unparseable_proposal_uses_fallback() {
    let h = Harness::new(
        MockLLMProvider::builder()
            .respond_with("analysis")
            .respond_with("I would rather not commit to numbers.")
            .build(),
    );

    let outcome = h.agent.optimize(&AllocationRequest::default()).await.unwrap();

    assert_eq!(outcome.source, ProposalSource::Fallback);
    assert_eq!(outcome.allocation, FALLBACK_ALLOCATION);
    assert!(outcome.reasoning.starts_with("Fallback allocation:"));
    assert_eq!(outcome.power_usage_watts, 575_000.0);
    assert!(approx(outcome.revenue_breakdown.mining, 150_000.0));
    assert!(approx(outcome.revenue_breakdown.inference, 3_666_800.0));
    assert!(approx(outcome.expected_revenue, 3_816_800.0));
    assert!(approx(outcome.expected_cost, 768_775.0));
    assert!(approx(outcome.efficiency_score, 3_816_800.0 / 768_775.0 * 20.0));
}

#[tokio::test]
async fn model_error_uses_fallback_without_second_call() {
    let h = Harness::new(
        MockLLMProvider::builder()
            .respond_with_error(LLMError::Timeout("upstream slow".to_string()))
            .build(),
    );

    let outcome = h.agent.optimize(&AllocationRequest::default()).await.unwrap();

    assert_eq!(outcome.source, ProposalSource::Fallback);
    assert!(outcome.reasoning.contains("upstream slow"));
    assert_eq!(h.provider.chat_call_count(), 1);
}

#[tokio::test]
async fn fallback_is_scaled_under_a_tight_limit() {
    let h = Harness::new(MockLLMProvider::builder().build());

    let request = AllocationRequest::default().with_power_limit(100_000.0);
    let outcome = h.agent.optimize(&request).await.unwrap();

    assert_eq!(outcome.source, ProposalSource::Fallback);
    assert_eq!(outcome.allocation, AllocationVector::new(0, 0, 1, 5, 3));
    assert_eq!(outcome.power_usage_watts, 80_000.0);
    assert!(outcome.reasoning.ends_with("(Scaled down by 0.17 to meet power constraints)"));
}

#[tokio::test]
async fn zero_power_limit_means_the_default_budget() {
    let h = Harness::new(MockLLMProvider::builder().build());

    let request = AllocationRequest::default().with_power_limit(0.0);
    let outcome = h.agent.optimize(&request).await.unwrap();

    assert_eq!(outcome.allocation, FALLBACK_ALLOCATION);
    assert_eq!(outcome.scale_factor, 1.0);
    assert_eq!(outcome.power_usage_watts, 575_000.0);
    assert!(!outcome.reasoning.contains("Scaled down"));
}

#[tokio::test]
async fn market_outage_is_an_error() {
    let h = Harness::new(MockLLMProvider::builder().build());
    h.market.set_available(false);

    let err = h.agent.optimize(&AllocationRequest::default()).await.unwrap_err();

    assert!(matches!(err, AllocationError::Market(_)));
    assert_eq!(h.provider.chat_call_count(), 0);
}

#[tokio::test]
async fn standalone_analysis_returns_market_data() {
    let h = Harness::new(
        MockLLMProvider::builder()
            .respond_with("Energy is cheap; favour ASIC inference.")
            .build(),
    );

    let analysis = h.agent.analyze_market_conditions().await.unwrap();

    assert_eq!(analysis.analysis, "Energy is cheap; favour ASIC inference.");
    assert_eq!(analysis.current_prices.len(), 1);
    assert_eq!(analysis.timestamp.as_deref(), Some("2025-06-21T20:00:00"));

    let prompt = &h.provider.last_chat_request().unwrap().messages[1].content;
    assert!(prompt.contains("Inference priority: 0.8"));
}

#[tokio::test]
async fn standalone_analysis_surfaces_model_errors() {
    let h = Harness::new(
        MockLLMProvider::builder()
            .respond_with_error(LLMError::NetworkError("refused".to_string()))
            .build(),
    );

    let err = h.agent.analyze_market_conditions().await.unwrap_err();
    assert!(matches!(err, AllocationError::Llm(LLMError::NetworkError(_))));
}
