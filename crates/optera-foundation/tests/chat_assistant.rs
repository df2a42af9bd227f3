mod common;

use common::mock_provider::MockLLMProvider;
use common::{Harness, llm};
use optera_foundation::chat::{CHAT_TEMPERATURE, ChatAssistant, ChatConfig};
use optera_foundation::llm::LLMError;
use serde_json::json;

fn assistant(h: &Harness, config: ChatConfig) -> ChatAssistant {
    ChatAssistant::new(
        h.market.clone(),
        h.btc.clone(),
        h.agent.clone(),
        llm(&h.provider),
        config,
    )
}

#[tokio::test]
async fn reply_is_recorded_with_context() {
    let h = Harness::new(
        MockLLMProvider::builder()
            .respond_with("425 kW in use.")
            .respond_with("ASIC compute earns the most.")
            .build(),
    );
    let chat = assistant(&h, ChatConfig::default());

    let reply = chat.respond("How much power are we using?", None).await;
    assert!(!reply.error);
    assert_eq!(reply.response, "425 kW in use.");
    let ctx = reply.context_used.unwrap();
    assert_eq!(ctx["system_health"], "operational");
    assert_eq!(ctx["site_status"]["total_power_used"], 425_000.0);

    let request = h.provider.last_chat_request().unwrap();
    assert_eq!(request.temperature, Some(CHAT_TEMPERATURE));

    chat.respond("What earns the most?", Some(json!({"page": "dashboard"})))
        .await;
    let prompt = h.provider.last_chat_request().unwrap().messages[1].content.clone();
    assert!(prompt.contains("User: How much power are we using?\nAssistant: 425 kW in use."));
    assert!(prompt.contains("ADDITIONAL CONTEXT: {\"page\":\"dashboard\"}"));
    assert!(prompt.ends_with("User: What earns the most?\n"));

    assert_eq!(chat.conversation_count(), 2);
    let history = chat.history(10);
    assert_eq!(history[0].user_message, "How much power are we using?");
    assert_eq!(history[1].ai_response, "ASIC compute earns the most.");
}

#[tokio::test]
async fn model_failure_is_reported_in_reply() {
    let h = Harness::new(
        MockLLMProvider::builder()
            .respond_with_error(LLMError::NotConfigured("no key".to_string()))
            .build(),
    );
    let chat = assistant(&h, ChatConfig::default());

    let reply = chat.respond("hello", None).await;

    assert!(reply.error);
    assert!(reply.response.starts_with("I'm sorry, I encountered an error:"));
    assert!(reply.context_used.is_none());
    assert_eq!(chat.conversation_count(), 0);
}

#[tokio::test]
async fn market_outage_degrades_context() {
    let h = Harness::new(MockLLMProvider::builder().respond_with("Site data is unavailable.").build());
    h.market.set_available(false);
    let chat = assistant(&h, ChatConfig::default());

    let reply = chat.respond("status?", None).await;

    assert!(!reply.error);
    let health = reply.context_used.unwrap()["system_health"].as_str().unwrap().to_string();
    assert!(health.starts_with("market_connection_error:"));
}

#[tokio::test]
async fn history_is_bounded_and_clearable() {
    let h = Harness::new(MockLLMProvider::builder().build());
    let chat = assistant(
        &h,
        ChatConfig {
            max_history: 3,
            history_window: 2,
        },
    );

    for i in 0..5 {
        chat.respond(&format!("q{i}"), None).await;
    }

    assert_eq!(chat.conversation_count(), 3);
    let last_two: Vec<_> = chat.history(2).into_iter().map(|e| e.user_message).collect();
    assert_eq!(last_two, vec!["q3", "q4"]);

    chat.clear_history();
    assert!(chat.history(10).is_empty());
}

#[tokio::test]
async fn summary_extracts_json() {
    let h = Harness::new(
        MockLLMProvider::builder()
            .respond_with("Prices are stable.")
            .respond_with("Summary follows: {\"health\": \"good\", \"alerts\": []}")
            .build(),
    );
    let chat = assistant(&h, ChatConfig::default());

    let summary = chat.system_summary().await.unwrap();

    assert_eq!(summary.summary["health"], "good");
    assert!(summary.raw_response.starts_with("Summary follows:"));
    let prompt = &h.provider.last_chat_request().unwrap().messages[1].content;
    assert!(prompt.contains("Prices are stable."));
}

#[tokio::test]
async fn summary_wraps_plain_text() {
    let h = Harness::new(
        MockLLMProvider::builder()
            .respond_with("analysis")
            .respond_with("Everything is nominal.")
            .build(),
    );
    let chat = assistant(&h, ChatConfig::default());

    let summary = chat.system_summary().await.unwrap();

    assert_eq!(
        summary.summary,
        json!({"status": "generated", "content": "Everything is nominal."})
    );
}
