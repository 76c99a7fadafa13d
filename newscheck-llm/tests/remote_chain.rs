mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{init_test_tracing, Script, ScriptedClient};
use newscheck_analysis::HeuristicScorer;
use newscheck_common::AnalysisMethod;
use newscheck_llm::prompt::build_analysis_prompt;
use newscheck_llm::{LlmClient, RemoteAnalysisClient, RemoteOutcome};

fn chain(clients: &[Arc<ScriptedClient>]) -> RemoteAnalysisClient {
    let endpoints = clients
        .iter()
        .map(|c| c.clone() as Arc<dyn LlmClient>)
        .collect();
    RemoteAnalysisClient::new(endpoints, HeuristicScorer::default())
        .with_attempt_timeout(Duration::from_millis(200))
}

#[tokio::test]
async fn primary_answer_short_circuits_the_chain() {
    init_test_tracing();
    let primary = ScriptedClient::new("gemini", Script::Reply("{\"ok\":true}".into()));
    let alternate = ScriptedClient::new("alternate", Script::Reply("unused".into()));

    let outcome = chain(&[primary.clone(), alternate.clone()])
        .request("prompt")
        .await;

    assert_eq!(
        outcome,
        RemoteOutcome::Remote {
            text: "{\"ok\":true}".into(),
            endpoint: "gemini".into()
        }
    );
    assert_eq!(primary.calls(), 1);
    assert_eq!(alternate.calls(), 0);
}

#[tokio::test]
async fn failed_primary_falls_through_to_alternate() {
    init_test_tracing();
    let primary = ScriptedClient::new("gemini", Script::Fail("HTTP 503".into()));
    let alternate = ScriptedClient::new("alternate", Script::Reply("answer".into()));

    let outcome = chain(&[primary.clone(), alternate.clone()])
        .request("prompt")
        .await;

    match outcome {
        RemoteOutcome::Remote { text, endpoint } => {
            assert_eq!(text, "answer");
            assert_eq!(endpoint, "alternate");
        }
        other => panic!("expected remote outcome, got {other:?}"),
    }
    assert_eq!(primary.calls(), 1);
    assert_eq!(alternate.calls(), 1);
}

#[tokio::test]
async fn empty_text_counts_as_failure() {
    init_test_tracing();
    let primary = ScriptedClient::new("gemini", Script::Reply("   ".into()));
    let alternate = ScriptedClient::new("alternate", Script::Reply("answer".into()));

    let outcome = chain(&[primary, alternate]).request("prompt").await;
    assert!(matches!(outcome, RemoteOutcome::Remote { ref endpoint, .. } if endpoint == "alternate"));
}

#[tokio::test]
async fn total_failure_scores_the_embedded_content() {
    init_test_tracing();
    let text = "SHOCKING news you won't believe!!!! Click and share now";
    let primary = ScriptedClient::new("gemini", Script::Fail("connection refused".into()));
    let alternate = ScriptedClient::new("alternate", Script::Fail("HTTP 401".into()));
    let client = chain(&[primary, alternate]);

    let outcome = client.request(&build_analysis_prompt(text)).await;

    match outcome {
        RemoteOutcome::Fallback { result, failures } => {
            assert_eq!(failures.len(), 2);
            assert!(failures[0].starts_with("gemini:"));
            assert!(failures[1].starts_with("alternate:"));
            assert_eq!(result.analysis_method, AnalysisMethod::Heuristic);
            assert_eq!(result, client.scorer().score(text));
        }
        other => panic!("expected fallback, got {other:?}"),
    }
}

#[tokio::test]
async fn stalled_endpoint_is_abandoned_after_the_attempt_timeout() {
    init_test_tracing();
    let primary = ScriptedClient::new("gemini", Script::Stall(Duration::from_secs(5)));
    let alternate = ScriptedClient::new("alternate", Script::Reply("answer".into()));

    let started = std::time::Instant::now();
    let outcome = chain(&[primary, alternate]).request("prompt").await;

    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(matches!(outcome, RemoteOutcome::Remote { ref endpoint, .. } if endpoint == "alternate"));
}

#[tokio::test]
async fn empty_chain_falls_back_immediately() {
    init_test_tracing();
    let outcome = chain(&[]).request("Plain words.").await;
    match outcome {
        RemoteOutcome::Fallback { result, failures } => {
            assert!(failures.is_empty());
            assert!(result.is_heuristic());
        }
        other => panic!("expected fallback, got {other:?}"),
    }
}
