//! Ordered chain of remote endpoints with a heuristic safety net.
//!
//! [`RemoteAnalysisClient::request`] never fails. It returns either the raw
//! text of the first endpoint that answered, or a heuristic verdict for the
//! prompt's content together with one message per failed endpoint. Whether
//! remote text is trustworthy is decided by the caller
//! ([`crate::analyzer::Analyzer`]).

use crate::prompt::prompt_content;
use crate::traits::LlmClient;
use newscheck_analysis::HeuristicScorer;
use newscheck_common::{AnalysisResult, GenerationParams};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(8);

/// Keys issued for the alternate endpoint carry this prefix.
const ALTERNATE_KEY_PREFIX: &str = "AQ.";

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome {
    /// Unvalidated text from the endpoint named `endpoint`.
    Remote { text: String, endpoint: String },
    /// Every endpoint failed; `result` is the heuristic score of the prompt content.
    Fallback {
        result: AnalysisResult,
        failures: Vec<String>,
    },
}

/// Whether an API key should be tried against the alternate endpoint first.
pub fn prefers_alternate(api_key: &str) -> bool {
    api_key.trim().starts_with(ALTERNATE_KEY_PREFIX)
}

pub struct RemoteAnalysisClient {
    endpoints: Vec<Arc<dyn LlmClient>>,
    scorer: HeuristicScorer,
    params: GenerationParams,
    attempt_timeout: Duration,
}

impl RemoteAnalysisClient {
    /// `endpoints` are tried in order, once each.
    pub fn new(endpoints: Vec<Arc<dyn LlmClient>>, scorer: HeuristicScorer) -> Self {
        Self {
            endpoints,
            scorer,
            params: GenerationParams::default(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn scorer(&self) -> &HeuristicScorer {
        &self.scorer
    }

    pub fn endpoint_names(&self) -> Vec<&str> {
        self.endpoints.iter().map(|c| c.endpoint_name()).collect()
    }

    pub async fn request(&self, prompt: &str) -> RemoteOutcome {
        let mut failures = Vec::with_capacity(self.endpoints.len());

        for client in &self.endpoints {
            let endpoint = client.endpoint_name();
            let attempt =
                tokio::time::timeout(self.attempt_timeout, client.generate(prompt, &self.params))
                    .await;

            let failure = match attempt {
                Ok(Ok(resp)) if !resp.text.trim().is_empty() => {
                    tracing::debug!(
                        endpoint,
                        model = client.model_name(),
                        tokens_used = ?resp.tokens_used,
                        "remote.endpoint.ok"
                    );
                    return RemoteOutcome::Remote {
                        text: resp.text,
                        endpoint: endpoint.to_string(),
                    };
                }
                Ok(Ok(_)) => format!("{endpoint}: empty response"),
                Ok(Err(e)) => format!("{endpoint}: {e}"),
                Err(_) => format!(
                    "{endpoint}: timed out after {}ms",
                    self.attempt_timeout.as_millis()
                ),
            };
            tracing::warn!(endpoint, failure = %failure, "remote.endpoint.failed");
            failures.push(failure);
        }

        tracing::warn!(
            attempts = failures.len(),
            "remote.unavailable; scoring content locally"
        );
        RemoteOutcome::Fallback {
            result: self.scorer.score(prompt_content(prompt)),
            failures,
        }
    }
}
