use async_trait::async_trait;
use newscheck_common::{GenerationParams, NewscheckError, Result};
use newscheck_http::HttpError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

/// One generative-model endpoint.
///
/// Implementations return `Err` for every failure (transport, status,
/// undecodable body, missing text); choosing what to do next is left to
/// [`crate::remote::RemoteAnalysisClient`].
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<LlmResponse>;

    /// Get the model name being used
    fn model_name(&self) -> &str;

    /// Short label used in logs and provenance (e.g. `gemini`, `alternate`).
    fn endpoint_name(&self) -> &str;
}

pub(crate) fn http_to_newscheck(endpoint: &str, e: HttpError) -> NewscheckError {
    match e {
        HttpError::Timeout(_) => NewscheckError::Timeout,
        other => NewscheckError::Remote(format!("{endpoint}: {other}")),
    }
}
