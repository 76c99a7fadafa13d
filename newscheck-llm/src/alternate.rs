use crate::traits::{http_to_newscheck, LlmClient, LlmResponse};
use async_trait::async_trait;
use newscheck_common::{GenerationParams, NewscheckError, Result};
use newscheck_http::{Auth, HttpClient, RequestOpts};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const ALTERNATE_URL: &str = "https://ai.google.dev/api/generate";

const ENDPOINT: &str = "alternate";

#[derive(Debug, Serialize)]
struct AlternateRequest<'a> {
    prompt: &'a str,
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
}

/// The generated text may arrive under any of these keys.
#[derive(Debug, Deserialize)]
struct AlternateResponse {
    response: Option<Value>,
    text: Option<Value>,
    output: Option<Value>,
}

impl AlternateResponse {
    fn into_text(self) -> Option<String> {
        [self.response, self.text, self.output]
            .into_iter()
            .flatten()
            .find_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
    }
}

/// Secondary generation endpoint authenticated with a bearer token.
pub struct AlternateClient {
    http: HttpClient,
    api_key: String,
    model: String,
}

impl AlternateClient {
    pub fn new(url: &str, api_key: String, model: String, timeout: Duration) -> Result<Self> {
        let http = HttpClient::new(url)
            .map_err(|e| NewscheckError::Config(format!("HttpClient init failed: {e}")))?
            .with_timeout(timeout);

        Ok(Self {
            http,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl LlmClient for AlternateClient {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<LlmResponse> {
        let request = AlternateRequest {
            prompt,
            model: &self.model,
            max_tokens: params.max_output_tokens,
            temperature: params.temperature,
        };

        tracing::debug!(model = %self.model, url = %self.http.base(), "Sending alternate request");

        let opts = RequestOpts {
            auth: Some(Auth::Bearer(&self.api_key)),
            ..Default::default()
        };
        let resp: AlternateResponse = self
            .http
            .post_json_opts("", &request, opts)
            .await
            .map_err(|e| http_to_newscheck(ENDPOINT, e))?;

        let text = resp.into_text().ok_or_else(|| {
            NewscheckError::Remote(
                "alternate response has no `response`, `text` or `output` field".to_string(),
            )
        })?;

        Ok(LlmResponse {
            text,
            model: Some(self.model.clone()),
            tokens_used: None,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn endpoint_name(&self) -> &str {
        ENDPOINT
    }
}
