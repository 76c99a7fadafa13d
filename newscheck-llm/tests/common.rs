#![allow(dead_code)]

use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use newscheck_common::observability::{LogConfig, LogFormat};
use newscheck_common::{GenerationParams, NewscheckError, Result};
use newscheck_llm::{LlmClient, LlmResponse};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let log_dir = std::env::temp_dir().join("newscheck-tests");
        let config = LogConfig {
            app_name: "newscheck-tests",
            log_dir: Some(log_dir),
            emit_stderr: true,
            format: if std::env::var("NEWSCHECK_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".to_string(),
        };

        newscheck_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// What a [`ScriptedClient`] does when asked to generate.
#[derive(Clone)]
pub enum Script {
    Reply(String),
    Fail(String),
    Stall(Duration),
}

/// In-process stand-in for a remote endpoint that records every prompt it sees.
pub struct ScriptedClient {
    name: &'static str,
    script: Script,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(name: &'static str, script: Script) -> Arc<Self> {
        Arc::new(Self {
            name,
            script,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn generate(&self, prompt: &str, _params: &GenerationParams) -> Result<LlmResponse> {
        if let Ok(mut seen) = self.prompts.lock() {
            seen.push(prompt.to_string());
        }
        match &self.script {
            Script::Reply(text) => Ok(LlmResponse {
                text: text.clone(),
                model: Some("scripted".to_string()),
                tokens_used: None,
            }),
            Script::Fail(msg) => Err(NewscheckError::Remote(msg.clone())),
            Script::Stall(d) => {
                tokio::time::sleep(*d).await;
                Ok(LlmResponse {
                    text: "too late".to_string(),
                    model: None,
                    tokens_used: None,
                })
            }
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    fn endpoint_name(&self) -> &str {
        self.name
    }
}

pub fn remote_verdict_json(confidence: u8, verdict: &str) -> String {
    serde_json::json!({
        "isCredible": verdict == "TRUE",
        "confidence": confidence,
        "reasoning": "Consistent with wire service reporting.",
        "sources": ["Reuters", "AP News"],
        "warnings": [],
        "verdict": verdict,
        "categories": ["politics"],
        "detailedAnalysis": {
            "factualAccuracy": 88,
            "sourceCredibility": 80,
            "emotionalManipulation": 10,
            "logicalConsistency": 90,
            "biasLevel": 15
        }
    })
    .to_string()
}
