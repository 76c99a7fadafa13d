//! Remote model integration and the analysis entry points for NewsCheck.
//!
//! This crate exposes a common [`traits::LlmClient`] interface with two
//! concrete endpoints (Gemini `generateContent` and an alternate bearer-token
//! endpoint), the [`remote::RemoteAnalysisClient`] that walks them in order,
//! and the [`analyzer::Analyzer`] that turns any outcome into a
//! well-formed [`newscheck_common::AnalysisResult`].
//!
//! # Examples
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use newscheck_analysis::{DomainTable, HeuristicScorer};
//! use newscheck_llm::{Analyzer, GeminiClient, RemoteAnalysisClient, GEMINI_BASE_URL};
//!
//! # #[tokio::main]
//! # async fn main() -> newscheck_common::Result<()> {
//! let gemini = GeminiClient::new(
//!     GEMINI_BASE_URL,
//!     std::env::var("GEMINI_API_KEY").unwrap_or_default(),
//!     newscheck_llm::DEFAULT_GEMINI_MODEL.to_string(),
//!     Duration::from_secs(8),
//! )?;
//! let remote = RemoteAnalysisClient::new(vec![Arc::new(gemini)], HeuristicScorer::default());
//! let analyzer = Analyzer::new(remote, DomainTable::default());
//!
//! let result = analyzer.analyze_content("The moon landing happened in 1969.").await;
//! println!("{} ({}%)", result.verdict, result.confidence);
//! # Ok(())
//! # }
//! ```
pub mod alternate;
pub mod analyzer;
pub mod gemini;
pub mod prompt;
pub mod remote;
pub mod traits;

pub use alternate::{AlternateClient, ALTERNATE_URL};
pub use analyzer::{Analyzer, QUESTIONABLE_CONFIDENCE_CAP};
pub use gemini::{GeminiClient, GEMINI_BASE_URL};
pub use remote::{prefers_alternate, RemoteAnalysisClient, RemoteOutcome};
pub use traits::{LlmClient, LlmResponse};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_ALTERNATE_MODEL: &str = "gemini-1.5-flash";
