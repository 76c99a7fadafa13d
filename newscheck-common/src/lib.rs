//! Common types and utilities shared across NewsCheck crates.
//!
//! This crate defines the analysis entity, the heuristic tuning knobs,
//! observability helpers, and the shared error type used throughout the
//! NewsCheck workspace. It is intentionally lightweight so that every crate
//! can depend on it without pulling in HTTP or model-client code.
//!
//! # Overview
//!
//! - [`AnalysisResult`]: the credibility assessment returned for every request
//! - [`HeuristicConfig`]: weights and thresholds for the local scorer
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`NewscheckError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use newscheck_common::HeuristicConfig;
//!
//! let cfg = HeuristicConfig::default();
//! assert_eq!(cfg.credibility_threshold, 30);
//! assert!(cfg.thresholds.is_strictly_ordered());
//! ```
use serde::{Deserialize, Serialize};

pub mod analysis;
pub mod observability;

pub use analysis::{AnalysisMethod, AnalysisResult, DetailedAnalysis, Verdict};

/// Suspicion-score cut points used to derive a [`Verdict`].
///
/// A score strictly above `false_above` is `FALSE`, strictly above
/// `mixed_above` is `MIXED`, strictly above `unverified_above` is
/// `UNVERIFIED`, anything else is `TRUE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdictThresholds {
    pub false_above: u32,
    pub mixed_above: u32,
    pub unverified_above: u32,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            false_above: 60,
            mixed_above: 40,
            unverified_above: 20,
        }
    }
}

impl VerdictThresholds {
    /// Cut points must be strictly decreasing so every score maps to exactly one verdict.
    pub fn is_strictly_ordered(&self) -> bool {
        self.false_above > self.mixed_above && self.mixed_above > self.unverified_above
    }

    pub fn verdict_for(&self, score: u32) -> Verdict {
        if score > self.false_above {
            Verdict::False
        } else if score > self.mixed_above {
            Verdict::Mixed
        } else if score > self.unverified_above {
            Verdict::Unverified
        } else {
            Verdict::True
        }
    }
}

/// Tuning for the local heuristic scorer.
///
/// All weights and thresholds that shape the fallback verdict live here so
/// that there is a single canonical set. The defaults are the values the
/// scorer ships with; the configuration layer may override any of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Phrases that signal emotional manipulation (matched case-insensitively on word boundaries).
    pub trigger_phrases: Vec<String>,
    /// Calls to action typical of clickbait (matched case-insensitively on word boundaries).
    pub clickbait_words: Vec<String>,
    pub trigger_weight: u32,
    pub caps_run_weight: u32,
    /// Minimum length of an upper-case run that counts as shouting.
    pub caps_run_min: usize,
    pub exclamation_weight: u32,
    /// More exclamation marks than this raises the signal.
    pub exclamation_limit: usize,
    pub clickbait_weight: u32,
    /// Content is credible when its suspicion score is below this value.
    pub credibility_threshold: u32,
    /// Lowest confidence the scorer will ever report.
    pub confidence_floor: u8,
    pub thresholds: VerdictThresholds,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            trigger_phrases: [
                "shocking",
                "amazing",
                "urgent",
                "breaking",
                "exclusive",
                "must read",
                "you won't believe",
                "doctors hate",
                "one weird trick",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            clickbait_words: ["click", "share", "subscribe", "like"]
                .into_iter()
                .map(String::from)
                .collect(),
            trigger_weight: 25,
            caps_run_weight: 20,
            caps_run_min: 5,
            exclamation_weight: 15,
            exclamation_limit: 3,
            clickbait_weight: 20,
            credibility_threshold: 30,
            confidence_floor: 30,
            thresholds: VerdictThresholds::default(),
        }
    }
}

/// Sampling parameters sent with every remote analysis request.
///
/// Near-zero temperature and `top_k = 1` keep fact-checking output as
/// repeatable as the providers allow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_k: 1,
            top_p: 1.0,
            max_output_tokens: 2048,
        }
    }
}

/// Error types used across the NewsCheck system.
#[derive(thiserror::Error, Debug)]
pub enum NewscheckError {
    /// A remote model endpoint failed to produce usable text.
    #[error("Remote error: {0}")]
    Remote(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation exceeded the configured timeout.
    #[error("Timeout occurred")]
    Timeout,
}

/// Convenient alias for results that use [`NewscheckError`].
pub type Result<T> = std::result::Result<T, NewscheckError>;
