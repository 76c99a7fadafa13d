//! Heuristic content scorer.
//!
//! Four surface signals (emotional trigger phrases, a run of upper-case
//! letters, a pile of exclamation marks, clickbait calls to action) add up to
//! a suspicion score. Everything else in the result is derived from that
//! score and the [`HeuristicConfig`] it was built with, so scoring the same
//! text twice always yields the same [`AnalysisResult`].

use newscheck_common::analysis::clamp_score;
use newscheck_common::{AnalysisMethod, AnalysisResult, DetailedAnalysis, HeuristicConfig};
use regex::{Regex, RegexBuilder};

/// Fact-check outlets recommended with every heuristic verdict.
pub const DEFAULT_SOURCES: [&str; 4] = [
    "Snopes.com",
    "FactCheck.org",
    "PolitiFact.com",
    "Reuters Fact Check",
];

pub const DEFAULT_CATEGORIES: [&str; 2] = ["general", "fact-check"];

const CLOSING_WARNING: &str = "Verify claims with multiple reliable sources";

// Sub-score shapes: (offset, bound). Decreasing fields are max(bound, offset - s),
// increasing fields are min(bound, s + offset).
const FACTUAL_ACCURACY: (i64, i64) = (100, 20);
const SOURCE_CREDIBILITY: (i64, i64) = (80, 30);
const EMOTIONAL_MANIPULATION: (i64, i64) = (30, 100);
const LOGICAL_CONSISTENCY: (i64, i64) = (90, 40);
const BIAS_LEVEL: (i64, i64) = (20, 90);

#[derive(Debug, thiserror::Error)]
pub enum ScorerError {
    #[error("invalid pattern list: {0}")]
    Pattern(#[from] regex::Error),

    #[error("verdict thresholds must be strictly decreasing (false > mixed > unverified)")]
    Thresholds,

    #[error("caps_run_min must be at least 1")]
    CapsRun,
}

/// Which surface signals fired for a piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub emotional: bool,
    pub shouting: bool,
    pub exclamations: bool,
    pub clickbait: bool,
}

impl Signals {
    pub fn any(&self) -> bool {
        self.emotional || self.shouting || self.exclamations || self.clickbait
    }
}

#[derive(Debug, Clone)]
pub struct HeuristicScorer {
    config: HeuristicConfig,
    triggers: Option<Regex>,
    clickbait: Option<Regex>,
    caps_run: Regex,
}

impl HeuristicScorer {
    pub fn new(config: HeuristicConfig) -> Result<Self, ScorerError> {
        if !config.thresholds.is_strictly_ordered() {
            return Err(ScorerError::Thresholds);
        }
        if config.caps_run_min == 0 {
            return Err(ScorerError::CapsRun);
        }

        let triggers = word_list_pattern(&config.trigger_phrases)?;
        let clickbait = word_list_pattern(&config.clickbait_words)?;
        let caps_run = Regex::new(&format!("[A-Z]{{{},}}", config.caps_run_min))?;

        Ok(Self {
            config,
            triggers,
            clickbait,
            caps_run,
        })
    }

    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    pub fn detect(&self, text: &str) -> Signals {
        Signals {
            emotional: self.triggers.as_ref().is_some_and(|re| re.is_match(text)),
            shouting: self.caps_run.is_match(text),
            exclamations: text.matches('!').count() > self.config.exclamation_limit,
            clickbait: self.clickbait.as_ref().is_some_and(|re| re.is_match(text)),
        }
    }

    /// Weighted sum of the signals that fired.
    pub fn suspicion(&self, signals: &Signals) -> u32 {
        let c = &self.config;
        [
            (signals.emotional, c.trigger_weight),
            (signals.shouting, c.caps_run_weight),
            (signals.exclamations, c.exclamation_weight),
            (signals.clickbait, c.clickbait_weight),
        ]
        .into_iter()
        .filter(|(fired, _)| *fired)
        .fold(0u32, |acc, (_, weight)| acc.saturating_add(weight))
    }

    pub fn score(&self, text: &str) -> AnalysisResult {
        let signals = self.detect(text);
        let suspicion = self.suspicion(&signals);
        let s = i64::from(suspicion);
        let c = &self.config;

        let is_credible = suspicion < c.credibility_threshold;
        let confidence = clamp_score(100 - s).max(c.confidence_floor.min(100));
        let verdict = c.thresholds.verdict_for(suspicion);

        tracing::debug!(
            suspicion,
            ?signals,
            %verdict,
            is_credible,
            "heuristic.score"
        );

        AnalysisResult {
            is_credible,
            confidence,
            reasoning: reasoning(&signals, is_credible),
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            warnings: if suspicion > c.credibility_threshold {
                warnings(&signals)
            } else {
                Vec::new()
            },
            verdict,
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            detailed_analysis: DetailedAnalysis {
                factual_accuracy: decreasing(FACTUAL_ACCURACY, s),
                source_credibility: decreasing(SOURCE_CREDIBILITY, s),
                emotional_manipulation: increasing(EMOTIONAL_MANIPULATION, s),
                logical_consistency: decreasing(LOGICAL_CONSISTENCY, s),
                bias_level: increasing(BIAS_LEVEL, s),
            },
            analysis_method: AnalysisMethod::Heuristic,
        }
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::new(HeuristicConfig::default()).expect("built-in heuristic config is valid")
    }
}

fn decreasing((offset, floor): (i64, i64), s: i64) -> u8 {
    clamp_score((offset - s).max(floor))
}

fn increasing((offset, ceiling): (i64, i64), s: i64) -> u8 {
    clamp_score((s + offset).min(ceiling))
}

/// Case-insensitive, word-bounded alternation over a list of literal phrases.
fn word_list_pattern(words: &[String]) -> Result<Option<Regex>, regex::Error> {
    let alternatives: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return Ok(None);
    }
    RegexBuilder::new(&format!(r"\b(?:{})\b", alternatives.join("|")))
        .case_insensitive(true)
        .build()
        .map(Some)
}

fn reasoning(signals: &Signals, is_credible: bool) -> String {
    let mut out = String::from("Analysis based on content characteristics. ");
    if signals.emotional {
        out.push_str("Contains emotional manipulation language. ");
    }
    if signals.shouting {
        out.push_str("Uses excessive capitalization. ");
    }
    if signals.exclamations {
        out.push_str("Uses excessive exclamation marks. ");
    }
    if signals.clickbait {
        out.push_str("Shows clickbait patterns. ");
    }
    out.push_str(if is_credible {
        "Content appears relatively neutral."
    } else {
        "Content shows multiple warning signs of potential misinformation."
    });
    out
}

fn warnings(signals: &Signals) -> Vec<String> {
    [
        (signals.emotional, "Emotional manipulation detected"),
        (signals.shouting, "Excessive capitalization used"),
        (signals.exclamations, "Excessive exclamation marks used"),
        (signals.clickbait, "Clickbait patterns identified"),
        (true, CLOSING_WARNING),
    ]
    .into_iter()
    .filter(|(fired, _)| *fired)
    .map(|(_, w)| w.to_string())
    .collect()
}
