//! The credibility assessment produced for every analysis request.
//!
//! Field names serialize in camelCase so the same shape is used for the JSON
//! schema requested from the remote model and for the CLI's `--json` output.

use serde::{Deserialize, Serialize};

/// Four-way classification of analyzed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    True,
    False,
    Mixed,
    Unverified,
}

impl Verdict {
    pub const ALL: [Verdict; 4] = [
        Verdict::True,
        Verdict::False,
        Verdict::Mixed,
        Verdict::Unverified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "TRUE",
            Verdict::False => "FALSE",
            Verdict::Mixed => "MIXED",
            Verdict::Unverified => "UNVERIFIED",
        }
    }

    /// Parse the wire spelling; anything outside the enumeration is rejected.
    pub fn from_wire(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == raw)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an [`AnalysisResult`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMethod {
    /// Validated verdict returned by a remote model.
    Remote,
    /// Local heuristic scorer, used whenever the remote path fails.
    Heuristic,
}

/// Per-dimension sub-scores, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysis {
    pub factual_accuracy: u8,
    pub source_credibility: u8,
    pub emotional_manipulation: u8,
    pub logical_consistency: u8,
    pub bias_level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub is_credible: bool,
    /// Certainty of the verdict, in `[0, 100]`.
    pub confidence: u8,
    pub reasoning: String,
    /// Recommended fact-check sources.
    pub sources: Vec<String>,
    pub warnings: Vec<String>,
    pub verdict: Verdict,
    pub categories: Vec<String>,
    pub detailed_analysis: DetailedAnalysis,
    pub analysis_method: AnalysisMethod,
}

impl AnalysisResult {
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Lower confidence to at most `limit`. Never raises it.
    pub fn cap_confidence(&mut self, limit: u8) {
        self.confidence = self.confidence.min(limit);
    }

    pub fn is_heuristic(&self) -> bool {
        self.analysis_method == AnalysisMethod::Heuristic
    }
}

/// Clamp an arbitrary signed score into the `[0, 100]` range used by every
/// numeric field of [`AnalysisResult`].
pub fn clamp_score(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            is_credible: true,
            confidence: 85,
            reasoning: "Looks fine.".to_string(),
            sources: vec!["Snopes.com".to_string()],
            warnings: vec![],
            verdict: Verdict::True,
            categories: vec!["general".to_string()],
            detailed_analysis: DetailedAnalysis {
                factual_accuracy: 90,
                source_credibility: 80,
                emotional_manipulation: 10,
                logical_consistency: 90,
                bias_level: 5,
            },
            analysis_method: AnalysisMethod::Remote,
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let v = serde_json::to_value(sample()).unwrap();
        assert_eq!(v["isCredible"], json!(true));
        assert_eq!(v["verdict"], json!("TRUE"));
        assert_eq!(v["detailedAnalysis"]["factualAccuracy"], json!(90));
        assert_eq!(v["analysisMethod"], json!("remote"));
    }

    #[test]
    fn cap_confidence_never_raises() {
        let mut r = sample();
        r.cap_confidence(60);
        assert_eq!(r.confidence, 60);

        r.confidence = 40;
        r.cap_confidence(60);
        assert_eq!(r.confidence, 40);
    }

    #[test]
    fn verdict_wire_spelling_is_strict() {
        assert_eq!(Verdict::from_wire("MIXED"), Some(Verdict::Mixed));
        assert_eq!(Verdict::from_wire("mixed"), None);
        assert_eq!(Verdict::from_wire("PARTLY TRUE"), None);
    }

    #[test]
    fn clamp_score_bounds() {
        assert_eq!(clamp_score(-15), 0);
        assert_eq!(clamp_score(42), 42);
        assert_eq!(clamp_score(180), 100);
    }
}
