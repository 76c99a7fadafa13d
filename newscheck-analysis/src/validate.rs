//! Decoding and shape-checking of remote model verdicts.
//!
//! The model is asked for a JSON object matching [`AnalysisResult`], but it
//! may wrap it in code fences, surround it with prose, or omit fields. The
//! shape check is deliberately shallow: it decides whether the reply is
//! trusted at all. Accepted replies are then normalized so the typed value
//! always satisfies the entity invariants (scores in `[0, 100]`, no absent
//! lists), which means an unvalidated value can never reach callers.

use newscheck_common::analysis::clamp_score;
use newscheck_common::{AnalysisMethod, AnalysisResult, DetailedAnalysis, Verdict};
use serde_json::{Map, Value};

/// Sub-score used when the model omits one or sends a non-number.
const NEUTRAL_SUB_SCORE: u8 = 50;
const EMPTY_REASONING: &str = "The model returned no explanation for this verdict.";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ShapeError {
    #[error("expected a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    Missing(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown verdict {0:?}")]
    UnknownVerdict(String),
}

#[derive(Debug, thiserror::Error)]
pub enum VerdictError {
    #[error("reply is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("reply has the wrong shape: {0}")]
    Shape(#[from] ShapeError),
}

/// Decode the raw text a model returned into a validated [`AnalysisResult`].
///
/// ```
/// use newscheck_analysis::decode_remote_verdict;
///
/// let raw = r#"Sure, here is the assessment:
/// {"isCredible": true, "confidence": 91, "reasoning": "Matches wire reports.",
///  "sources": ["Reuters"], "warnings": [], "verdict": "TRUE",
///  "categories": ["politics"], "detailedAnalysis": {"factualAccuracy": 95}}"#;
/// let result = decode_remote_verdict(raw).unwrap();
/// assert_eq!(result.confidence, 91);
/// assert_eq!(result.detailed_analysis.source_credibility, 50);
/// ```
pub fn decode_remote_verdict(raw: &str) -> Result<AnalysisResult, VerdictError> {
    let candidate = extract_json_object(raw);
    let value: Value = serde_json::from_str(candidate)?;
    Ok(validate_shape(&value)?)
}

/// Boolean view of [`validate_shape`].
pub fn is_valid_shape(value: &Value) -> bool {
    validate_shape(value).is_ok()
}

pub fn validate_shape(value: &Value) -> Result<AnalysisResult, ShapeError> {
    let obj = value.as_object().ok_or(ShapeError::NotAnObject)?;

    let is_credible = field(obj, "isCredible")?
        .as_bool()
        .ok_or(ShapeError::WrongType {
            field: "isCredible",
            expected: "a boolean",
        })?;
    let confidence = field(obj, "confidence")?
        .as_f64()
        .ok_or(ShapeError::WrongType {
            field: "confidence",
            expected: "a number",
        })?;
    let reasoning = field(obj, "reasoning")?
        .as_str()
        .ok_or(ShapeError::WrongType {
            field: "reasoning",
            expected: "a string",
        })?;
    let sources = string_list(obj, "sources")?;
    let warnings = string_list(obj, "warnings")?;
    let categories = string_list(obj, "categories")?;

    let verdict = match field(obj, "verdict")? {
        Value::String(raw) => {
            Verdict::from_wire(raw).ok_or_else(|| ShapeError::UnknownVerdict(raw.clone()))?
        }
        other => return Err(ShapeError::UnknownVerdict(other.to_string())),
    };

    let detailed = field(obj, "detailedAnalysis")?
        .as_object()
        .ok_or(ShapeError::WrongType {
            field: "detailedAnalysis",
            expected: "an object",
        })?;

    let reasoning = match reasoning.trim() {
        "" => EMPTY_REASONING.to_string(),
        text => text.to_string(),
    };

    Ok(AnalysisResult {
        is_credible,
        confidence: to_score(confidence),
        reasoning,
        sources,
        warnings,
        verdict,
        categories,
        detailed_analysis: DetailedAnalysis {
            factual_accuracy: sub_score(detailed, "factualAccuracy"),
            source_credibility: sub_score(detailed, "sourceCredibility"),
            emotional_manipulation: sub_score(detailed, "emotionalManipulation"),
            logical_consistency: sub_score(detailed, "logicalConsistency"),
            bias_level: sub_score(detailed, "biasLevel"),
        },
        analysis_method: AnalysisMethod::Remote,
    })
}

/// Strip code-fence markup and keep the span from the first `{` to the last `}`.
fn extract_json_object(raw: &str) -> &str {
    let text = raw.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text).trim();

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

fn field<'a>(obj: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, ShapeError> {
    obj.get(name).ok_or(ShapeError::Missing(name))
}

fn string_list(obj: &Map<String, Value>, name: &'static str) -> Result<Vec<String>, ShapeError> {
    let items = field(obj, name)?.as_array().ok_or(ShapeError::WrongType {
        field: name,
        expected: "an array",
    })?;
    Ok(items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect())
}

fn to_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    clamp_score(raw.round() as i64)
}

fn sub_score(obj: &Map<String, Value>, name: &str) -> u8 {
    obj.get(name)
        .and_then(Value::as_f64)
        .map_or(NEUTRAL_SUB_SCORE, to_score)
}
