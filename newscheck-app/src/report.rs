use anyhow::Result;
use newscheck_common::AnalysisResult;
use std::fmt;

/// Human-readable rendering of an [`AnalysisResult`].
pub struct Report<'a>(pub &'a AnalysisResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        writeln!(f, "Verdict:     {} ({}% confidence)", r.verdict, r.confidence)?;
        writeln!(f, "Credible:    {}", if r.is_credible { "yes" } else { "no" })?;
        writeln!(f, "Reasoning:   {}", r.reasoning)?;

        if r.warnings.is_empty() {
            writeln!(f, "Warnings:    none")?;
        } else {
            writeln!(f, "Warnings:")?;
            for w in &r.warnings {
                writeln!(f, "  - {w}")?;
            }
        }

        let d = &r.detailed_analysis;
        writeln!(f, "Detailed analysis:")?;
        for (label, value) in [
            ("Factual accuracy", d.factual_accuracy),
            ("Source credibility", d.source_credibility),
            ("Emotional manipulation", d.emotional_manipulation),
            ("Logical consistency", d.logical_consistency),
            ("Bias level", d.bias_level),
        ] {
            writeln!(f, "  {label:<24}{value:>3}%")?;
        }

        writeln!(f, "Sources:     {}", r.sources.join(", "))?;
        writeln!(f, "Categories:  {}", r.categories.join(", "))?;
        if r.is_heuristic() {
            write!(
                f,
                "Method:      heuristic (remote analysis unavailable; based on content signals only)"
            )
        } else {
            write!(f, "Method:      remote model")
        }
    }
}

pub fn print(result: &AnalysisResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", Report(result));
    }
    Ok(())
}
