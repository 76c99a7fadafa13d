//! Fact-checking prompt sent to the remote model.

const CONTENT_OPEN: &str = "CONTENT: \"";
const CONTENT_CLOSE: &str = "\"\n\nProvide your analysis";

pub const ANALYSIS_PREAMBLE: &str = r#"You are an expert fact-checker and misinformation analyst with expertise in:
- Media literacy and journalism ethics
- Information verification techniques
- Bias detection and analysis
- Scientific method and evidence evaluation
- Social psychology and persuasion tactics

Analyze the following content for credibility, accuracy, and potential misinformation:"#;

pub const ANALYSIS_INSTRUCTIONS: &str = r#"Provide your analysis as a valid JSON object with the following structure:
{
  "isCredible": boolean,
  "confidence": number (0-100),
  "reasoning": "detailed explanation of your analysis in 2-3 sentences",
  "sources": ["list of 3-4 recommended fact-checking sources"],
  "warnings": ["specific concerns or red flags found"],
  "verdict": "TRUE" | "FALSE" | "MIXED" | "UNVERIFIED",
  "categories": ["relevant categories like 'political', 'health', 'science', etc."],
  "detailedAnalysis": {
    "factualAccuracy": number (0-100),
    "sourceCredibility": number (0-100),
    "emotionalManipulation": number (0-100),
    "logicalConsistency": number (0-100),
    "biasLevel": number (0-100)
  }
}

Analysis criteria:
1. Factual accuracy: Check claims against established facts
2. Source credibility: Evaluate reliability of sources mentioned or implied
3. Emotional manipulation: Detect inflammatory language, fear-mongering
4. Logical consistency: Check for logical fallacies or contradictions
5. Bias detection: Identify political, commercial, or ideological bias
6. Evidence quality: Assess supporting evidence and citations
7. Context analysis: Consider timing, framing, and selective reporting

Verdict guidelines:
- TRUE: Content is factually accurate with reliable sources
- FALSE: Content contains significant misinformation or false claims
- MIXED: Content has both accurate and inaccurate elements
- UNVERIFIED: Cannot be definitively verified with available information

Respond ONLY with valid JSON, no additional text or formatting."#;

/// The content is embedded verbatim between `CONTENT: "` and the closing
/// quote that precedes the JSON schema.
pub fn build_analysis_prompt(content: &str) -> String {
    format!("{ANALYSIS_PREAMBLE}\n\n{CONTENT_OPEN}{content}\"\n\n{ANALYSIS_INSTRUCTIONS}\n")
}

/// Subject line analyzed for a URL request.
pub fn url_subject(url: &str) -> String {
    format!("URL to analyze: {url}")
}

/// Recover the content embedded by [`build_analysis_prompt`].
///
/// Prompts that were not built by it are returned whole.
pub fn prompt_content(prompt: &str) -> &str {
    let Some(start) = prompt.find(CONTENT_OPEN).map(|i| i + CONTENT_OPEN.len()) else {
        return prompt;
    };
    match prompt.rfind(CONTENT_CLOSE) {
        Some(end) if end >= start => &prompt[start..end],
        _ => prompt,
    }
}
