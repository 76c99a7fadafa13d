//! Public entry points: analyze a piece of text or a URL.
//!
//! Every call yields a well-formed [`AnalysisResult`]. Remote verdicts that
//! fail validation are replaced by the local heuristic verdict for the same
//! text, and the `analysis_method` field says which path produced the result.

use crate::prompt::{build_analysis_prompt, url_subject};
use crate::remote::{RemoteAnalysisClient, RemoteOutcome};
use newscheck_analysis::{decode_remote_verdict, host_of, DomainCredibility, DomainTable};
use newscheck_common::{AnalysisMethod, AnalysisResult};

/// Confidence ceiling applied to URLs on a questionable domain.
pub const QUESTIONABLE_CONFIDENCE_CAP: u8 = 60;

pub struct Analyzer {
    remote: RemoteAnalysisClient,
    domains: DomainTable,
}

impl Analyzer {
    pub fn new(remote: RemoteAnalysisClient, domains: DomainTable) -> Self {
        Self { remote, domains }
    }

    pub fn remote(&self) -> &RemoteAnalysisClient {
        &self.remote
    }

    pub fn domains(&self) -> &DomainTable {
        &self.domains
    }

    pub async fn analyze_content(&self, text: &str) -> AnalysisResult {
        let prompt = build_analysis_prompt(text);

        match self.remote.request(&prompt).await {
            RemoteOutcome::Remote { text: raw, endpoint } => match decode_remote_verdict(&raw) {
                Ok(mut result) => {
                    result.analysis_method = AnalysisMethod::Remote;
                    tracing::info!(
                        endpoint = %endpoint,
                        verdict = %result.verdict,
                        confidence = result.confidence,
                        "analysis.remote"
                    );
                    result
                }
                Err(e) => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        error = %e,
                        "remote verdict rejected; using heuristic"
                    );
                    self.remote.scorer().score(text)
                }
            },
            RemoteOutcome::Fallback { result, failures } => {
                tracing::info!(
                    failures = failures.len(),
                    verdict = %result.verdict,
                    confidence = result.confidence,
                    "analysis.heuristic"
                );
                result
            }
        }
    }

    /// Analyze the URL string itself, then adjust for the domain it points at.
    ///
    /// Questionable domains add a warning and cap confidence at
    /// [`QUESTIONABLE_CONFIDENCE_CAP`]. Trusted and neutral domains leave the
    /// result untouched. A URL without a parseable host skips the domain step.
    pub async fn analyze_url(&self, url: &str) -> AnalysisResult {
        let mut result = self.analyze_content(&url_subject(url)).await;

        let Some(host) = host_of(url) else {
            tracing::debug!(url, "no host in url; skipping domain check");
            return result;
        };

        let credibility = self.domains.classify(&host);
        tracing::debug!(host = %host, ?credibility, "domain.classified");

        if credibility == DomainCredibility::Questionable {
            result.push_warning(format!("Domain {host} has low credibility rating"));
            result.cap_confidence(QUESTIONABLE_CONFIDENCE_CAP);
        }
        result
    }
}
