use anyhow::{Context, Result};
use newscheck_analysis::{DomainTable, HeuristicScorer};
use newscheck_config::{NewscheckConfig, RemoteConfig};
use newscheck_llm::{
    AlternateClient, Analyzer, GeminiClient, LlmClient, RemoteAnalysisClient, prefers_alternate,
};
use std::sync::Arc;
use std::time::Duration;

const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Build the analyzer described by `cfg`, taking the API key from the
/// configuration or, failing that, from `GEMINI_API_KEY`.
pub fn build_analyzer(cfg: &NewscheckConfig) -> Result<Analyzer> {
    let api_key = cfg.api_key().map(str::to_string).or_else(|| {
        std::env::var(API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    });
    build_analyzer_with_key(cfg, api_key.as_deref())
}

/// Without a key no endpoint is configured and every analysis is heuristic.
pub fn build_analyzer_with_key(cfg: &NewscheckConfig, api_key: Option<&str>) -> Result<Analyzer> {
    let timeout = Duration::from_secs(cfg.remote.timeout_secs);

    let endpoints = match api_key {
        Some(key) => build_endpoints(&cfg.remote, key, timeout)?,
        None => {
            tracing::warn!(
                "no API key configured (set api_key or {API_KEY_ENV}); using local heuristics only"
            );
            Vec::new()
        }
    };

    let scorer = HeuristicScorer::new(cfg.heuristics.clone())
        .context("invalid heuristics configuration")?;
    let remote = RemoteAnalysisClient::new(endpoints, scorer)
        .with_params(cfg.remote.generation)
        .with_attempt_timeout(timeout);
    let domains = DomainTable::with_extra(&cfg.domains.trusted, &cfg.domains.questionable);

    tracing::debug!(endpoints = ?remote.endpoint_names(), "analyzer.ready");
    Ok(Analyzer::new(remote, domains))
}

fn build_endpoints(
    remote: &RemoteConfig,
    api_key: &str,
    timeout: Duration,
) -> Result<Vec<Arc<dyn LlmClient>>> {
    let primary = GeminiClient::new(
        &remote.primary.base_url,
        api_key.to_string(),
        remote.primary.model.clone(),
        timeout,
    )
    .context("primary endpoint")?;
    let mut endpoints: Vec<Arc<dyn LlmClient>> = vec![Arc::new(primary)];

    if remote.alternate.enabled {
        let alternate = AlternateClient::new(
            &remote.alternate.url,
            api_key.to_string(),
            remote.alternate.model.clone(),
            timeout,
        )
        .context("alternate endpoint")?;

        if prefers_alternate(api_key) {
            endpoints.insert(0, Arc::new(alternate));
        } else {
            endpoints.push(Arc::new(alternate));
        }
    }
    Ok(endpoints)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(analyzer: &Analyzer) -> Vec<String> {
        analyzer
            .remote()
            .endpoint_names()
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn primary_first_for_regular_keys() {
        let analyzer = build_analyzer_with_key(&NewscheckConfig::default(), Some("AIza-test")).unwrap();
        assert_eq!(names(&analyzer), vec!["gemini", "alternate"]);
    }

    #[test]
    fn alternate_first_for_aq_keys() {
        let analyzer = build_analyzer_with_key(&NewscheckConfig::default(), Some("AQ.test")).unwrap();
        assert_eq!(names(&analyzer), vec!["alternate", "gemini"]);
    }

    #[test]
    fn disabled_alternate_is_left_out() {
        let mut cfg = NewscheckConfig::default();
        cfg.remote.alternate.enabled = false;
        let analyzer = build_analyzer_with_key(&cfg, Some("AQ.test")).unwrap();
        assert_eq!(names(&analyzer), vec!["gemini"]);
    }

    #[test]
    fn missing_key_means_no_endpoints() {
        let analyzer = build_analyzer_with_key(&NewscheckConfig::default(), None).unwrap();
        assert!(names(&analyzer).is_empty());
    }

    #[test]
    fn configured_domains_extend_the_table() {
        let mut cfg = NewscheckConfig::default();
        cfg.domains.questionable = vec!["example-rumors.net".into()];
        let analyzer = build_analyzer_with_key(&cfg, None).unwrap();
        assert_eq!(
            analyzer.domains().classify("www.example-rumors.net"),
            newscheck_analysis::DomainCredibility::Questionable
        );
    }

    #[test]
    fn bad_heuristics_are_reported() {
        let mut cfg = NewscheckConfig::default();
        cfg.heuristics.trigger_phrases = vec!["(".into()];
        // Phrases are escaped, so only structural problems fail.
        assert!(build_analyzer_with_key(&cfg, None).is_ok());
        cfg.heuristics.caps_run_min = 0;
        assert!(build_analyzer_with_key(&cfg, None).is_err());
    }
}
