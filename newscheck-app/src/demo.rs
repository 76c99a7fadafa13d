use crate::report::Report;
use anyhow::Result;
use newscheck_llm::Analyzer;
use serde_json::json;

pub struct DemoCase {
    pub title: &'static str,
    pub content: &'static str,
}

pub const DEMO_CASES: [DemoCase; 3] = [
    DemoCase {
        title: "Reliable News",
        content: "The World Health Organization announced today that vaccination rates have \
                  increased by 15% globally compared to last year, according to their annual \
                  health report.",
    },
    DemoCase {
        title: "Suspicious Content",
        content: "SHOCKING! Scientists don't want you to know this ONE WEIRD TRICK that will \
                  change everything! Doctors HATE this! Click now before it's banned forever!",
    },
    DemoCase {
        title: "Mixed Content",
        content: "Local weather reports indicate a chance of rain tomorrow. However, some \
                  conspiracy theorists claim this is part of a government weather control \
                  program.",
    },
];

pub async fn run(analyzer: &Analyzer, as_json: bool) -> Result<()> {
    let mut collected = Vec::with_capacity(DEMO_CASES.len());

    for case in &DEMO_CASES {
        tracing::info!(title = case.title, "demo.case");
        let result = analyzer.analyze_content(case.content).await;

        if as_json {
            collected.push(json!({
                "title": case.title,
                "content": case.content,
                "result": result,
            }));
        } else {
            println!("== {} ==", case.title);
            println!("Content:     \"{}\"\n", case.content);
            println!("{}", Report(&result));
            println!("{}", "-".repeat(80));
        }
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&collected)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use newscheck_analysis::HeuristicScorer;
    use newscheck_common::Verdict;

    #[test]
    fn demo_cases_span_the_heuristic_range() {
        let scorer = HeuristicScorer::default();
        let reliable = scorer.score(DEMO_CASES[0].content);
        let suspicious = scorer.score(DEMO_CASES[1].content);

        assert!(reliable.is_credible);
        assert_eq!(reliable.verdict, Verdict::True);
        assert!(!suspicious.is_credible);
        assert_eq!(suspicious.verdict, Verdict::False);
    }
}
