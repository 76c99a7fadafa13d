//! Static credibility ratings for news domains.
//!
//! A hostname matches a listed domain when it is that domain or one of its
//! subdomains (`news.bbc.com` matches `bbc.com`, `notbbc.com` does not).

use url::Url;

pub const TRUSTED_DOMAINS: &[&str] = &[
    "reuters.com",
    "ap.org",
    "bbc.com",
    "npr.org",
    "pbs.org",
    "cnn.com",
    "nytimes.com",
    "washingtonpost.com",
    "wsj.com",
    "nature.com",
    "science.org",
    "who.int",
    "cdc.gov",
];

pub const QUESTIONABLE_DOMAINS: &[&str] = &[
    "infowars.com",
    "breitbart.com",
    "rt.com",
    "sputniknews.com",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainCredibility {
    Trusted,
    Questionable,
    /// Anything not in either list.
    Neutral,
}

impl DomainCredibility {
    pub fn rating(&self) -> u8 {
        match self {
            DomainCredibility::Trusted => 85,
            DomainCredibility::Questionable => 25,
            DomainCredibility::Neutral => 50,
        }
    }

    pub fn is_credible(&self) -> bool {
        !matches!(self, DomainCredibility::Questionable)
    }
}

#[derive(Debug, Clone)]
pub struct DomainTable {
    trusted: Vec<String>,
    questionable: Vec<String>,
}

impl Default for DomainTable {
    fn default() -> Self {
        Self {
            trusted: TRUSTED_DOMAINS.iter().map(|d| d.to_string()).collect(),
            questionable: QUESTIONABLE_DOMAINS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl DomainTable {
    /// Built-in lists plus extra entries from configuration.
    pub fn with_extra<T, Q>(trusted: T, questionable: Q) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        Q: IntoIterator,
        Q::Item: AsRef<str>,
    {
        let mut table = Self::default();
        table
            .trusted
            .extend(trusted.into_iter().filter_map(|d| normalize_host(d.as_ref())));
        table
            .questionable
            .extend(questionable.into_iter().filter_map(|d| normalize_host(d.as_ref())));
        table
    }

    /// Trusted entries win over questionable ones when a host matches both.
    pub fn classify(&self, host: &str) -> DomainCredibility {
        let Some(host) = normalize_host(host) else {
            return DomainCredibility::Neutral;
        };
        if self.trusted.iter().any(|d| host_matches(&host, d)) {
            DomainCredibility::Trusted
        } else if self.questionable.iter().any(|d| host_matches(&host, d)) {
            DomainCredibility::Questionable
        } else {
            DomainCredibility::Neutral
        }
    }
}

/// Extract the hostname from user input. Inputs without a scheme are read as `https://`.
pub fn host_of(input: &str) -> Option<String> {
    let input = input.trim();
    let parsed = Url::parse(input)
        .ok()
        .filter(|u| u.has_host())
        .or_else(|| Url::parse(&format!("https://{input}")).ok())?;
    parsed.host_str().and_then(normalize_host)
}

fn normalize_host(raw: &str) -> Option<String> {
    let host = raw.trim().trim_end_matches('.').to_ascii_lowercase();
    (!host.is_empty()).then_some(host)
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_subdomain_matches() {
        let table = DomainTable::default();
        assert_eq!(table.classify("bbc.com"), DomainCredibility::Trusted);
        assert_eq!(table.classify("www.bbc.com"), DomainCredibility::Trusted);
        assert_eq!(table.classify("News.BBC.com."), DomainCredibility::Trusted);
        assert_eq!(
            table.classify("www.infowars.com"),
            DomainCredibility::Questionable
        );
    }

    #[test]
    fn substrings_do_not_match() {
        let table = DomainTable::default();
        assert_eq!(table.classify("notbbc.com"), DomainCredibility::Neutral);
        assert_eq!(table.classify("bbc.com.evil.net"), DomainCredibility::Neutral);
        // "rt.com" would be a substring of all of these.
        assert_eq!(table.classify("art.com"), DomainCredibility::Neutral);
        assert_eq!(table.classify("sport.com"), DomainCredibility::Neutral);
    }

    #[test]
    fn ratings() {
        assert_eq!(DomainCredibility::Trusted.rating(), 85);
        assert_eq!(DomainCredibility::Questionable.rating(), 25);
        assert_eq!(DomainCredibility::Neutral.rating(), 50);
        assert!(!DomainCredibility::Questionable.is_credible());
        assert!(DomainCredibility::Neutral.is_credible());
    }

    #[test]
    fn extra_domains_extend_the_lists() {
        let table = DomainTable::with_extra(["Example.org"], vec!["fake-news.test".to_string()]);
        assert_eq!(table.classify("blog.example.org"), DomainCredibility::Trusted);
        assert_eq!(
            table.classify("fake-news.test"),
            DomainCredibility::Questionable
        );
        assert_eq!(table.classify("reuters.com"), DomainCredibility::Trusted);
    }

    #[test]
    fn host_extraction() {
        assert_eq!(
            host_of("https://www.Reuters.com/world/article?id=1").as_deref(),
            Some("www.reuters.com")
        );
        assert_eq!(
            host_of("infowars.com/some/story").as_deref(),
            Some("infowars.com")
        );
        assert_eq!(host_of("   ").as_deref(), None);
    }
}
