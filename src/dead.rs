//! Known-defunct domain filtering.
//!
//! The dead-domain set is built once at process start from a single feed
//! and shared read-only (behind an `Arc`) by every category pipeline.
//! Filtering is exact-match only: a dead entry for `a.example.com` must
//! not drag down `example.com` or `b.example.com`.

use ahash::AHashSet;

use crate::record::DomainRule;

/// An immutable set of exact domains known to be defunct.
#[derive(Debug, Default)]
pub struct DeadDomainSet {
    domains: AHashSet<String>,
}

impl DeadDomainSet {
    /// An empty set; filtering with it is a pass-through.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a one-domain-per-line document. Blank lines and `#` comments
    /// are ignored; entries are lowercased and stripped of a wildcard
    /// marker so the set holds bare domains only.
    pub fn from_text(text: &str) -> Self {
        let domains = text
            .lines()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| {
                let bare = l.strip_prefix("+.").unwrap_or(&l);
                bare.strip_prefix('.').unwrap_or(bare).to_string()
            })
            .collect();
        Self { domains }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    /// Drop rules whose bare domain is an exact member of the set.
    pub fn filter(&self, rules: Vec<DomainRule>) -> Vec<DomainRule> {
        if self.is_empty() {
            return rules;
        }
        rules
            .into_iter()
            .filter(|r| !self.contains(&r.domain))
            .collect()
    }
}
