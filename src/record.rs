//! Core rule record types and the reversed-label sort key.

/// How a rule matches against a hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Matches only the rule's own domain.
    Exact,
    /// Matches the rule's domain and every strict subdomain of it.
    SubdomainWildcard,
}

/// Which logical set a rule came from.
///
/// Provenance only matters while block and allow streams are merged; it is
/// never persisted past the suppression stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Block,
    Allow,
}

/// A canonical domain rule.
///
/// `domain` is lowercase, dot-separated labels with no leading or trailing
/// dot and no wildcard glyphs. The wildcard marker lives in `kind`, not in
/// the string, so the same domain can exist in both forms before reduction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainRule {
    pub domain: String,
    pub kind: MatchKind,
}

impl DomainRule {
    /// Create an exact-match rule.
    pub fn exact(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            kind: MatchKind::Exact,
        }
    }

    /// Create a subdomain-wildcard rule.
    pub fn wildcard(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            kind: MatchKind::SubdomainWildcard,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.kind == MatchKind::SubdomainWildcard
    }

    /// The rule's reversed-label sort key.
    pub fn rev_key(&self) -> RevKey {
        RevKey::of(&self.domain)
    }

    /// Render in rule-set text form: `+.domain` for wildcard rules.
    pub fn text(&self) -> String {
        match self.kind {
            MatchKind::Exact => self.domain.clone(),
            MatchKind::SubdomainWildcard => format!("+.{}", self.domain),
        }
    }
}

/// A domain's labels in reversed order (top-level domain first).
///
/// Lexicographic order on this key places every domain immediately after
/// its nearest ancestor, which turns suffix containment into a
/// sequence-prefix check during a single linear scan. Comparing whole
/// labels (rather than reversed strings) keeps the check on label
/// boundaries: `example.com` is never treated as a child of `ample.com`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RevKey(Vec<String>);

impl RevKey {
    pub fn of(domain: &str) -> Self {
        Self(domain.split('.').rev().map(str::to_string).collect())
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// True when `self` is `root` itself or a strict subdomain of it.
    pub fn descends_from(&self, root: &RevKey) -> bool {
        self.0.len() >= root.0.len() && self.0[..root.0.len()] == root.0[..]
    }
}
