//! Local keyword-exclusion filtering.
//!
//! A plain-text, one-keyword-per-line file; any normalized block domain
//! containing a listed keyword as a substring is dropped before wildcard
//! reduction.

use std::fs;
use std::path::Path;

use crate::record::DomainRule;

/// Substring keywords loaded from a local exclusion file.
#[derive(Debug, Default)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    /// A filter with no keywords; applying it is a pass-through.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse keyword lines; blank lines and `#` comments are ignored.
    pub fn from_text(text: &str) -> Self {
        let keywords = text
            .lines()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();
        Self { keywords }
    }

    /// Load from a file. A missing or unreadable file is an empty filter,
    /// logged as a warning, never an error.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_text(&text),
            Err(e) => {
                log::warn!("keyword exclusion file {:?} unavailable: {}", path, e);
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn matches(&self, domain: &str) -> bool {
        self.keywords.iter().any(|k| domain.contains(k.as_str()))
    }

    /// Drop rules whose domain contains any keyword.
    pub fn apply(&self, rules: Vec<DomainRule>) -> Vec<DomainRule> {
        if self.is_empty() {
            return rules;
        }
        rules.into_iter().filter(|r| !self.matches(&r.domain)).collect()
    }
}
