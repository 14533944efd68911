//! Final rule-set rendering.
//!
//! Deduplicates, sorts by the literal domain string (plain lexicographic,
//! not the reversed key used internally), applies the category's output
//! policy and format, and prepends a count/timestamp header.

use std::collections::BTreeSet;

use chrono::Local;
use serde::Deserialize;

use crate::record::DomainRule;

/// How wildcard information is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPolicy {
    /// Every entry rewritten to `+.domain`.
    ForceWildcard,
    /// `+.domain` for wildcard rules, bare domain otherwise.
    #[default]
    RespectWildcard,
    /// Bare domains only.
    Plain,
}

/// Output line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One domain per line, wildcard marker per the policy.
    #[default]
    Domain,
    /// AdGuard filter lines: `||domain^`.
    AdGuard,
}

/// Render the final text artifact.
///
/// Empty input produces a count-0 header; that is a warning condition,
/// not an error.
pub fn finalize(rules: &[DomainRule], policy: OutputPolicy, format: OutputFormat) -> String {
    if rules.is_empty() {
        log::warn!("finalizing an empty rule set");
    }

    // Set semantics on (domain, effective wildcard): under ForceWildcard
    // an exact and a wildcard rule for the same domain collapse to one line.
    let entries: BTreeSet<(&str, bool)> = rules
        .iter()
        .map(|r| {
            let wildcard = match policy {
                OutputPolicy::ForceWildcard => true,
                OutputPolicy::RespectWildcard => r.is_wildcard(),
                OutputPolicy::Plain => false,
            };
            (r.domain.as_str(), wildcard)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format!("# Count: {}\n", entries.len()));
    out.push_str(&format!(
        "# Updated: {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    for (domain, wildcard) in &entries {
        match format {
            OutputFormat::Domain => {
                if *wildcard {
                    out.push_str("+.");
                }
                out.push_str(domain);
            }
            OutputFormat::AdGuard => {
                out.push_str("||");
                out.push_str(domain);
                out.push('^');
            }
        }
        out.push('\n');
    }

    out
}
