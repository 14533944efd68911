//! Hierarchical self-reduction: collapse a rule set to a minimal antichain.
//!
//! A wildcard rule for `example.com` already covers `ads.example.com`, so
//! narrower rules beneath it are redundant. Instead of a trie, the set is
//! sorted by reversed-label key, which makes every covered rule appear in a
//! contiguous run immediately after the wildcard that covers it; one
//! running "active root" then suffices for a single linear scan.

use ahash::AHashSet;

use crate::record::{DomainRule, RevKey};

/// Remove every rule covered by a broader wildcard rule in the same set.
///
/// Output is ordered by ascending reversed-label key and is a minimal
/// antichain under domain containment. At equal keys the wildcard form
/// sorts first and therefore wins over an exact duplicate of the same
/// domain. Reduction is idempotent; empty input yields empty output.
pub fn reduce(rules: impl IntoIterator<Item = DomainRule>) -> Vec<DomainRule> {
    // Set semantics: exact duplicates must be gone before the scan.
    let unique: AHashSet<DomainRule> = rules.into_iter().collect();

    let mut keyed: Vec<(RevKey, DomainRule)> =
        unique.into_iter().map(|r| (r.rev_key(), r)).collect();
    keyed.sort_by(|(ka, ra), (kb, rb)| {
        ka.cmp(kb)
            // Wildcard before exact at equal keys.
            .then_with(|| rb.is_wildcard().cmp(&ra.is_wildcard()))
    });

    let mut out = Vec::with_capacity(keyed.len());
    let mut active_root: Option<RevKey> = None;

    for (key, rule) in keyed {
        if let Some(ref root) = active_root {
            if key.descends_from(root) {
                continue;
            }
        }
        // An exact rule covers nothing beyond itself, so it clears the root.
        active_root = rule.is_wildcard().then_some(key);
        out.push(rule);
    }

    out
}
