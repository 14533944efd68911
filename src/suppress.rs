//! Allow/block suppression merge.
//!
//! Given a reduced block set and a reduced allow set, emit the block rules
//! that survive the allow list. Priority is asymmetric: an allow entry can
//! remove block entries, a block entry never removes an allow entry, and
//! allow entries themselves are never emitted.
//!
//! Coverage follows each allow rule's own match kind: a wildcard allow
//! suppresses the equal block and everything strictly beneath it, an exact
//! allow suppresses only the equal block. Independently, an allow entry
//! appearing anywhere beneath a pending block discards that block, since a
//! broad block must not shadow an explicitly allowed descendant.
//!
//! Both inputs arrive sorted by reversed-label key (the reducer's output
//! order), so a linear two-stream merge suffices; no re-sort.

use crate::record::{DomainRule, Origin, RevKey};

/// Merge-scan state: the allow root currently suppressing a branch.
struct AllowRoot {
    key: RevKey,
    wildcard: bool,
}

impl AllowRoot {
    fn covers(&self, key: &RevKey) -> bool {
        if self.wildcard {
            key.descends_from(&self.key)
        } else {
            *key == self.key
        }
    }
}

/// Emit the block rules not covered by any allow rule.
///
/// Both inputs must be pre-reduced (ascending reversed-key order, minimal
/// antichains). Output preserves ascending reversed-key order, not the
/// caller's original order; the finalizer re-sorts anyway.
pub fn suppress(block: Vec<DomainRule>, allow: Vec<DomainRule>) -> Vec<DomainRule> {
    let mut blocks = block.into_iter().map(|r| (r.rev_key(), r)).peekable();
    let mut allows = allow.into_iter().map(|r| (r.rev_key(), r)).peekable();

    let mut out = Vec::new();
    let mut active_allow: Option<AllowRoot> = None;
    // One pending block candidate: emitted only once its branch is known
    // to contain no allow entry.
    let mut buffered: Option<(RevKey, DomainRule)> = None;

    loop {
        // Two-pointer merge; allow wins ties so an equal-key allow is
        // active before the block it suppresses is examined.
        let origin = match (blocks.peek(), allows.peek()) {
            (Some((bk, _)), Some((ak, _))) => {
                if ak <= bk {
                    Origin::Allow
                } else {
                    Origin::Block
                }
            }
            (Some(_), None) => Origin::Block,
            (None, Some(_)) => Origin::Allow,
            (None, None) => break,
        };
        let next = match origin {
            Origin::Block => blocks.next(),
            Origin::Allow => allows.next(),
        };
        let Some((key, rule)) = next else { break };

        // Whole branch already suppressed by an allow root.
        if let Some(ref root) = active_allow {
            if root.covers(&key) {
                continue;
            }
        }

        if let Some((ref bkey, _)) = buffered {
            if key.descends_from(bkey) {
                match origin {
                    // An allowed descendant kills the pending block and
                    // starts suppressing the rest of the branch.
                    Origin::Allow => {
                        buffered = None;
                        active_allow = Some(AllowRoot {
                            key,
                            wildcard: rule.is_wildcard(),
                        });
                    }
                    // Already represented by the pending candidate, which
                    // is the branch's minimal rule in a reduced input.
                    Origin::Block => {}
                }
                continue;
            }
        }

        // New, incomparable branch.
        if let Some((_, pending)) = buffered.take() {
            out.push(pending);
        }
        match origin {
            Origin::Allow => {
                active_allow = Some(AllowRoot {
                    key,
                    wildcard: rule.is_wildcard(),
                });
            }
            Origin::Block => {
                active_allow = None;
                buffered = Some((key, rule));
            }
        }
    }

    if let Some((_, pending)) = buffered {
        out.push(pending);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_allow_suppresses_subdomain_block() {
        let out = suppress(
            vec![DomainRule::exact("ads.example.com")],
            vec![DomainRule::wildcard("example.com")],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_unrelated_allow_keeps_block() {
        let out = suppress(
            vec![DomainRule::exact("example.com")],
            vec![DomainRule::wildcard("other.com")],
        );
        assert_eq!(out, vec![DomainRule::exact("example.com")]);
    }

    #[test]
    fn test_exact_allow_suppresses_only_equal() {
        let out = suppress(
            vec![
                DomainRule::exact("example.com"),
                DomainRule::exact("ads.example.com"),
            ],
            vec![DomainRule::exact("example.com")],
        );
        assert_eq!(out, vec![DomainRule::exact("ads.example.com")]);
    }

    #[test]
    fn test_exact_allow_leaves_subdomains_alone() {
        let out = suppress(
            vec![
                DomainRule::exact("ads.example.com"),
                DomainRule::exact("tracker.example.com"),
            ],
            vec![DomainRule::exact("example.com")],
        );
        assert_eq!(
            out,
            vec![
                DomainRule::exact("ads.example.com"),
                DomainRule::exact("tracker.example.com"),
            ]
        );
    }

    #[test]
    fn test_allowed_descendant_discards_broad_block() {
        // A wildcard block over example.com would also block the allowed
        // login subdomain, so the broad block must go.
        let out = suppress(
            vec![DomainRule::wildcard("example.com")],
            vec![DomainRule::exact("login.example.com")],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_allow_entries_never_emitted() {
        let out = suppress(
            vec![DomainRule::exact("blocked.org")],
            vec![
                DomainRule::wildcard("allowed.com"),
                DomainRule::exact("other.net"),
            ],
        );
        assert_eq!(out, vec![DomainRule::exact("blocked.org")]);
    }

    #[test]
    fn test_wildcard_allow_suppresses_whole_branch() {
        let out = suppress(
            vec![
                DomainRule::exact("a.example.com"),
                DomainRule::exact("b.example.com"),
                DomainRule::exact("keep.org"),
            ],
            vec![DomainRule::wildcard("example.com")],
        );
        assert_eq!(out, vec![DomainRule::exact("keep.org")]);
    }

    #[test]
    fn test_label_boundary_not_string_prefix() {
        // `notexample.com` shares a string prefix with nothing relevant
        // once keys are label sequences; it must survive.
        let out = suppress(
            vec![DomainRule::exact("notexample.com")],
            vec![DomainRule::wildcard("example.com")],
        );
        assert_eq!(out, vec![DomainRule::exact("notexample.com")]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(suppress(vec![], vec![DomainRule::exact("a.com")]).is_empty());
        let out = suppress(vec![DomainRule::exact("a.com")], vec![]);
        assert_eq!(out, vec![DomainRule::exact("a.com")]);
    }
}
