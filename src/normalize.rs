//! Line normalization: raw feed lines into canonical [`DomainRule`]s.
//!
//! Feeds arrive in several near-duplicate syntaxes (hosts files, AdBlock
//! filters, routing-config tuples, fake-ip YAML fragments, bare domain
//! lists). Each supported syntax is a tagged [`Syntax`] variant with its
//! own cleanup pass; all variants share the same final validation.
//!
//! Normalization is a pure function: an unparseable line yields `None` and
//! is silently discarded by the caller. Rejects are never logged per line.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::record::{DomainRule, MatchKind};

/// Which feed syntax a line is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Syntax {
    /// Hosts-file, AdBlock and routing-config lines.
    #[default]
    Generic,
    /// Fake-ip filter lists (YAML-ish `- +.lan` fragments).
    FakeIp,
    /// Bare domain lists and Clash `domain`/`domain-suffix` tuples.
    DomainList,
}

/// What to do with AdBlock `@@` exception lines.
///
/// A block set drops them outright (exceptions belong to the allow set);
/// the allow set strips the marker and processes the rest of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionPolicy {
    Drop,
    Keep,
}

static IPV4_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+$").expect("ipv4 regex"));

/// Maximum hostname length accepted (RFC 1035).
const MAX_DOMAIN_LEN: usize = 253;

/// Parse one raw feed line into a canonical rule, or reject it.
pub fn normalize(raw: &str, syntax: Syntax, exceptions: ExceptionPolicy) -> Option<DomainRule> {
    let line = raw.trim().to_lowercase();
    if line.is_empty() {
        return None;
    }

    match syntax {
        Syntax::Generic => normalize_generic(&line, exceptions),
        Syntax::FakeIp => normalize_fake_ip(&line),
        Syntax::DomainList => normalize_domain_list(&line),
    }
}

fn normalize_generic(line: &str, exceptions: ExceptionPolicy) -> Option<DomainRule> {
    // Trailing inline comments and AdBlock option suffixes.
    let mut line = match line.find(['#', '$']) {
        Some(idx) => &line[..idx],
        None => line,
    }
    .trim();

    // Hosts-file IP prefix.
    for ip in ["0.0.0.0", "127.0.0.1"] {
        if let Some(rest) = line.strip_prefix(ip) {
            if rest.starts_with(char::is_whitespace) {
                line = rest.trim_start();
                break;
            }
        }
    }

    if line.starts_with('!') || line.starts_with('[') {
        return None;
    }

    // AdBlock exception marker.
    if let Some(rest) = line.strip_prefix("@@") {
        match exceptions {
            ExceptionPolicy::Drop => return None,
            ExceptionPolicy::Keep => line = rest,
        }
    }

    // AdBlock anchors carry no wildcard meaning here; the only wildcard
    // markers are `+.` and a leading dot, handled below.
    let line = line.replace(['|', '^'], "");
    let mut line = line.as_str();

    // Routing-config tuple prefixes, then anything past the first comma.
    for prefix in ["domain-keyword,", "domain-suffix,", "domain,"] {
        if let Some(rest) = line.strip_prefix(prefix) {
            line = rest;
            break;
        }
    }
    if let Some(idx) = line.find(',') {
        line = &line[..idx];
    }

    let (domain, kind) = strip_wildcard_marker(line.trim());
    validate(domain).then(|| DomainRule {
        domain: domain.to_string(),
        kind,
    })
}

fn normalize_fake_ip(line: &str) -> Option<DomainRule> {
    if line.starts_with('#') || line.starts_with("dns:") || line.starts_with("fake-ip-filter:") {
        return None;
    }

    // YAML list marker and quoting.
    let line = line.strip_prefix('-').unwrap_or(line).trim_start();
    let line = line.replace(['\'', '"', '\\'], "");
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (domain, kind) = strip_wildcard_marker(line);
    validate(domain).then(|| DomainRule {
        domain: domain.to_string(),
        kind,
    })
}

fn normalize_domain_list(line: &str) -> Option<DomainRule> {
    if line.starts_with('#') {
        return None;
    }

    let (rest, kind) = if line.contains(',') {
        if let Some(rest) = line.strip_prefix("domain-suffix,") {
            (rest, MatchKind::SubdomainWildcard)
        } else if let Some(rest) = line.strip_prefix("domain,") {
            (rest, MatchKind::Exact)
        } else {
            // Some other tuple kind (ip-cidr, process-name, ...).
            return None;
        }
    } else {
        // Bare domain lists are suffix lists by convention.
        let rest = line.strip_prefix("+.").unwrap_or(line);
        let rest = rest.strip_prefix('.').unwrap_or(rest);
        (rest, MatchKind::SubdomainWildcard)
    };

    // Clash tuples may carry a trailing `,POLICY`.
    let rest = match rest.find(',') {
        Some(idx) => &rest[..idx],
        None => rest,
    };

    let domain = rest.trim().trim_end_matches('.');
    validate(domain).then(|| DomainRule {
        domain: domain.to_string(),
        kind,
    })
}

/// Strip a leading `+.`/`.` wildcard marker and a trailing dot.
fn strip_wildcard_marker(line: &str) -> (&str, MatchKind) {
    let (rest, kind) = if let Some(rest) = line.strip_prefix("+.") {
        (rest, MatchKind::SubdomainWildcard)
    } else if let Some(rest) = line.strip_prefix('.') {
        (rest, MatchKind::SubdomainWildcard)
    } else {
        (line, MatchKind::Exact)
    };
    (rest.trim_end_matches('.'), kind)
}

/// Final validation, shared by every syntax variant.
fn validate(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return false;
    }
    if !domain.contains('.') {
        return false;
    }
    // First char must be alphanumeric or underscore (numbers are fine:
    // 163.com), and the charset excludes globs, paths and IPv6 literals.
    let first = domain.as_bytes()[0];
    if !(first.is_ascii_lowercase() || first.is_ascii_digit() || first == b'_') {
        return false;
    }
    if !domain
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'_'))
    {
        return false;
    }
    // Dotted-quad IPv4 literals are hosts-file noise, not domains.
    !IPV4_LITERAL.is_match(domain)
}
