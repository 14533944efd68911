//! End-to-end pipeline tests over in-memory feeds.

use rulefold::config::{CategoryConfig, Settings, Target};
use rulefold::{
    consolidate, finalize, normalize, publish, reduce, suppress, DeadDomainSet, DomainRule,
    ExceptionPolicy, KeywordFilter, OutputFormat, OutputPolicy, Syntax,
};

#[test]
fn test_block_and_allow_feeds_end_to_end() {
    // Exact-match allow entries cover only their own domain, so the allow
    // for example.com must not suppress ads.example.com.
    let block = "||ads.example.com^\ndomain-suffix,tracker.example.com\ngood.example.org\n";
    let allow = "@@||example.com^\n";

    let rules = consolidate(
        block,
        allow,
        Syntax::Generic,
        &KeywordFilter::empty(),
        &DeadDomainSet::empty(),
    );
    let text = finalize(&rules, OutputPolicy::RespectWildcard, OutputFormat::Domain);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "# Count: 3");
    assert!(lines[1].starts_with("# Updated: "));
    assert_eq!(
        &lines[2..],
        &["ads.example.com", "good.example.org", "tracker.example.com"]
    );
}

#[test]
fn test_mixed_syntax_block_feed() {
    let block = "\
# hosts section
0.0.0.0 ads.example.com
127.0.0.1 beacon.example.net

! adblock section
||banner.example.com^$important
@@||whitelisted.example.com^
[Adblock Plus 2.0]

domain-suffix,metrics.example.org
+.wild.example.net
10.20.30.40
*.glob.example.com
";
    let rules = consolidate(
        block,
        "",
        Syntax::Generic,
        &KeywordFilter::empty(),
        &DeadDomainSet::empty(),
    );

    // The @@ line is dropped while building a block set, the IP literal
    // and glob pattern are rejected, and beacon.example.net survives as
    // exact while wild.example.net is a wildcard.
    assert!(rules.contains(&DomainRule::exact("ads.example.com")));
    assert!(rules.contains(&DomainRule::exact("banner.example.com")));
    assert!(rules.contains(&DomainRule::exact("beacon.example.net")));
    assert!(rules.contains(&DomainRule::exact("metrics.example.org")));
    assert!(rules.contains(&DomainRule::wildcard("wild.example.net")));
    assert_eq!(rules.len(), 5);
}

#[test]
fn test_reduction_and_suppression_compose() {
    let block = vec![
        DomainRule::wildcard("tracking.net"),
        DomainRule::exact("pixel.tracking.net"),
        DomainRule::exact("cdn.media.org"),
    ];
    let allow = vec![DomainRule::wildcard("tracking.net")];

    let out = suppress(reduce(block), reduce(allow));
    assert_eq!(out, vec![DomainRule::exact("cdn.media.org")]);
}

#[test]
fn test_dead_domains_filtered_exactly() {
    let dead = DeadDomainSet::from_text("dead.com\n");
    let rules = consolidate(
        "dead.com\n+.dead.com\nsub.dead.com\n",
        "",
        Syntax::Generic,
        &KeywordFilter::empty(),
        &dead,
    );
    assert_eq!(rules, vec![DomainRule::exact("sub.dead.com")]);
}

#[test]
fn test_finalized_output_renormalizes_to_itself() {
    let rules = vec![
        DomainRule::wildcard("example.com"),
        DomainRule::exact("other.org"),
    ];
    let text = finalize(&rules, OutputPolicy::RespectWildcard, OutputFormat::Domain);

    let reparsed: Vec<DomainRule> = text
        .lines()
        .filter_map(|l| normalize(l, Syntax::Generic, ExceptionPolicy::Drop))
        .collect();
    assert_eq!(
        reparsed,
        vec![DomainRule::wildcard("example.com"), DomainRule::exact("other.org")]
    );
}

#[test]
fn test_publish_writes_all_targets() {
    let out_dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        output_dir: out_dir.path().to_path_buf(),
        // Not installed anywhere; the compile step must skip silently.
        compiler_bin: "rulefold-no-such-compiler".to_string(),
        ..Settings::default()
    };
    let category = CategoryConfig {
        name: "ads".to_string(),
        syntax: Syntax::Generic,
        output_policy: OutputPolicy::ForceWildcard,
        targets: vec![Target::Mihomo, Target::Adguard, Target::Mosdns],
        sources: Vec::new(),
        allowlists: Vec::new(),
        local_allowlists: Vec::new(),
    };
    let rules = vec![
        DomainRule::exact("b.example.com"),
        DomainRule::wildcard("a.example.net"),
    ];

    publish(&category, &settings, &rules).unwrap();

    let mihomo = std::fs::read_to_string(out_dir.path().join("mihomo/ads.txt")).unwrap();
    assert!(mihomo.starts_with("# Count: 2\n"));
    assert!(mihomo.contains("\n+.a.example.net\n"));
    assert!(mihomo.contains("\n+.b.example.com\n"));
    // No compiler, so no binary artifact.
    assert!(!out_dir.path().join("mihomo/ads.mrs").exists());

    let adg = std::fs::read_to_string(out_dir.path().join("adg/ads_adg.txt")).unwrap();
    assert!(adg.contains("||a.example.net^"));
    assert!(adg.contains("||b.example.com^"));

    let mosdns = std::fs::read_to_string(out_dir.path().join("mosdns-x/ads.txt")).unwrap();
    assert!(mosdns.contains("\na.example.net\n"));
    assert!(mosdns.contains("\nb.example.com\n"));
}

#[test]
fn test_empty_feeds_produce_empty_artifact() {
    let rules = consolidate(
        "",
        "",
        Syntax::Generic,
        &KeywordFilter::empty(),
        &DeadDomainSet::empty(),
    );
    assert!(rules.is_empty());
    let text = finalize(&rules, OutputPolicy::Plain, OutputFormat::Domain);
    assert!(text.starts_with("# Count: 0\n"));
}
