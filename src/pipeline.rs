//! Per-category pipeline orchestration.
//!
//! Each category runs the five consolidation stages in order (normalize,
//! reduce, suppress, dead-domain filter, finalize) over feeds fetched up
//! front. Categories are independent: they share only read-only inputs
//! (the dead-domain set and keyword filter) and run as isolated threads,
//! so one category's failure never touches its siblings.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use crate::compile::compile_ruleset;
use crate::config::{CategoryConfig, Config, Settings, Target};
use crate::dead::DeadDomainSet;
use crate::fetch;
use crate::finalize::{finalize, OutputFormat, OutputPolicy};
use crate::keyword::KeywordFilter;
use crate::normalize::{normalize, ExceptionPolicy, Syntax};
use crate::record::DomainRule;
use crate::reduce::reduce;
use crate::suppress::suppress;
use crate::Result;

/// Run the selected categories concurrently.
///
/// `selector` is a category name or `all`. The only error surfaced to the
/// caller is an unrecognized selector; per-category failures are logged
/// and do not cancel sibling categories.
pub fn run(config: &Config, selector: &str) -> Result<()> {
    let categories = config.select(selector)?;
    let settings = &config.settings;

    // Read-only inputs shared by every category.
    let dead = Arc::new(load_dead_set(settings));
    let keywords = Arc::new(match &settings.exclude_keywords_file {
        Some(path) => KeywordFilter::load(path),
        None => KeywordFilter::empty(),
    });

    // Per-run scratch area; removed on drop no matter how the run ends.
    let work = tempfile::tempdir()?;

    thread::scope(|s| {
        for category in categories {
            let dead = Arc::clone(&dead);
            let keywords = Arc::clone(&keywords);
            let work_dir = work.path().join(&category.name);
            s.spawn(move || {
                if let Err(e) = run_category(category, settings, &dead, &keywords, &work_dir) {
                    log::error!("category {} failed: {}", category.name, e);
                }
            });
        }
    });

    Ok(())
}

/// Build the process-wide dead-domain set. A missing or failing feed
/// degrades to an empty set, which makes the filter a pass-through.
fn load_dead_set(settings: &Settings) -> DeadDomainSet {
    let Some(url) = &settings.dead_domains_url else {
        return DeadDomainSet::empty();
    };
    match fetch::fetch_one(url, &settings.fetch) {
        Ok(text) => {
            let set = DeadDomainSet::from_text(&text);
            log::info!("dead-domain set loaded: {} entries", set.len());
            set
        }
        Err(e) => {
            log::warn!("dead-domain feed unavailable, not filtering: {}", e);
            DeadDomainSet::empty()
        }
    }
}

/// Run one category end to end: fetch, consolidate, publish.
fn run_category(
    category: &CategoryConfig,
    settings: &Settings,
    dead: &DeadDomainSet,
    keywords: &KeywordFilter,
    work_dir: &Path,
) -> Result<()> {
    log::info!("[{}] starting", category.name);
    fs::create_dir_all(work_dir)?;

    let block_text = join_blobs(fetch::fetch_set(&category.sources, &settings.fetch));
    log::info!(
        "[{}] fetched {} block feeds, {} raw lines",
        category.name,
        category.sources.len(),
        block_text.lines().count()
    );

    let mut allow_text = join_blobs(fetch::fetch_set(&category.allowlists, &settings.fetch));
    for path in &category.local_allowlists {
        match fs::read_to_string(path) {
            Ok(text) => {
                allow_text.push_str(&text);
                if !allow_text.ends_with('\n') {
                    allow_text.push('\n');
                }
            }
            Err(e) => log::warn!("[{}] local allowlist {:?} unavailable: {}", category.name, path, e),
        }
    }

    // Raw snapshots for debugging live only inside the scratch area.
    fs::write(work_dir.join("raw_block.txt"), &block_text)?;
    fs::write(work_dir.join("raw_allow.txt"), &allow_text)?;

    let rules = consolidate(&block_text, &allow_text, category.syntax, keywords, dead);
    log::info!("[{}] consolidated to {} rules", category.name, rules.len());

    publish(category, settings, &rules)
}

/// The pure consolidation core, network-free and shared with tests.
///
/// Block lines are parsed with the category's syntax and `@@` exceptions
/// dropped; allow lines always parse as Generic with exceptions kept. The
/// keyword filter applies to block rules only, before reduction.
pub fn consolidate(
    block_text: &str,
    allow_text: &str,
    syntax: Syntax,
    keywords: &KeywordFilter,
    dead: &DeadDomainSet,
) -> Vec<DomainRule> {
    let block: Vec<DomainRule> = block_text
        .lines()
        .filter_map(|l| normalize(l, syntax, ExceptionPolicy::Drop))
        .collect();
    let block = keywords.apply(block);
    let block = reduce(block);

    let allow: Vec<DomainRule> = allow_text
        .lines()
        .filter_map(|l| normalize(l, Syntax::Generic, ExceptionPolicy::Keep))
        .collect();
    let allow = reduce(allow);

    dead.filter(suppress(block, allow))
}

/// Write the final artifacts for every configured target.
pub fn publish(category: &CategoryConfig, settings: &Settings, rules: &[DomainRule]) -> Result<()> {
    for target in &category.targets {
        match target {
            Target::Mihomo => {
                let dir = settings.output_dir.join("mihomo");
                fs::create_dir_all(&dir)?;
                let text_path = dir.join(format!("{}.txt", category.name));
                fs::write(
                    &text_path,
                    finalize(rules, category.output_policy, OutputFormat::Domain),
                )?;
                log::info!("[{}] wrote {:?}", category.name, text_path);

                let mrs_path = dir.join(format!("{}.mrs", category.name));
                compile_ruleset(&settings.compiler_bin, &text_path, &mrs_path);
            }
            Target::Adguard => {
                let dir = settings.output_dir.join("adg");
                fs::create_dir_all(&dir)?;
                let path = dir.join(format!("{}_adg.txt", category.name));
                fs::write(
                    &path,
                    finalize(rules, OutputPolicy::Plain, OutputFormat::AdGuard),
                )?;
                log::info!("[{}] wrote {:?}", category.name, path);
            }
            Target::Mosdns => {
                let dir = settings.output_dir.join("mosdns-x");
                fs::create_dir_all(&dir)?;
                let path = dir.join(format!("{}.txt", category.name));
                fs::write(&path, finalize(rules, OutputPolicy::Plain, OutputFormat::Domain))?;
                log::info!("[{}] wrote {:?}", category.name, path);
            }
        }
    }
    Ok(())
}

/// Concatenate fetched blobs in feed order, newline-separated.
fn join_blobs(blobs: Vec<String>) -> String {
    let mut out = String::new();
    for blob in blobs {
        if blob.is_empty() {
            continue;
        }
        out.push_str(&blob);
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consolidate_exact_allow_does_not_cover_subdomains() {
        // An exact-match allow entry covers only that exact domain, so all
        // three block domains survive.
        let block = "||ads.example.com^\ndomain-suffix,tracker.example.com\ngood.example.org\n";
        let allow = "@@||example.com^\n";
        let out = consolidate(
            block,
            allow,
            Syntax::Generic,
            &KeywordFilter::empty(),
            &DeadDomainSet::empty(),
        );
        assert_eq!(
            out,
            vec![
                DomainRule::exact("ads.example.com"),
                DomainRule::exact("tracker.example.com"),
                DomainRule::exact("good.example.org"),
            ]
        );
    }

    #[test]
    fn test_consolidate_wildcard_allow_suppresses_branch() {
        let block = "0.0.0.0 ads.example.com\n+.cdn.example.com\nkeep.org\n";
        let allow = "+.example.com\n";
        let out = consolidate(
            block,
            allow,
            Syntax::Generic,
            &KeywordFilter::empty(),
            &DeadDomainSet::empty(),
        );
        assert_eq!(out, vec![DomainRule::exact("keep.org")]);
    }

    #[test]
    fn test_consolidate_applies_keyword_and_dead_filters() {
        let block = "ads.a.com\ntracker.b.com\ndead.c.com\nfine.d.com\n";
        let keywords = KeywordFilter::from_text("tracker\n");
        let dead = DeadDomainSet::from_text("dead.c.com\n");
        let out = consolidate(block, "", Syntax::Generic, &keywords, &dead);
        assert_eq!(
            out,
            vec![DomainRule::exact("ads.a.com"), DomainRule::exact("fine.d.com")]
        );
    }

    #[test]
    fn test_join_blobs_preserves_order_and_newlines() {
        let joined = join_blobs(vec![
            "a.com".to_string(),
            String::new(),
            "b.com\n".to_string(),
        ]);
        assert_eq!(joined, "a.com\nb.com\n");
    }
}
