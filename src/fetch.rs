//! Parallel rule feed fetching.
//!
//! Feeds download through a bounded worker pool: workers claim URL indices
//! from a shared counter and write each body into an index-addressed slot,
//! so results always come back in caller URL order no matter which fetch
//! finishes first. A feed that still fails after its retry budget degrades
//! to an empty contribution and never aborts the pipeline.

use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use flate2::read::GzDecoder;
use parking_lot::Mutex;
use serde::Deserialize;

use crate::{Error, Result};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; rulefold/0.1)";

/// Fetch pool settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum concurrent downloads.
    pub concurrency: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Attempts per feed before degrading to an empty contribution.
    pub retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            timeout_secs: 20,
            retries: 3,
        }
    }
}

impl FetchConfig {
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Download every URL, returning one text blob per URL in input order.
///
/// A failed feed yields an empty string in its slot, logged as a warning.
pub fn fetch_set(urls: &[String], config: &FetchConfig) -> Vec<String> {
    if urls.is_empty() {
        return Vec::new();
    }

    let agent = ureq::AgentBuilder::new()
        .timeout(config.timeout())
        .build();

    let slots: Mutex<Vec<String>> = Mutex::new(vec![String::new(); urls.len()]);
    let next = AtomicUsize::new(0);
    let workers = config.concurrency.clamp(1, urls.len());

    thread::scope(|s| {
        for _ in 0..workers {
            let agent = agent.clone();
            let slots = &slots;
            let next = &next;
            s.spawn(move || loop {
                let idx = next.fetch_add(1, Ordering::Relaxed);
                if idx >= urls.len() {
                    break;
                }
                match fetch_with_retries(&agent, &urls[idx], config.retries) {
                    Ok(body) => slots.lock()[idx] = body,
                    Err(e) => {
                        log::warn!(
                            "feed {} failed after {} attempts, using empty contribution: {}",
                            urls[idx],
                            config.retries,
                            e
                        );
                    }
                }
            });
        }
    });

    slots.into_inner()
}

/// Download a single document with the configured retry budget.
pub fn fetch_one(url: &str, config: &FetchConfig) -> Result<String> {
    let agent = ureq::AgentBuilder::new()
        .timeout(config.timeout())
        .build();
    fetch_with_retries(&agent, url, config.retries)
}

fn fetch_with_retries(agent: &ureq::Agent, url: &str, retries: u32) -> Result<String> {
    let mut last_err = Error::Download(format!("no attempts made for {}", url));
    for attempt in 0..retries.max(1) {
        if attempt > 0 {
            thread::sleep(Duration::from_secs(1));
        }
        match fetch_once(agent, url) {
            Ok(body) => return Ok(body),
            Err(e) => last_err = e,
        }
    }
    Err(last_err)
}

fn fetch_once(agent: &ureq::Agent, url: &str) -> Result<String> {
    let response = agent
        .get(url)
        .set("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| Error::Download(format!("{}: {}", url, e)))?;

    let mut raw = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut raw)
        .map_err(|e| Error::Download(format!("{}: {}", url, e)))?;

    // Some feeds publish gzip files (.txt.gz); transfer-level gzip is
    // already handled by the agent.
    if is_gzip(&raw) {
        let mut decoder = GzDecoder::new(&raw[..]);
        let mut text = String::new();
        decoder
            .read_to_string(&mut text)
            .map_err(|e| Error::Download(format!("{}: gzip: {}", url, e)))?;
        Ok(text)
    } else {
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }
}

fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_gzip() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"example.com\n").unwrap();
        let gz = encoder.finish().unwrap();
        assert!(is_gzip(&gz));
        assert!(!is_gzip(b"example.com\n"));
        assert!(!is_gzip(b""));
    }

    #[test]
    fn test_fetch_set_empty_urls() {
        assert!(fetch_set(&[], &FetchConfig::default()).is_empty());
    }

    #[test]
    fn test_fetch_config_defaults() {
        let cfg = FetchConfig::default();
        assert_eq!(cfg.concurrency, 8);
        assert_eq!(cfg.timeout_secs, 20);
        assert_eq!(cfg.retries, 3);
    }
}
