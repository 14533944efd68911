//! Run configuration: global settings plus per-category definitions.
//!
//! Loaded from a YAML file; when none is given, a built-in configuration
//! covering the standard five categories (ads, ai, fake-ip, reject-drop,
//! cn) is used.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::fetch::FetchConfig;
use crate::finalize::OutputPolicy;
use crate::normalize::Syntax;
use crate::{Error, Result};

/// Shared allow-list feeds used by the built-in block categories.
const BUILTIN_ALLOW_URLS: &[&str] = &[
    "https://raw.githubusercontent.com/Cats-Team/AdRules/refs/heads/script/script/allowlist.txt",
    "https://raw.githubusercontent.com/zoonderkins/blahdns/refs/heads/master/hosts/whitelist.txt",
    "https://raw.githubusercontent.com/AdguardTeam/AdGuardSDNSFilter/master/Filters/exceptions.txt",
];

/// Top-level run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

/// Global settings shared by all categories.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory receiving the per-target output artifacts.
    pub output_dir: PathBuf,
    /// External rule-set compiler binary, invoked only if present.
    pub compiler_bin: String,
    /// Fetch pool settings.
    pub fetch: FetchConfig,
    /// Feed defining the known-defunct domain set.
    pub dead_domains_url: Option<String>,
    /// Local keyword-exclusion file.
    pub exclude_keywords_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            compiler_bin: "mihomo".to_string(),
            fetch: FetchConfig::default(),
            dead_domains_url: None,
            exclude_keywords_file: None,
        }
    }
}

/// Output target for a category's final rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Text artifact plus optional compiled binary rule set.
    Mihomo,
    /// AdGuard filter list (`||domain^`).
    Adguard,
    /// Plain domain list.
    Mosdns,
}

/// One rule category: a block pipeline with optional allow feeds.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    /// Feed syntax the category's sources are parsed as.
    #[serde(default)]
    pub syntax: Syntax,
    #[serde(default)]
    pub output_policy: OutputPolicy,
    #[serde(default = "default_targets")]
    pub targets: Vec<Target>,
    /// Block feeds, fetched in order.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Allow (whitelist) feeds.
    #[serde(default)]
    pub allowlists: Vec<String>,
    /// Local allow-list files joined to the fetched allow feeds.
    #[serde(default)]
    pub local_allowlists: Vec<PathBuf>,
}

fn default_targets() -> Vec<Target> {
    vec![Target::Mihomo]
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {:?}: {}", path, e)))?;
        let config: Config = serde_yaml::from_str(&text)?;
        if config.categories.is_empty() {
            return Err(Error::Config("no categories defined".to_string()));
        }
        Ok(config)
    }

    /// Load from an explicit path, from `config.yaml` in the working
    /// directory, or fall back to the built-in category definitions.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let default = Path::new("config.yaml");
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::builtin())
                }
            }
        }
    }

    /// Select categories by name; `all` selects every category.
    pub fn select(&self, selector: &str) -> Result<Vec<&CategoryConfig>> {
        if selector == "all" {
            return Ok(self.categories.iter().collect());
        }
        self.categories
            .iter()
            .find(|c| c.name == selector)
            .map(|c| vec![c])
            .ok_or_else(|| Error::UnknownCategory(selector.to_string()))
    }

    /// The built-in five-category configuration.
    pub fn builtin() -> Self {
        let allow: Vec<String> = BUILTIN_ALLOW_URLS.iter().map(|s| s.to_string()).collect();
        let urls = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };

        Self {
            settings: Settings::default(),
            categories: vec![
                CategoryConfig {
                    name: "ads".to_string(),
                    syntax: Syntax::Generic,
                    output_policy: OutputPolicy::ForceWildcard,
                    targets: vec![Target::Mihomo, Target::Adguard, Target::Mosdns],
                    sources: urls(&[
                        "https://raw.githubusercontent.com/pmkol/easymosdns/rules/ad_domain_list.txt",
                        "https://adguardteam.github.io/HostlistsRegistry/assets/filter_1.txt",
                        "https://adguardteam.github.io/HostlistsRegistry/assets/filter_3.txt",
                        "https://adguardteam.github.io/HostlistsRegistry/assets/filter_4.txt",
                        "https://a.dove.isdumb.one/pihole.txt",
                        "https://raw.githubusercontent.com/Cats-Team/AdRules/main/adrules_domainset.txt",
                        "https://raw.githubusercontent.com/Loyalsoldier/v2ray-rules-dat/refs/heads/release/reject-list.txt",
                    ]),
                    allowlists: allow.clone(),
                    local_allowlists: Vec::new(),
                },
                CategoryConfig {
                    name: "ai".to_string(),
                    syntax: Syntax::Generic,
                    output_policy: OutputPolicy::ForceWildcard,
                    targets: vec![Target::Mihomo],
                    sources: urls(&[
                        "https://github.com/MetaCubeX/meta-rules-dat/raw/meta/geo/geosite/category-ai-!cn.list",
                        "https://ruleset.skk.moe/List/non_ip/ai.conf",
                        "https://github.com/DustinWin/ruleset_geodata/raw/mihomo-ruleset/ai.list",
                    ]),
                    allowlists: Vec::new(),
                    local_allowlists: Vec::new(),
                },
                CategoryConfig {
                    name: "fake-ip".to_string(),
                    syntax: Syntax::FakeIp,
                    output_policy: OutputPolicy::RespectWildcard,
                    targets: vec![Target::Mihomo],
                    sources: urls(&[
                        "https://raw.githubusercontent.com/vernesong/OpenClash/refs/heads/master/luci-app-openclash/root/etc/openclash/custom/openclash_custom_fake_filter.list",
                        "https://raw.githubusercontent.com/juewuy/ShellCrash/dev/public/fake_ip_filter.list",
                        "https://raw.githubusercontent.com/DustinWin/ruleset_geodata/refs/heads/mihomo-ruleset/fakeip-filter.list",
                    ]),
                    allowlists: Vec::new(),
                    local_allowlists: Vec::new(),
                },
                CategoryConfig {
                    name: "reject-drop".to_string(),
                    syntax: Syntax::DomainList,
                    output_policy: OutputPolicy::RespectWildcard,
                    targets: vec![Target::Mihomo],
                    sources: urls(&[
                        "https://ruleset.skk.moe/Clash/non_ip/reject-drop.txt",
                    ]),
                    allowlists: allow,
                    local_allowlists: Vec::new(),
                },
                CategoryConfig {
                    name: "cn".to_string(),
                    syntax: Syntax::DomainList,
                    output_policy: OutputPolicy::RespectWildcard,
                    targets: vec![Target::Mihomo],
                    sources: urls(&[
                        "https://ruleset.skk.moe/Clash/non_ip/domestic.txt",
                    ]),
                    allowlists: Vec::new(),
                    local_allowlists: Vec::new(),
                },
            ],
        }
    }
}
