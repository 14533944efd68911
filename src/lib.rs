//! Rulefold - domain rule-feed consolidation.
//!
//! This crate collapses many independently-maintained domain-matching rule
//! feeds (hosts files, AdBlock filters, routing-config domain tuples) into
//! a small number of canonical, non-redundant rule sets for a
//! traffic-routing engine.
//!
//! # Pipeline
//!
//! Each rule category runs five stages in order:
//!
//! 1. **Normalize** - parse raw feed lines into canonical domain rules
//! 2. **Reduce** - drop rules already covered by a broader wildcard rule
//! 3. **Suppress** - remove block rules covered by the allow list
//! 4. **Dead filter** - drop rules for known-defunct domains (exact match)
//! 5. **Finalize** - dedupe, sort and render with a count/timestamp header
//!
//! Containment ("is `ads.example.com` covered by `+.example.com`?") is
//! computed without a tree: sorting by reversed-label key makes every
//! domain adjacent to its ancestors, so a single linear scan suffices.
//!
//! # Quick Start
//!
//! ```ignore
//! use rulefold::{consolidate, DeadDomainSet, KeywordFilter, Syntax};
//!
//! let rules = consolidate(
//!     "||ads.example.com^\n0.0.0.0 tracker.net\n",
//!     "@@||example.com^\n",
//!     Syntax::Generic,
//!     &KeywordFilter::empty(),
//!     &DeadDomainSet::empty(),
//! );
//! ```
//!
//! The `rulefold-gen` binary drives whole categories from a YAML config:
//! fetching feeds concurrently, consolidating, writing per-target text
//! artifacts and optionally invoking an external rule-set compiler.

mod error;

pub mod compile;
pub mod config;
pub mod dead;
pub mod fetch;
pub mod finalize;
pub mod keyword;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod reduce;
pub mod suppress;

// Re-export core types
pub use error::{Error, Result};
pub use record::{DomainRule, MatchKind, Origin, RevKey};

// Re-export the pipeline stages
pub use dead::DeadDomainSet;
pub use finalize::{finalize, OutputFormat, OutputPolicy};
pub use keyword::KeywordFilter;
pub use normalize::{normalize, ExceptionPolicy, Syntax};
pub use reduce::reduce;
pub use suppress::suppress;

// Re-export orchestration
pub use config::{CategoryConfig, Config, Settings, Target};
pub use pipeline::{consolidate, publish, run};
