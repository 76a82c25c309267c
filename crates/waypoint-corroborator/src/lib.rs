//! Waypoint Corroborator
//!
//! Turns validated records into facts: groups of records from one or more
//! sources describing the same information.
//!
//! # Matching
//!
//! - [`ExactMatcher`]: equal normalized fact keys (default)
//! - [`FuzzyMatcher`]: same date and similar titles
//!
//! # Examples
//!
//! ```
//! use waypoint_corroborator::{CorroborationAggregator, MatchingConfig};
//!
//! let aggregator = CorroborationAggregator::new(MatchingConfig::default().matcher());
//! assert!(aggregator.aggregate(Vec::new()).is_empty());
//! ```

#![warn(missing_docs)]

mod aggregator;
mod matcher;

pub use aggregator::CorroborationAggregator;
pub use matcher::{
    title_similarity, ExactMatcher, FuzzyMatcher, MatchStrategy, MatchingConfig,
    StrategyMatcher, DEFAULT_SIMILARITY_THRESHOLD,
};
