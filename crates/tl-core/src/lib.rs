//! Weighted popular-token aggregation.
//!
//! Merges many independently maintained token lists into one "popular" list
//! per chain. Each source votes with a weight proportional to its share of
//! all tokens; a token is popular on a chain once its accumulated score
//! reaches `weight_ratio * total_weight`. Curated overrides (per-chain extra
//! tokens and `-static` sources) force a token in, and every chain's native
//! coin is always present.
//!
//! Zero I/O. Loading and saving lists lives in `tl-store`.

pub mod accumulate;
pub mod address;
pub mod catalog;
pub mod chain;
pub mod constants;
pub mod error;
pub mod filter;
pub mod list;
pub mod popular;
pub mod score;
pub mod source;
pub mod weight;

pub use accumulate::{AccumulatedToken, Accumulator};
pub use address::{normalize_address, parse_address, same_address};
pub use catalog::{DedupCatalog, OverrideCatalog, TokenCatalog};
pub use chain::{ChainConfig, ChainRegistry};
pub use constants::{
    AGGREGATE_LIST_NAME, DEFAULT_DECIMALS, FORCED_INCLUDE_SENTINEL, POPULAR_LIST_NAME,
    STATIC_SUFFIX,
};
pub use error::{AggregateError, Result};
pub use filter::{reconcile_scores, select_popular, threshold_for};
pub use list::{ListVersion, TokenList, TokenListHeader, TokenRecord, split_by_chain};
pub use popular::{
    PopularList, PopularSettings, aggregate, build_popular_list, eligible_source_names,
};
pub use score::OccurrenceScore;
pub use source::{
    GeneratorEntry, GeneratorRegistry, GeneratorType, SourceList, eligible_sources,
    is_static_source, is_valid_source_name,
};
pub use weight::{SourceWeights, compute_weights};
