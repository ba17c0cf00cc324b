/// Decimals assumed when a source omits them.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Source-name suffix marking a curated list whose entries are always popular.
pub const STATIC_SUFFIX: &str = "-static";

/// The all-lists aggregate. Never feeds into its own computation.
pub const AGGREGATE_LIST_NAME: &str = "tokenlistooor";

/// The list this crate produces.
pub const POPULAR_LIST_NAME: &str = "popular";

/// Legacy wire encoding of a forced inclusion: `i32::MAX` as a float.
pub const FORCED_INCLUDE_SENTINEL: f64 = i32::MAX as f64;
