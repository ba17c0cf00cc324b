use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AggregateError {
    /// Every declared source was excluded, pooled, or self-referential.
    NoEligibleSources,
    /// Eligible sources exist but hold zero tokens between them.
    NoTokens { sources: usize },
    /// A source name that cannot double as a file stem.
    InvalidSourceName(String),
    /// A chain's weight ratio is negative or not a finite number.
    InvalidWeightRatio { chain_id: u64, ratio: f64 },
    /// The same chain id was registered twice.
    DuplicateChain(u64),
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateError::NoEligibleSources => {
                write!(f, "no eligible source lists (all excluded or pooled)")
            }
            AggregateError::NoTokens { sources } => {
                write!(f, "{sources} eligible source lists hold zero tokens")
            }
            AggregateError::InvalidSourceName(name) => {
                write!(f, "invalid source list name: {name:?}")
            }
            AggregateError::InvalidWeightRatio { chain_id, ratio } => {
                write!(f, "chain {chain_id}: invalid weight ratio {ratio}")
            }
            AggregateError::DuplicateChain(id) => write!(f, "chain {id} registered twice"),
        }
    }
}

impl std::error::Error for AggregateError {}

pub type Result<T> = std::result::Result<T, AggregateError>;
