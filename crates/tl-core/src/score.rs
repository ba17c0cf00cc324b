use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::FORCED_INCLUDE_SENTINEL;

/// Weighted vote count for one token across all sources.
///
/// `ForcedInclude` marks a token that a curated override (extra token or
/// `-static` source) pinned as popular. It passes every threshold and is
/// absorbing: once forced, no later sighting demotes it.
///
/// On the wire the score is a bare float; `ForcedInclude` is written as the
/// legacy `i32::MAX` sentinel and any value at or above it reads back as
/// `ForcedInclude`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub enum OccurrenceScore {
    Weighted(f64),
    ForcedInclude,
}

impl OccurrenceScore {
    /// Score of a first sighting.
    pub fn initial(weight: f64, forced: bool) -> Self {
        if forced {
            OccurrenceScore::ForcedInclude
        } else {
            OccurrenceScore::Weighted(weight)
        }
    }

    /// Fold one more sighting into the score.
    pub fn merge(self, weight: f64, forced: bool) -> Self {
        match self {
            OccurrenceScore::ForcedInclude => OccurrenceScore::ForcedInclude,
            OccurrenceScore::Weighted(_) if forced => OccurrenceScore::ForcedInclude,
            OccurrenceScore::Weighted(score) => OccurrenceScore::Weighted(score + weight),
        }
    }

    pub fn is_forced(&self) -> bool {
        matches!(self, OccurrenceScore::ForcedInclude)
    }

    /// `score >= threshold`; forced scores always pass.
    pub fn passes(&self, threshold: f64) -> bool {
        match self {
            OccurrenceScore::ForcedInclude => true,
            OccurrenceScore::Weighted(score) => *score >= threshold,
        }
    }

    pub fn to_wire(self) -> f64 {
        match self {
            OccurrenceScore::ForcedInclude => FORCED_INCLUDE_SENTINEL,
            OccurrenceScore::Weighted(score) => score,
        }
    }
}

impl From<f64> for OccurrenceScore {
    fn from(value: f64) -> Self {
        if value >= FORCED_INCLUDE_SENTINEL {
            OccurrenceScore::ForcedInclude
        } else {
            OccurrenceScore::Weighted(value)
        }
    }
}

impl From<OccurrenceScore> for f64 {
    fn from(score: OccurrenceScore) -> Self {
        score.to_wire()
    }
}

impl fmt::Display for OccurrenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OccurrenceScore::ForcedInclude => write!(f, "forced"),
            OccurrenceScore::Weighted(score) => write!(f, "{score:.4}"),
        }
    }
}
