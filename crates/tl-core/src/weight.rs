//! Per-source voting weights.
//!
//! Absolute counts would let one huge list drown the rest, and a fixed
//! per-list vote would let tiny lists break the ratio rule. Each source
//! instead weighs `count / total_tokens`.

use std::collections::BTreeMap;

use crate::error::{AggregateError, Result};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceWeights {
    weights: BTreeMap<String, f64>,
    counts: BTreeMap<String, usize>,
    total_tokens: usize,
    total_weight: f64,
}

impl SourceWeights {
    /// Weight of a source; 0.0 for sources that were not weighed.
    pub fn weight(&self, name: &str) -> f64 {
        self.weights.get(name).copied().unwrap_or(0.0)
    }

    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Σ count over all weighed sources.
    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }

    /// Σ weight over all weighed sources. Scales every chain's threshold.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// `(name, count, weight)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize, f64)> {
        self.weights
            .iter()
            .map(|(name, w)| (name.as_str(), self.count(name), *w))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Compute weights from `(source name, token count)` pairs.
///
/// Fails when there are no sources or they hold zero tokens between them.
pub fn compute_weights<'a>(
    counts: impl IntoIterator<Item = (&'a str, usize)>,
) -> Result<SourceWeights> {
    let counts: BTreeMap<String, usize> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();

    if counts.is_empty() {
        return Err(AggregateError::NoEligibleSources);
    }

    let total_tokens: usize = counts.values().sum();
    if total_tokens == 0 {
        return Err(AggregateError::NoTokens {
            sources: counts.len(),
        });
    }

    let mut weights = BTreeMap::new();
    let mut total_weight = 0.0;
    for (name, count) in &counts {
        let weight = *count as f64 / total_tokens as f64;
        tracing::info!("list weight for {name} is {weight}");
        total_weight += weight;
        weights.insert(name.clone(), weight);
    }

    Ok(SourceWeights {
        weights,
        counts,
        total_tokens,
        total_weight,
    })
}
