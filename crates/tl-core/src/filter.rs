use std::collections::HashMap;

use crate::accumulate::Accumulator;
use crate::chain::{ChainConfig, ChainRegistry};
use crate::list::TokenRecord;
use crate::score::OccurrenceScore;

/// Minimum score for a token to be popular on `chain`.
///
/// `total_weight` is the global sum of source weights, shared by every chain.
pub fn threshold_for(chain: &ChainConfig, total_weight: f64) -> f64 {
    chain.weight_ratio * total_weight
}

/// Native coins of every supported chain, then every accumulated token that
/// clears its chain's threshold.
///
/// Chains without a contributing source add no scored tokens. Output order is
/// deterministic: natives in chain-id order, then survivors by chain id and
/// checksummed address.
pub fn select_popular(
    accumulator: &Accumulator<'_>,
    registry: &ChainRegistry,
    total_weight: f64,
) -> Vec<TokenRecord> {
    let mut selected: Vec<TokenRecord> = registry.iter().map(|c| c.native_coin.clone()).collect();

    for chain_id in accumulator.chains() {
        if !accumulator.has_contributors(chain_id) {
            continue;
        }
        let Some(chain) = registry.get(chain_id) else {
            continue;
        };

        let threshold = threshold_for(chain, total_weight);
        let mut considered = 0usize;
        let before = selected.len();
        for token in accumulator.tokens_on(chain_id) {
            considered += 1;
            if token.score.passes(threshold) {
                selected.push(token.to_record());
            }
        }
        tracing::info!(
            "chain {chain_id} ({}): {} of {considered} tokens reach threshold {threshold:.6}",
            chain.name,
            selected.len() - before,
        );
    }

    selected
}

/// Copy computed scores onto the canonical view of the assembled tokens.
///
/// Canonical metadata wins; only the occurrence score is carried over, matched
/// on `(chain id, checksummed address)`.
pub fn reconcile_scores(
    mut canonical: Vec<TokenRecord>,
    assembled: &[TokenRecord],
) -> Vec<TokenRecord> {
    let scores: HashMap<(u64, String), OccurrenceScore> = assembled
        .iter()
        .filter_map(|t| t.occurrence.map(|score| (t.key(), score)))
        .collect();

    for token in &mut canonical {
        if let Some(score) = scores.get(&token.key()) {
            token.occurrence = Some(*score);
        }
    }
    canonical
}
