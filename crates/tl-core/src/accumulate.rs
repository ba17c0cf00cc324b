use std::collections::{BTreeMap, BTreeSet};

use crate::address::normalize_address;
use crate::chain::ChainRegistry;
use crate::constants::DEFAULT_DECIMALS;
use crate::list::TokenRecord;
use crate::score::OccurrenceScore;
use crate::source::is_static_source;

/// A token merged across every source that lists it on one chain.
#[derive(Clone, Debug, PartialEq)]
pub struct AccumulatedToken {
    pub chain_id: u64,
    /// Checksummed address (see [`normalize_address`]), also the map key.
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub logo_uri: String,
    pub decimals: u8,
    pub score: OccurrenceScore,
}

impl AccumulatedToken {
    fn first_sighting(token: &TokenRecord, score: OccurrenceScore) -> Self {
        Self {
            chain_id: token.chain_id,
            address: normalize_address(&token.address),
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            logo_uri: token.logo_uri.clone(),
            decimals: token.decimals.unwrap_or(DEFAULT_DECIMALS),
            score,
        }
    }

    /// Fold in a later sighting. The earliest non-empty value of each field
    /// wins; the score accumulates or is promoted to forced.
    fn absorb(&mut self, token: &TokenRecord, weight: f64, forced: bool) {
        fill_if_empty(&mut self.name, &token.name);
        fill_if_empty(&mut self.symbol, &token.symbol);
        fill_if_empty(&mut self.logo_uri, &token.logo_uri);
        if self.decimals == 0
            && let Some(decimals) = token.decimals
        {
            self.decimals = decimals;
        }
        self.score = self.score.merge(weight, forced);
    }

    pub fn to_record(&self) -> TokenRecord {
        TokenRecord {
            address: self.address.clone(),
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            logo_uri: self.logo_uri.clone(),
            chain_id: self.chain_id,
            decimals: Some(self.decimals),
            occurrence: Some(self.score),
        }
    }
}

fn fill_if_empty(field: &mut String, candidate: &str) {
    if field.is_empty() && !candidate.is_empty() {
        *field = candidate.to_string();
    }
}

/// Per-chain index of accumulated tokens: chain id → normalized address → token.
///
/// Also tracks which sources contributed at least one token on each chain.
/// Chains outside the registry are never indexed.
pub struct Accumulator<'r> {
    registry: &'r ChainRegistry,
    tokens: BTreeMap<u64, BTreeMap<String, AccumulatedToken>>,
    contributors: BTreeMap<u64, BTreeSet<String>>,
    skipped: usize,
}

impl<'r> Accumulator<'r> {
    pub fn new(registry: &'r ChainRegistry) -> Self {
        Self {
            registry,
            tokens: BTreeMap::new(),
            contributors: BTreeMap::new(),
            skipped: 0,
        }
    }

    /// Merge every token of one source, each sighting worth `weight`.
    pub fn add_source(&mut self, source_name: &str, tokens: &[TokenRecord], weight: f64) {
        let registry = self.registry;
        let static_source = is_static_source(source_name);

        for token in tokens {
            let Some(chain) = registry.get(token.chain_id) else {
                tracing::trace!(
                    "{source_name}: skipping {} on unsupported chain {}",
                    token.address,
                    token.chain_id
                );
                self.skipped += 1;
                continue;
            };

            let key = normalize_address(&token.address);
            let forced = static_source || chain.is_extra_token(&token.address);

            let contributors = self.contributors.entry(token.chain_id).or_default();
            if !contributors.contains(source_name) {
                contributors.insert(source_name.to_string());
            }

            self.tokens
                .entry(token.chain_id)
                .or_default()
                .entry(key)
                .and_modify(|existing| existing.absorb(token, weight, forced))
                .or_insert_with(|| {
                    AccumulatedToken::first_sighting(token, OccurrenceScore::initial(weight, forced))
                });
        }
    }

    pub fn get(&self, chain_id: u64, address: &str) -> Option<&AccumulatedToken> {
        self.tokens
            .get(&chain_id)
            .and_then(|m| m.get(&normalize_address(address)))
    }

    /// Chains holding at least one accumulated token, in id order.
    pub fn chains(&self) -> impl Iterator<Item = u64> + '_ {
        self.tokens.keys().copied()
    }

    /// Accumulated tokens on a chain, in key order.
    pub fn tokens_on(&self, chain_id: u64) -> impl Iterator<Item = &AccumulatedToken> {
        self.tokens.get(&chain_id).into_iter().flat_map(|m| m.values())
    }

    #[cfg(test)]
    pub fn contributors(&self, chain_id: u64) -> Option<&BTreeSet<String>> {
        self.contributors.get(&chain_id)
    }

    pub fn has_contributors(&self, chain_id: u64) -> bool {
        self.contributors
            .get(&chain_id)
            .is_some_and(|s| !s.is_empty())
    }

    /// Total accumulated tokens across all chains.
    pub fn len(&self) -> usize {
        self.tokens.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sightings dropped for referencing an unsupported chain.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainConfig;

    const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
    const YFI: &str = "0x0bc529c00C6401aEF6D220BE8C6Ea1667F6Ad93e";

    fn registry() -> ChainRegistry {
        ChainRegistry::from_chains([ChainConfig {
            id: 1,
            name: "Ethereum".into(),
            weight_ratio: 0.5,
            extra_tokens: vec![YFI.to_lowercase()],
            native_coin: TokenRecord {
                address: "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE".into(),
                chain_id: 1,
                ..Default::default()
            },
        }])
        .unwrap()
    }

    fn token(chain_id: u64, address: &str, name: &str, symbol: &str) -> TokenRecord {
        TokenRecord {
            address: address.into(),
            name: name.into(),
            symbol: symbol.into(),
            chain_id,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_sighting_defaults() {
        let reg = registry();
        let mut acc = Accumulator::new(&reg);
        acc.add_source("a", &[token(1, USDC, "", "")], 0.4);

        let t = acc.get(1, USDC).unwrap();
        assert_eq!(t.address, USDC);
        assert_eq!(t.name, "");
        assert_eq!(t.decimals, 18);
        assert_eq!(t.score, OccurrenceScore::Weighted(0.4));
    }

    #[test]
    fn test_unsupported_chain_skipped() {
        let reg = registry();
        let mut acc = Accumulator::new(&reg);
        acc.add_source("a", &[token(56, USDC, "USD Coin", "USDC")], 1.0);

        assert!(acc.is_empty());
        assert_eq!(acc.skipped(), 1);
        assert!(!acc.has_contributors(56));
    }

    #[test]
    fn test_one_entry_per_normalized_address() {
        let reg = registry();
        let mut acc = Accumulator::new(&reg);
        acc.add_source("a", &[token(1, USDC, "USD Coin", "USDC")], 0.5);
        acc.add_source("b", &[token(1, &USDC.to_uppercase(), "", "")], 0.25);

        assert_eq!(acc.len(), 1);
        let t = acc.get(1, USDC).unwrap();
        assert_eq!(t.score, OccurrenceScore::Weighted(0.75));
    }

    #[test]
    fn test_prefixless_spelling_merges() {
        let reg = registry();
        let mut acc = Accumulator::new(&reg);
        acc.add_source("a", &[token(1, USDC, "USD Coin", "USDC")], 0.5);
        acc.add_source("b", &[token(1, &USDC[2..].to_lowercase(), "", "")], 0.5);

        assert_eq!(acc.len(), 1);
        let t = acc.get(1, USDC).unwrap();
        assert_eq!(t.score, OccurrenceScore::Weighted(1.0));
        assert_eq!(t.to_record().address, USDC);
    }

    #[test]
    fn test_extra_token_matches_unprefixed() {
        let reg = registry();
        let mut acc = Accumulator::new(&reg);
        acc.add_source("a", &[token(1, &YFI[2..], "yearn", "YFI")], 0.01);

        let t = acc.get(1, YFI).unwrap();
        assert!(t.score.is_forced());
        assert_eq!(t.address, YFI);
    }

    #[test]
    fn test_first_non_empty_wins() {
        let reg = registry();
        let mut acc = Accumulator::new(&reg);
        acc.add_source("a", &[token(1, USDC, "Foo", "")], 0.5);
        acc.add_source("b", &[token(1, USDC, "Bar", "BAR")], 0.5);

        let t = acc.get(1, USDC).unwrap();
        assert_eq!(t.name, "Foo");
        assert_eq!(t.symbol, "BAR");
    }

    #[test]
    fn test_logo_filled_later() {
        let reg = registry();
        let mut acc = Accumulator::new(&reg);
        acc.add_source("a", &[token(1, USDC, "USD Coin", "USDC")], 0.5);
        let mut with_logo = token(1, USDC, "", "");
        with_logo.logo_uri = "ipfs://usdc".into();
        acc.add_source("b", &[with_logo], 0.5);

        assert_eq!(acc.get(1, USDC).unwrap().logo_uri, "ipfs://usdc");
    }

    #[test]
    fn test_decimals_first_present_wins() {
        let reg = registry();
        let mut acc = Accumulator::new(&reg);
        let mut six = token(1, USDC, "", "");
        six.decimals = Some(6);
        let mut eight = token(1, USDC, "", "");
        eight.decimals = Some(8);
        acc.add_source("a", &[six], 0.5);
        acc.add_source("b", &[eight], 0.5);

        assert_eq!(acc.get(1, USDC).unwrap().decimals, 6);
    }

    #[test]
    fn test_extra_token_forced_on_creation() {
        let reg = registry();
        let mut acc = Accumulator::new(&reg);
        acc.add_source("a", &[token(1, YFI, "yearn", "YFI")], 0.01);

        assert!(acc.get(1, YFI).unwrap().score.is_forced());
    }

    #[test]
    fn test_static_source_forces() {
        let reg = registry();
        let mut acc = Accumulator::new(&reg);
        acc.add_source("curated-static", &[token(1, USDC, "", "")], 0.01);

        assert!(acc.get(1, USDC).unwrap().score.is_forced());
    }

    #[test]
    fn test_later_static_sighting_promotes() {
        let reg = registry();
        let mut acc = Accumulator::new(&reg);
        acc.add_source("a", &[token(1, USDC, "", "")], 0.1);
        acc.add_source("z-static", &[token(1, USDC, "", "")], 0.1);

        assert!(acc.get(1, USDC).unwrap().score.is_forced());
    }

    #[test]
    fn test_forced_never_demoted() {
        let reg = registry();
        let mut acc = Accumulator::new(&reg);
        acc.add_source("a-static", &[token(1, USDC, "", "")], 0.1);
        acc.add_source("b", &[token(1, USDC, "", "")], 0.2);
        acc.add_source("c", &[token(1, USDC, "", "")], 0.3);

        assert_eq!(
            acc.get(1, USDC).unwrap().score,
            OccurrenceScore::ForcedInclude
        );
    }

    #[test]
    fn test_contributors_tracked_once() {
        let reg = registry();
        let mut acc = Accumulator::new(&reg);
        acc.add_source(
            "a",
            &[token(1, USDC, "", ""), token(1, YFI, "", ""), token(10, USDC, "", "")],
            0.5,
        );
        acc.add_source("b", &[token(1, USDC, "", "")], 0.5);

        let contributors: Vec<&str> = acc
            .contributors(1)
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(contributors, vec!["a", "b"]);
        assert_eq!(acc.skipped(), 1);
    }

    #[test]
    fn test_to_record_carries_score() {
        let reg = registry();
        let mut acc = Accumulator::new(&reg);
        acc.add_source("a", &[token(1, USDC, "USD Coin", "USDC")], 0.5);

        let record = acc.get(1, USDC).unwrap().to_record();
        assert_eq!(record.occurrence, Some(OccurrenceScore::Weighted(0.5)));
        assert_eq!(record.decimals, Some(18));
        assert_eq!(record.symbol, "USDC");
    }
}
