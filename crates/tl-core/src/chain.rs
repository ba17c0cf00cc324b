use std::collections::BTreeMap;

use crate::address::same_address;
use crate::error::{AggregateError, Result};
use crate::list::TokenRecord;

/// Per-chain aggregation settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainConfig {
    pub id: u64,
    pub name: String,
    /// Fraction of the total source weight a token must reach to be popular.
    pub weight_ratio: f64,
    /// Addresses that are always popular on this chain.
    pub extra_tokens: Vec<String>,
    /// Included in the output regardless of score.
    pub native_coin: TokenRecord,
}

impl ChainConfig {
    pub fn is_extra_token(&self, address: &str) -> bool {
        self.extra_tokens.iter().any(|t| same_address(t, address))
    }
}

/// Supported chains, ordered by chain id.
#[derive(Clone, Debug, Default)]
pub struct ChainRegistry {
    chains: BTreeMap<u64, ChainConfig>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chain. Rejects duplicate ids and ratios that are negative
    /// or not finite.
    pub fn insert(&mut self, chain: ChainConfig) -> Result<()> {
        if !chain.weight_ratio.is_finite() || chain.weight_ratio < 0.0 {
            return Err(AggregateError::InvalidWeightRatio {
                chain_id: chain.id,
                ratio: chain.weight_ratio,
            });
        }
        if self.chains.contains_key(&chain.id) {
            return Err(AggregateError::DuplicateChain(chain.id));
        }
        self.chains.insert(chain.id, chain);
        Ok(())
    }

    pub fn from_chains(chains: impl IntoIterator<Item = ChainConfig>) -> Result<Self> {
        let mut registry = Self::new();
        for chain in chains {
            registry.insert(chain)?;
        }
        Ok(registry)
    }

    pub fn is_supported(&self, chain_id: u64) -> bool {
        self.chains.contains_key(&chain_id)
    }

    pub fn get(&self, chain_id: u64) -> Option<&ChainConfig> {
        self.chains.get(&chain_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainConfig> {
        self.chains.values()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(id: u64, ratio: f64) -> ChainConfig {
        ChainConfig {
            id,
            name: format!("chain-{id}"),
            weight_ratio: ratio,
            extra_tokens: vec!["0xAbCdEf".to_string()],
            native_coin: TokenRecord {
                address: "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE".to_string(),
                chain_id: id,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_is_supported() {
        let registry = ChainRegistry::from_chains([chain(1, 0.5), chain(10, 0.3)]).unwrap();
        assert!(registry.is_supported(1));
        assert!(registry.is_supported(10));
        assert!(!registry.is_supported(56));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_iter_sorted_by_id() {
        let registry =
            ChainRegistry::from_chains([chain(137, 0.5), chain(1, 0.5), chain(10, 0.5)]).unwrap();
        let ids: Vec<u64> = registry.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 10, 137]);
    }

    #[test]
    fn test_extra_token_any_spelling() {
        let c = chain(1, 0.5);
        assert!(c.is_extra_token("0xabcdef"));
        assert!(c.is_extra_token("0XABCDEF"));
        assert!(c.is_extra_token("abcdef"));
        assert!(c.is_extra_token("0x0000000000000000000000000000000000abcdef"));
        assert!(!c.is_extra_token("0xabcdee"));
    }

    #[test]
    fn test_duplicate_chain_rejected() {
        let err = ChainRegistry::from_chains([chain(1, 0.5), chain(1, 0.2)]).unwrap_err();
        assert_eq!(err, AggregateError::DuplicateChain(1));
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        assert!(ChainRegistry::from_chains([chain(1, -0.1)]).is_err());
        assert!(ChainRegistry::from_chains([chain(1, f64::NAN)]).is_err());
    }
}
