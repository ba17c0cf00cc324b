//! Token list wire types.
//!
//! The JSON shape follows the common token-list format: camelCase keys,
//! `logoURI`, a semver `version` object, and a flat `tokens` array.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::address::normalize_address;
use crate::score::OccurrenceScore;

/// One token as asserted by a single list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(rename = "logoURI", default)]
    pub logo_uri: String,
    pub chain_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence: Option<OccurrenceScore>,
}

impl TokenRecord {
    /// `(chain_id, normalized address)`, the identity of a token across lists.
    pub fn key(&self) -> (u64, String) {
        (self.chain_id, normalize_address(&self.address))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ListVersion {
    /// Next version when `current` replaces `previous`.
    ///
    /// Removed tokens bump major, added tokens bump minor, metadata-only
    /// changes bump patch. An identical token set keeps the version.
    pub fn bump(self, previous: &[TokenRecord], current: &[TokenRecord]) -> Self {
        let before: HashMap<(u64, String), &TokenRecord> =
            previous.iter().map(|t| (t.key(), t)).collect();
        let after: HashMap<(u64, String), &TokenRecord> =
            current.iter().map(|t| (t.key(), t)).collect();

        if before.keys().any(|k| !after.contains_key(k)) {
            return ListVersion {
                major: self.major + 1,
                minor: 0,
                patch: 0,
            };
        }
        if after.keys().any(|k| !before.contains_key(k)) {
            return ListVersion {
                major: self.major,
                minor: self.minor + 1,
                patch: 0,
            };
        }
        let changed = after.iter().any(|(k, t)| before.get(k).is_some_and(|p| p != t));
        if changed {
            ListVersion {
                patch: self.patch + 1,
                ..self
            }
        } else {
            self
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenListHeader {
    pub name: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "logoURI", default)]
    pub logo_uri: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub version: ListVersion,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenList {
    #[serde(flatten)]
    pub header: TokenListHeader,
    #[serde(default)]
    pub tokens: Vec<TokenRecord>,
}

/// Partition tokens by chain, preserving their relative order.
pub fn split_by_chain(tokens: &[TokenRecord]) -> BTreeMap<u64, Vec<TokenRecord>> {
    let mut by_chain: BTreeMap<u64, Vec<TokenRecord>> = BTreeMap::new();
    for token in tokens {
        by_chain
            .entry(token.chain_id)
            .or_default()
            .push(token.clone());
    }
    by_chain
}
