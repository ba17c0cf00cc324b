//! Canonical view of the assembled token collection.
//!
//! The assembler hands its raw output (native coins plus survivors, possibly
//! with the same token twice) to a catalog, which returns one authoritative
//! record per `(chain id, address)`.

use std::collections::{HashMap, HashSet};

use crate::address::normalize_address;
use crate::list::TokenRecord;

pub trait TokenCatalog {
    fn canonicalize(&self, tokens: &[TokenRecord]) -> Vec<TokenRecord>;
}

/// Keeps the first record per `(chain id, address)`, writes addresses in
/// checksum form, and groups by chain id. Within a chain, input order is kept,
/// so native coins stay ahead of scored tokens.
#[derive(Clone, Copy, Debug, Default)]
pub struct DedupCatalog;

impl TokenCatalog for DedupCatalog {
    fn canonicalize(&self, tokens: &[TokenRecord]) -> Vec<TokenRecord> {
        let mut seen: HashSet<(u64, String)> = HashSet::with_capacity(tokens.len());
        let mut out: Vec<TokenRecord> = tokens
            .iter()
            .filter(|t| seen.insert(t.key()))
            .map(|t| TokenRecord {
                address: normalize_address(&t.address),
                ..t.clone()
            })
            .collect();
        out.sort_by_key(|t| t.chain_id);
        out
    }
}

/// Dedups like [`DedupCatalog`], then lets a set of authoritative records
/// replace the metadata of matching tokens. Empty authoritative fields keep
/// the assembled value.
#[derive(Clone, Debug, Default)]
pub struct OverrideCatalog {
    authoritative: HashMap<(u64, String), TokenRecord>,
}

impl OverrideCatalog {
    pub fn new(records: impl IntoIterator<Item = TokenRecord>) -> Self {
        Self {
            authoritative: records.into_iter().map(|t| (t.key(), t)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.authoritative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authoritative.is_empty()
    }
}

impl TokenCatalog for OverrideCatalog {
    fn canonicalize(&self, tokens: &[TokenRecord]) -> Vec<TokenRecord> {
        let mut out = DedupCatalog.canonicalize(tokens);
        for token in &mut out {
            let Some(canonical) = self.authoritative.get(&token.key()) else {
                continue;
            };
            if !canonical.name.is_empty() {
                token.name = canonical.name.clone();
            }
            if !canonical.symbol.is_empty() {
                token.symbol = canonical.symbol.clone();
            }
            if !canonical.logo_uri.is_empty() {
                token.logo_uri = canonical.logo_uri.clone();
            }
            if canonical.decimals.is_some() {
                token.decimals = canonical.decimals;
            }
        }
        out
    }
}
