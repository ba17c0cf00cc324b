use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::STATIC_SUFFIX;
use crate::list::TokenRecord;

static SOURCE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9._-]*$").unwrap());

/// How a source list is produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorType {
    /// Maintained independently; votes in the aggregation.
    #[default]
    Normal,
    /// Derived from other lists; voting would double-count its inputs.
    Pool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorEntry {
    #[serde(default)]
    pub excluded: bool,
    #[serde(default)]
    pub generator_type: GeneratorType,
}

/// Source name → generator metadata. Injected read-only.
pub type GeneratorRegistry = BTreeMap<String, GeneratorEntry>;

/// A loaded source list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceList {
    pub name: String,
    pub tokens: Vec<TokenRecord>,
}

impl SourceList {
    pub fn new(name: impl Into<String>, tokens: Vec<TokenRecord>) -> Self {
        Self {
            name: name.into(),
            tokens,
        }
    }

    /// Entries of a `-static` source are always popular.
    pub fn is_static(&self) -> bool {
        is_static_source(&self.name)
    }
}

pub fn is_static_source(name: &str) -> bool {
    name.ends_with(STATIC_SUFFIX)
}

/// Source names double as file stems, so they stay within `[a-z0-9._-]`.
pub fn is_valid_source_name(name: &str) -> bool {
    SOURCE_NAME.is_match(name)
}

/// Names of the sources that vote, in lexicographic order.
///
/// Skips excluded entries, pooled (derived) lists, and any name in
/// `self_names` so an aggregate never feeds into its own computation.
pub fn eligible_sources(registry: &GeneratorRegistry, self_names: &[&str]) -> Vec<String> {
    registry
        .iter()
        .filter(|(name, entry)| {
            !entry.excluded
                && entry.generator_type != GeneratorType::Pool
                && !self_names.contains(&name.as_str())
        })
        .map(|(name, _)| name.clone())
        .collect()
}
