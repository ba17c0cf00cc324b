//! Registry configuration: list header constants, supported chains, and the
//! generator registry, read from one TOML file.
//!
//! ```toml
//! [list]
//! name = "Popular tokens"
//! overrides = "canonical"
//!
//! [[chains]]
//! id = 1
//! name = "Ethereum"
//! weight_ratio = 0.5
//! extra_tokens = ["0x0bc529c00C6401aEF6D220BE8C6Ea1667F6Ad93e"]
//! native_coin = { address = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE", name = "Ether", symbol = "ETH" }
//!
//! [generators.uniswap]
//! [generators.uniswap-pools]
//! generator_type = "pool"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tl_core::{
    ChainConfig, ChainRegistry, DEFAULT_DECIMALS, GeneratorRegistry, PopularSettings,
    TokenListHeader, TokenRecord,
};

use crate::error::{Result, StoreError};

pub const CONFIG_ENV: &str = "TL_CONFIG";
pub const LISTS_DIR_ENV: &str = "TL_LISTS_DIR";
pub const OUT_DIR_ENV: &str = "TL_OUT_DIR";
pub const DEFAULT_CONFIG_FILE: &str = "tokenlists.toml";
pub const DEFAULT_LISTS_DIR: &str = "lists";

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub list: ListSection,
    #[serde(default)]
    pub chains: Vec<ChainSection>,
    #[serde(default)]
    pub generators: GeneratorRegistry,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListSection {
    pub name: String,
    pub logo_uri: String,
    pub description: String,
    pub keywords: Vec<String>,
    /// File stem of the produced list.
    pub output_name: String,
    /// The all-lists aggregate, never a voter.
    pub aggregate_name: String,
    /// Optional list whose records are authoritative metadata.
    pub overrides: Option<String>,
}

impl Default for ListSection {
    fn default() -> Self {
        let defaults = PopularSettings::default();
        Self {
            name: defaults.header.name,
            logo_uri: defaults.header.logo_uri,
            description: defaults.header.description,
            keywords: Vec::new(),
            output_name: defaults.output_name,
            aggregate_name: defaults.aggregate_name,
            overrides: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainSection {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub weight_ratio: f64,
    #[serde(default)]
    pub extra_tokens: Vec<String>,
    pub native_coin: NativeCoinSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NativeCoinSection {
    pub address: String,
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    #[serde(default)]
    pub logo_uri: String,
}

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

impl ChainSection {
    fn to_chain_config(&self) -> ChainConfig {
        ChainConfig {
            id: self.id,
            name: self.name.clone(),
            weight_ratio: self.weight_ratio,
            extra_tokens: self.extra_tokens.clone(),
            native_coin: TokenRecord {
                address: self.native_coin.address.clone(),
                name: self.native_coin.name.clone(),
                symbol: self.native_coin.symbol.clone(),
                logo_uri: self.native_coin.logo_uri.clone(),
                chain_id: self.id,
                decimals: Some(self.native_coin.decimals),
                occurrence: None,
            },
        }
    }
}

impl RegistryConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| StoreError::Io(path.to_path_buf(), e))?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| StoreError::Toml(path.to_path_buf(), e))?;
        tracing::debug!(
            "loaded {} chains and {} generators from {}",
            config.chains.len(),
            config.generators.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Validated chain registry. Fails on duplicate ids or bad ratios.
    pub fn chain_registry(&self) -> Result<ChainRegistry> {
        Ok(ChainRegistry::from_chains(
            self.chains.iter().map(ChainSection::to_chain_config),
        )?)
    }

    pub fn generators(&self) -> &GeneratorRegistry {
        &self.generators
    }

    pub fn settings(&self) -> PopularSettings {
        PopularSettings {
            header: TokenListHeader {
                name: self.list.name.clone(),
                logo_uri: self.list.logo_uri.clone(),
                description: self.list.description.clone(),
                keywords: self.list.keywords.clone(),
                ..Default::default()
            },
            aggregate_name: self.list.aggregate_name.clone(),
            output_name: self.list.output_name.clone(),
        }
    }
}

/// Path priority: explicit flag, then environment, then the default.
pub fn resolve_path(explicit: Option<&Path>, env_value: Option<String>, default: &str) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    env_value
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    resolve_path(explicit, std::env::var(CONFIG_ENV).ok(), DEFAULT_CONFIG_FILE)
}

pub fn resolve_lists_dir(explicit: Option<&Path>) -> PathBuf {
    resolve_path(explicit, std::env::var(LISTS_DIR_ENV).ok(), DEFAULT_LISTS_DIR)
}

/// Output defaults to the lists directory, so the next run can read the
/// previous version.
pub fn resolve_out_dir(explicit: Option<&Path>, lists_dir: &Path) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    std::env::var(OUT_DIR_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| lists_dir.to_path_buf())
}
