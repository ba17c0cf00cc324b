//! Load → aggregate → persist. The only place core and disk meet.

use std::path::PathBuf;

use tl_core::{
    DedupCatalog, ListVersion, OverrideCatalog, SourceWeights, TokenCatalog, build_popular_list,
    compute_weights, eligible_source_names,
};

use crate::config::RegistryConfig;
use crate::error::Result;
use crate::list_file::{ListStore, per_chain_lists};

/// Outcome of a successful build.
#[derive(Debug)]
pub struct BuildReport {
    pub output: PathBuf,
    pub tokens: usize,
    pub chain_lists: usize,
    pub version: ListVersion,
    pub weights: SourceWeights,
    pub skipped: usize,
}

fn catalog(store: &ListStore, config: &RegistryConfig) -> Result<Box<dyn TokenCatalog>> {
    match &config.list.overrides {
        Some(name) => {
            let list = store.load_list(name)?;
            tracing::info!("using {} authoritative records from {name}", list.tokens.len());
            Ok(Box::new(OverrideCatalog::new(list.tokens)))
        }
        None => Ok(Box::new(DedupCatalog)),
    }
}

/// Build the popular list and write it, plus one list per chain.
///
/// Every eligible source must load; nothing is written otherwise.
pub fn build_popular(store: &ListStore, config: &RegistryConfig) -> Result<BuildReport> {
    let chains = config.chain_registry()?;
    let settings = config.settings();
    let catalog = catalog(store, config)?;

    let popular = build_popular_list(
        config.generators(),
        &chains,
        catalog.as_ref(),
        &settings,
        |name| store.load_source(name),
    )?;

    let weights = popular.weights.clone();
    let skipped = popular.skipped;
    let saved = store.prepare_list(&settings.output_name, popular.into_token_list())?;
    let chain_lists = per_chain_lists(&saved, &chains);
    store.publish(&settings.output_name, &saved, &chain_lists)?;

    Ok(BuildReport {
        output: store.output_path(&settings.output_name),
        tokens: saved.tokens.len(),
        chain_lists: chain_lists.len(),
        version: saved.header.version,
        weights,
        skipped,
    })
}

/// Weights of the eligible sources, without accumulating. Sources are
/// chosen exactly as [`build_popular`] chooses them.
pub fn source_weights(store: &ListStore, config: &RegistryConfig) -> Result<SourceWeights> {
    let names = eligible_source_names(config.generators(), &config.settings())?;

    let mut counts = Vec::with_capacity(names.len());
    for name in &names {
        counts.push((name.as_str(), store.load_list(name)?.tokens.len()));
    }
    Ok(compute_weights(counts)?)
}
