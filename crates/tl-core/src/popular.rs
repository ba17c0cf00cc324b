//! The four-stage build: enumerate → weigh → accumulate → filter.

use crate::accumulate::Accumulator;
use crate::catalog::TokenCatalog;
use crate::chain::ChainRegistry;
use crate::constants::{AGGREGATE_LIST_NAME, POPULAR_LIST_NAME};
use crate::error::{AggregateError, Result};
use crate::filter::{reconcile_scores, select_popular};
use crate::list::{TokenList, TokenListHeader, TokenRecord};
use crate::source::{GeneratorRegistry, SourceList, eligible_sources, is_valid_source_name};
use crate::weight::{SourceWeights, compute_weights};

/// Header constants and self-reference guards for the popular list.
#[derive(Clone, Debug, PartialEq)]
pub struct PopularSettings {
    pub header: TokenListHeader,
    /// The all-lists aggregate, never a voter.
    pub aggregate_name: String,
    /// The list being built, never a voter.
    pub output_name: String,
}

impl Default for PopularSettings {
    fn default() -> Self {
        Self {
            header: TokenListHeader {
                name: "Popular tokens".to_string(),
                logo_uri: "https://raw.githubusercontent.com/smoldapp/tokenLists/main/.github/tokenlistooor.svg".to_string(),
                description: "A curated list of popular tokens from all the token lists on tokenlistooor.".to_string(),
                ..Default::default()
            },
            aggregate_name: AGGREGATE_LIST_NAME.to_string(),
            output_name: POPULAR_LIST_NAME.to_string(),
        }
    }
}

impl PopularSettings {
    pub fn self_names(&self) -> [&str; 2] {
        [self.aggregate_name.as_str(), self.output_name.as_str()]
    }
}

/// Result of a build: the final ordered tokens plus the weights that
/// produced them.
#[derive(Clone, Debug)]
pub struct PopularList {
    pub header: TokenListHeader,
    pub tokens: Vec<TokenRecord>,
    pub weights: SourceWeights,
    /// Sightings dropped for referencing an unsupported chain.
    pub skipped: usize,
}

impl PopularList {
    pub fn into_token_list(self) -> TokenList {
        TokenList {
            header: self.header,
            tokens: self.tokens,
        }
    }
}

/// Eligible voters for `settings`, in lexicographic order.
///
/// Fails when nothing is eligible or when a name is unusable as a file stem,
/// before any source is read.
pub fn eligible_source_names(
    generators: &GeneratorRegistry,
    settings: &PopularSettings,
) -> Result<Vec<String>> {
    let names = eligible_sources(generators, &settings.self_names());
    if names.is_empty() {
        return Err(AggregateError::NoEligibleSources);
    }
    if let Some(bad) = names.iter().find(|n| !is_valid_source_name(n)) {
        return Err(AggregateError::InvalidSourceName(bad.clone()));
    }
    Ok(names)
}

/// Enumerate eligible sources from `generators`, load each with `load`, and
/// aggregate them.
///
/// Any load failure aborts the whole build; no partial list is produced.
pub fn build_popular_list<E, L>(
    generators: &GeneratorRegistry,
    chains: &ChainRegistry,
    catalog: &dyn TokenCatalog,
    settings: &PopularSettings,
    mut load: L,
) -> std::result::Result<PopularList, E>
where
    L: FnMut(&str) -> std::result::Result<SourceList, E>,
    E: From<AggregateError>,
{
    let names = eligible_source_names(generators, settings)?;

    let mut sources = Vec::with_capacity(names.len());
    for name in &names {
        sources.push(load(name)?);
    }

    Ok(aggregate(&sources, chains, catalog, settings)?)
}

/// Aggregate already-loaded eligible sources.
pub fn aggregate(
    sources: &[SourceList],
    chains: &ChainRegistry,
    catalog: &dyn TokenCatalog,
    settings: &PopularSettings,
) -> Result<PopularList> {
    let weights = compute_weights(sources.iter().map(|s| (s.name.as_str(), s.tokens.len())))?;

    let mut accumulator = Accumulator::new(chains);
    for source in sources {
        accumulator.add_source(&source.name, &source.tokens, weights.weight(&source.name));
    }
    tracing::debug!(
        "accumulated {} tokens from {} sources ({} sightings on unsupported chains)",
        accumulator.len(),
        sources.len(),
        accumulator.skipped()
    );

    let assembled = select_popular(&accumulator, chains, weights.total_weight());
    let canonical = catalog.canonicalize(&assembled);
    let tokens = reconcile_scores(canonical, &assembled);

    Ok(PopularList {
        header: settings.header.clone(),
        tokens,
        skipped: accumulator.skipped(),
        weights,
    })
}
