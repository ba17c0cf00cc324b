use std::fs;
use std::path::{Path, PathBuf};

use tl_core::{ChainRegistry, ListVersion, SourceList, TokenList, split_by_chain};

use crate::clock::timestamp_now;
use crate::error::{Result, StoreError};

const CHAINS_DIR: &str = "chains";
const FIRST_VERSION: ListVersion = ListVersion {
    major: 1,
    minor: 0,
    patch: 0,
};

/// JSON token lists on disk.
///
/// Layout:
/// ```text
/// <lists_dir>/
/// ├── <source>.json
/// └── ...
/// <out_dir>/
/// ├── popular.json
/// └── chains/
///     ├── 1.json
///     └── ...
/// ```
pub struct ListStore {
    lists_dir: PathBuf,
    out_dir: PathBuf,
}

impl ListStore {
    pub fn new(lists_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            lists_dir: lists_dir.into(),
            out_dir: out_dir.into(),
        }
    }

    pub fn lists_dir(&self) -> &Path {
        &self.lists_dir
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn source_path(&self, name: &str) -> PathBuf {
        self.lists_dir.join(format!("{name}.json"))
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.out_dir.join(format!("{name}.json"))
    }

    pub fn chain_path(&self, chain_id: u64) -> PathBuf {
        self.out_dir.join(CHAINS_DIR).join(format!("{chain_id}.json"))
    }

    /// Load a source list. A missing or malformed file is an error.
    pub fn load_list(&self, name: &str) -> Result<TokenList> {
        let path = self.source_path(name);
        if !path.exists() {
            return Err(StoreError::MissingList {
                name: name.to_string(),
                path,
            });
        }
        read_list(&path)
    }

    pub fn load_source(&self, name: &str) -> Result<SourceList> {
        let list = self.load_list(name)?;
        tracing::debug!("loaded {name}: {} tokens", list.tokens.len());
        Ok(SourceList::new(name, list.tokens))
    }

    /// Previously saved output, if any.
    pub fn load_output(&self, name: &str) -> Result<Option<TokenList>> {
        let path = self.output_path(name);
        if !path.exists() {
            return Ok(None);
        }
        read_list(&path).map(Some)
    }

    /// Version and timestamp `list` for saving as `<name>`, without writing.
    ///
    /// The version is bumped against the file it will replace (first write is
    /// 1.0.0) and the timestamp set to now.
    pub fn prepare_list(&self, name: &str, mut list: TokenList) -> Result<TokenList> {
        list.header.version = match self.load_output(name)? {
            Some(previous) => previous
                .header
                .version
                .bump(&previous.tokens, &list.tokens),
            None => FIRST_VERSION,
        };
        list.header.timestamp = timestamp_now();
        Ok(list)
    }

    /// Write `list` as `<out_dir>/<name>.json` and each per-chain list under
    /// `<out_dir>/chains/`, all or nothing.
    pub fn publish(
        &self,
        name: &str,
        list: &TokenList,
        chain_lists: &[(u64, TokenList)],
    ) -> Result<()> {
        let mut files = Vec::with_capacity(chain_lists.len() + 1);
        files.push((self.output_path(name), list));
        for (chain_id, chain_list) in chain_lists {
            files.push((self.chain_path(*chain_id), chain_list));
        }
        write_all(&files)?;

        tracing::info!(
            "saved {name} v{}.{}.{} with {} tokens",
            list.header.version.major,
            list.header.version.minor,
            list.header.version.patch,
            list.tokens.len()
        );
        tracing::debug!("wrote {} per-chain lists", chain_lists.len());
        Ok(())
    }

    /// Prepare and publish `list` on its own. Returns what was written.
    pub fn save_list(&self, name: &str, list: TokenList) -> Result<TokenList> {
        let list = self.prepare_list(name, list)?;
        self.publish(name, &list, &[])?;
        Ok(list)
    }
}

/// One list per chain, sharing `list`'s header with the chain name appended.
pub fn per_chain_lists(list: &TokenList, chains: &ChainRegistry) -> Vec<(u64, TokenList)> {
    split_by_chain(&list.tokens)
        .into_iter()
        .map(|(chain_id, tokens)| {
            let mut header = list.header.clone();
            if let Some(chain) = chains.get(chain_id)
                && !chain.name.is_empty()
            {
                header.name = format!("{} ({})", header.name, chain.name);
            }
            (chain_id, TokenList { header, tokens })
        })
        .collect()
}

fn read_list(path: &Path) -> Result<TokenList> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::Io(path.to_path_buf(), e))?;
    serde_json::from_str(&content).map_err(|e| StoreError::Json(path.to_path_buf(), e))
}

fn staging_path(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

fn stage(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io(parent.to_path_buf(), e))?;
    }
    fs::write(path, json).map_err(|e| StoreError::Io(path.to_path_buf(), e))
}

/// Serialize every list, stage each next to its target, then rename into
/// place. Nothing is renamed until every file is staged; on a staging error
/// the staged files are removed.
fn write_all(files: &[(PathBuf, &TokenList)]) -> Result<()> {
    let mut rendered = Vec::with_capacity(files.len());
    for (path, list) in files {
        let json = serde_json::to_string_pretty(list)
            .map_err(|e| StoreError::Json(path.clone(), e))?;
        rendered.push((path, json));
    }

    let mut staged: Vec<(PathBuf, &PathBuf)> = Vec::with_capacity(rendered.len());
    for (path, json) in &rendered {
        let tmp = staging_path(path);
        if let Err(e) = stage(&tmp, json) {
            for (tmp, _) in &staged {
                let _ = fs::remove_file(tmp);
            }
            return Err(e);
        }
        staged.push((tmp, *path));
    }

    for (tmp, path) in &staged {
        fs::rename(tmp, path).map_err(|e| StoreError::Io((*path).clone(), e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tl_core::{ChainConfig, TokenListHeader, TokenRecord};

    fn token(chain_id: u64, address: &str, symbol: &str) -> TokenRecord {
        TokenRecord {
            address: address.into(),
            symbol: symbol.into(),
            chain_id,
            decimals: Some(18),
            ..Default::default()
        }
    }

    fn list(tokens: Vec<TokenRecord>) -> TokenList {
        TokenList {
            header: TokenListHeader {
                name: "Popular tokens".into(),
                ..Default::default()
            },
            tokens,
        }
    }

    #[test]
    fn test_load_missing_list() {
        let dir = TempDir::new().unwrap();
        let store = ListStore::new(dir.path(), dir.path());
        match store.load_list("nope") {
            Err(StoreError::MissingList { name, .. }) => assert_eq!(name, "nope"),
            other => panic!("expected MissingList, got {other:?}"),
        }
    }

    #[test]
    fn test_load_malformed_list() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        let store = ListStore::new(dir.path(), dir.path());
        assert!(matches!(store.load_list("bad"), Err(StoreError::Json(..))));
    }

    #[test]
    fn test_load_source() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("uniswap.json"),
            r#"{"name":"Uniswap","tokens":[{"address":"0x01","chainId":1,"symbol":"ONE"}]}"#,
        )
        .unwrap();
        let store = ListStore::new(dir.path(), dir.path());
        let source = store.load_source("uniswap").unwrap();
        assert_eq!(source.name, "uniswap");
        assert_eq!(source.tokens.len(), 1);
        assert_eq!(source.tokens[0].symbol, "ONE");
    }

    #[test]
    fn test_first_save_is_v1() {
        let dir = TempDir::new().unwrap();
        let store = ListStore::new(dir.path(), dir.path().join("out"));
        let saved = store
            .save_list("popular", list(vec![token(1, "0x01", "A")]))
            .unwrap();
        assert_eq!(saved.header.version, FIRST_VERSION);
        assert!(!saved.header.timestamp.is_empty());
        assert!(dir.path().join("out/popular.json").exists());
    }

    #[test]
    fn test_resave_bumps_version() {
        let dir = TempDir::new().unwrap();
        let store = ListStore::new(dir.path(), dir.path());
        store
            .save_list("popular", list(vec![token(1, "0x01", "A")]))
            .unwrap();

        let same = store
            .save_list("popular", list(vec![token(1, "0x01", "A")]))
            .unwrap();
        assert_eq!(same.header.version, FIRST_VERSION);

        let added = store
            .save_list(
                "popular",
                list(vec![token(1, "0x01", "A"), token(1, "0x02", "B")]),
            )
            .unwrap();
        assert_eq!(added.header.version.minor, 1);

        let removed = store
            .save_list("popular", list(vec![token(1, "0x02", "B")]))
            .unwrap();
        assert_eq!(removed.header.version.major, 2);

        let reread = store.load_output("popular").unwrap().unwrap();
        assert_eq!(reread, removed);
    }

    fn optimism() -> ChainRegistry {
        ChainRegistry::from_chains([ChainConfig {
            id: 10,
            name: "Optimism".into(),
            weight_ratio: 0.5,
            extra_tokens: Vec::new(),
            native_coin: token(10, "0xee", "ETH"),
        }])
        .unwrap()
    }

    #[test]
    fn test_per_chain_lists() {
        let full = list(vec![
            token(1, "0x01", "A"),
            token(10, "0x02", "B"),
            token(10, "0x03", "C"),
        ]);

        let lists = per_chain_lists(&full, &optimism());
        assert_eq!(lists.len(), 2);

        let (_, mainnet) = lists.iter().find(|(id, _)| *id == 1).unwrap();
        assert_eq!(mainnet.header.name, "Popular tokens");
        let (_, op) = lists.iter().find(|(id, _)| *id == 10).unwrap();
        assert_eq!(op.header.name, "Popular tokens (Optimism)");
        assert_eq!(op.tokens.len(), 2);
    }

    #[test]
    fn test_publish_writes_every_file() {
        let dir = TempDir::new().unwrap();
        let store = ListStore::new(dir.path(), dir.path());
        let full = store
            .prepare_list("popular", list(vec![token(1, "0x01", "A"), token(10, "0x02", "B")]))
            .unwrap();
        assert!(!store.output_path("popular").exists());

        let chains = per_chain_lists(&full, &optimism());
        store.publish("popular", &full, &chains).unwrap();

        assert_eq!(read_list(&store.output_path("popular")).unwrap(), full);
        let op = read_list(&store.chain_path(10)).unwrap();
        assert_eq!(op.header.name, "Popular tokens (Optimism)");
        assert!(store.chain_path(1).exists());
        assert!(!staging_path(&store.output_path("popular")).exists());
    }

    #[test]
    fn test_publish_failure_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let store = ListStore::new(dir.path(), dir.path());
        // a directory where the chain file would be staged makes staging fail
        fs::create_dir_all(staging_path(&store.chain_path(10))).unwrap();

        let full = store
            .prepare_list("popular", list(vec![token(1, "0x01", "A"), token(10, "0x02", "B")]))
            .unwrap();
        let chains = per_chain_lists(&full, &optimism());

        assert!(matches!(
            store.publish("popular", &full, &chains),
            Err(StoreError::Io(..))
        ));
        assert!(!store.output_path("popular").exists());
        assert!(!staging_path(&store.output_path("popular")).exists());
        assert!(!store.chain_path(1).exists());
        assert!(!staging_path(&store.chain_path(1)).exists());
    }

    #[test]
    fn test_publish_failure_keeps_previous_output() {
        let dir = TempDir::new().unwrap();
        let store = ListStore::new(dir.path(), dir.path());
        let first = store
            .save_list("popular", list(vec![token(10, "0x01", "A")]))
            .unwrap();

        fs::create_dir_all(staging_path(&store.chain_path(10))).unwrap();
        let next = store
            .prepare_list("popular", list(vec![token(10, "0x02", "B")]))
            .unwrap();
        let chains = per_chain_lists(&next, &optimism());
        assert!(store.publish("popular", &next, &chains).is_err());

        assert_eq!(store.load_output("popular").unwrap().unwrap(), first);
    }
}
