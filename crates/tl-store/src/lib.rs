pub mod build;
pub mod clock;
pub mod config;
pub mod error;
pub mod list_file;

pub use build::{BuildReport, build_popular, source_weights};
pub use config::{ChainSection, ListSection, NativeCoinSection, RegistryConfig};
pub use error::{Result, StoreError};
pub use list_file::{ListStore, per_chain_lists};
