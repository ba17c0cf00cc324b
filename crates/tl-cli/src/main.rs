use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tl_store::config::{resolve_config_path, resolve_lists_dir, resolve_out_dir};
use tl_store::{ListStore, RegistryConfig, build_popular, source_weights};

#[derive(Parser)]
#[command(name = "tl", about = "Build the popular token list from weighted source lists")]
struct Cli {
    /// Registry config file (default: $TL_CONFIG or ./tokenlists.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the source lists (default: $TL_LISTS_DIR or ./lists)
    #[arg(long, global = true)]
    lists_dir: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate every eligible source and write the popular list
    Build {
        /// Output directory (default: $TL_OUT_DIR or the lists directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Show eligible sources with their token counts and weights
    Weights,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<RegistryConfig> {
    let path = resolve_config_path(cli.config.as_deref());
    RegistryConfig::load(&path).with_context(|| format!("failed to load config {}", path.display()))
}

fn open_store(cli: &Cli, out_dir: Option<&Path>) -> ListStore {
    let lists_dir = resolve_lists_dir(cli.lists_dir.as_deref());
    let out_dir = resolve_out_dir(out_dir, &lists_dir);
    ListStore::new(lists_dir, out_dir)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Build { out_dir } => cmd_build(&cli, out_dir.as_deref()),
        Commands::Weights => cmd_weights(&cli),
    }
}

fn cmd_build(cli: &Cli, out_dir: Option<&Path>) -> Result<()> {
    let config = load_config(cli)?;
    let store = open_store(cli, out_dir);

    let report = build_popular(&store, &config).context("failed to build popular list")?;

    println!(
        "built {} v{}.{}.{}",
        report.output.display(),
        report.version.major,
        report.version.minor,
        report.version.patch
    );
    println!("sources:     {}", report.weights.len());
    println!("tokens:      {}", report.tokens);
    println!("chain lists: {}", report.chain_lists);
    if cli.verbose {
        eprintln!(
            "--- total_tokens={}, total_weight={}, skipped={} ---",
            report.weights.total_tokens(),
            report.weights.total_weight(),
            report.skipped
        );
    }
    Ok(())
}

fn cmd_weights(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let store = open_store(cli, None);

    let weights = source_weights(&store, &config).context("failed to compute weights")?;

    for (name, count, weight) in weights.iter() {
        println!("{name:<24} {count:>8} {weight:.6}");
    }
    println!("total: {} tokens across {} sources", weights.total_tokens(), weights.len());
    Ok(())
}
