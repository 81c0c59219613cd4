//! Command-line front end for the virtual resource repository.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use vrepo_core::{AddResource, FilesystemResource, LinkResource, RepositoryConfig};

mod commands;

#[derive(Parser)]
#[command(name = "vrepo", version, about = "Inspect and mutate a virtual resource repository")]
struct Cli {
    /// Filesystem root relative FsPath targets resolve against.
    ///
    /// Precedence: this flag, then `vrepo.toml`'s `base_directory`, then the
    /// current working directory.
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Path to a `vrepo.toml` config file. Defaults to `./vrepo.toml` if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum link-resolution recursion depth.
    #[arg(long, global = true)]
    max_link_depth: Option<u8>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Map a virtual path to a filesystem path or another virtual path.
    Add {
        vpath: String,
        target: String,
        /// Treat `target` as a virtual path (a link) rather than a filesystem path.
        #[arg(long)]
        link: bool,
    },
    /// Resolve a virtual path and print its backing filesystem path.
    Get { vpath: String },
    /// Evaluate a literal or glob query and print matching virtual paths.
    Find {
        query: String,
        #[arg(long, default_value = "glob")]
        lang: String,
    },
    /// List the direct (or recursive) children of a virtual path.
    ListChildren {
        vpath: String,
        #[arg(long)]
        recursive: bool,
    },
    /// Print whether a virtual path has any children.
    HasChildren { vpath: String },
    /// Remove every mapping matched by a glob query.
    Remove { query: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    base_directory: Option<PathBuf>,
    max_link_depth: Option<u8>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let store_path = config.base_directory.join(".vrepo").join("store.json");
    commands::run(cli.command, config, store_path)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn resolve_config(cli: &Cli) -> Result<RepositoryConfig> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("vrepo.toml"));
    let file_config = load_file_config(&config_path)?;

    let base_directory = cli
        .base_dir
        .clone()
        .or(file_config.base_directory)
        .map(Ok)
        .unwrap_or_else(|| std::env::current_dir().context("resolving current directory"))?;

    let max_link_depth = cli
        .max_link_depth
        .or(file_config.max_link_depth)
        .unwrap_or(vrepo_core::config::DEFAULT_MAX_LINK_DEPTH);

    Ok(RepositoryConfig::new(base_directory).with_max_link_depth(max_link_depth))
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

pub(crate) fn resource_from_args(target: String, link: bool) -> AddResource {
    if link {
        AddResource::Link(LinkResource::new(target))
    } else {
        AddResource::Filesystem(FilesystemResource::new(target))
    }
}

pub(crate) fn require_lang(lang: &str) -> Result<()> {
    if lang != "glob" && lang != "literal" {
        bail!("unsupported query language '{lang}' (expected 'glob' or 'literal')");
    }
    Ok(())
}
