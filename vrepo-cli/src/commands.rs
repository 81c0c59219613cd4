//! Subcommand handlers. Each opens a [`FileStore`] rooted at the resolved
//! config, runs one [`vrepo_core::Repository`] operation, and reports the
//! result on stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use vrepo_core::{FileStore, Repository, RepositoryConfig};

use crate::{require_lang, resource_from_args, Command};

pub fn run(command: Command, config: RepositoryConfig, store_path: PathBuf) -> Result<()> {
    tracing::debug!(store_path = %store_path.display(), "opening store");
    let mut store = FileStore::open(&store_path)
        .with_context(|| format!("opening store at {}", store_path.display()))?;
    let mut repo = Repository::new(&mut store, config);

    match command {
        Command::Add { vpath, target, link } => {
            tracing::info!(vpath = %vpath, target = %target, link, "handling add command");
            repo.add(&vpath, resource_from_args(target, link))
                .with_context(|| format!("adding mapping at {vpath}"))?;
            println!("mapped {vpath}");
        }
        Command::Get { vpath } => {
            let resource = repo
                .get(&vpath)
                .with_context(|| format!("resolving {vpath}"))?;
            match resource.fs_path {
                Some(fs_path) => println!("{}", fs_path.display()),
                None => println!("{vpath} (no backing file)"),
            }
        }
        Command::Find { query, lang } => {
            require_lang(&lang)?;
            let matches = repo
                .find(&query, &lang)
                .with_context(|| format!("evaluating query {query}"))?;
            for resource in matches {
                println!("{}", resource.virtual_path);
            }
        }
        Command::ListChildren { vpath, recursive } => {
            let children = if recursive {
                recursive_children(&repo, &vpath)?
            } else {
                repo.list_children(&vpath)
                    .with_context(|| format!("listing children of {vpath}"))?
            };
            for child in children {
                println!("{}", child.virtual_path);
            }
        }
        Command::HasChildren { vpath } => {
            let has = repo
                .has_children(&vpath)
                .with_context(|| format!("checking children of {vpath}"))?;
            println!("{has}");
        }
        Command::Remove { query } => {
            tracing::info!(query = %query, "handling remove command");
            let removed = repo
                .remove(&query)
                .with_context(|| format!("removing {query}"))?;
            println!("removed {removed} mapping(s)");
        }
    }

    Ok(())
}

fn recursive_children(
    repo: &Repository<'_>,
    vpath: &str,
) -> Result<Vec<vrepo_core::Resource>> {
    let pattern = if vpath == "/" {
        "/**/*".to_string()
    } else {
        format!("{vpath}/**/*")
    };
    repo.find(&pattern, "glob")
        .with_context(|| format!("listing recursive children of {vpath}"))
}
