//! Evaluates literal or glob queries against the fused virtual/physical
//! namespace.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::children::{recursive_children, ChildMap};
use crate::error::RepositoryError;
use crate::glob_ops;
use crate::resolver;
use crate::store::KeyValueStore;

/// Query languages accepted by [`find`]/[`contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryLanguage {
    Literal,
    Glob,
}

impl FromStr for QueryLanguage {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "literal" => Ok(QueryLanguage::Literal),
            "glob" => Ok(QueryLanguage::Glob),
            other => Err(RepositoryError::UnsupportedLanguage {
                language: other.to_string(),
            }),
        }
    }
}

/// Evaluate `query` and return every matching `(virtual_path, fs_path)` pair,
/// sorted lexicographically by virtual path.
pub fn find(
    store: &dyn KeyValueStore,
    base_directory: &Path,
    query: &str,
    language: QueryLanguage,
    max_link_depth: u8,
) -> Result<Vec<(String, Option<PathBuf>)>, RepositoryError> {
    match language {
        QueryLanguage::Literal => {
            let resolved = resolver::resolve(store, base_directory, query, true, max_link_depth)?;
            match resolved.into_iter().next() {
                Some(fs_path) => Ok(vec![(query.to_string(), fs_path)]),
                None => Ok(Vec::new()),
            }
        }
        QueryLanguage::Glob => find_glob(store, base_directory, query, max_link_depth),
    }
}

fn find_glob(
    store: &dyn KeyValueStore,
    base_directory: &Path,
    pattern: &str,
    max_link_depth: u8,
) -> Result<Vec<(String, Option<PathBuf>)>, RepositoryError> {
    if !glob_ops::is_dynamic(pattern) {
        return find(
            store,
            base_directory,
            pattern,
            QueryLanguage::Literal,
            max_link_depth,
        );
    }

    let base = glob_ops::static_prefix(pattern);
    let children: ChildMap = recursive_children(store, base_directory, &base, max_link_depth)?;

    let mut matches = Vec::new();
    for (vpath, fs_path) in children {
        if glob_ops::glob_match(&vpath, pattern)? {
            matches.push((vpath, fs_path));
        }
    }
    matches.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(matches)
}

/// True iff `query` matches at least one resource.
pub fn contains(
    store: &dyn KeyValueStore,
    base_directory: &Path,
    query: &str,
    language: QueryLanguage,
    max_link_depth: u8,
) -> Result<bool, RepositoryError> {
    Ok(!find(store, base_directory, query, language, max_link_depth)?.is_empty())
}
