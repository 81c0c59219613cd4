//! Resolves a virtual path to an ordered list of filesystem paths.

use std::path::{Path, PathBuf};

use crate::error::RepositoryError;
use crate::path_ops;
use crate::store::KeyValueStore;
use crate::target::{self, Target};

/// Resolve `vpath` against `store`, optionally stopping at the first
/// result. See §4.3 for the two-stage (exact-hit / ancestor-walk)
/// algorithm.
pub fn resolve(
    store: &dyn KeyValueStore,
    base_directory: &Path,
    vpath: &str,
    only_first: bool,
    max_link_depth: u8,
) -> Result<Vec<Option<PathBuf>>, RepositoryError> {
    resolve_at_depth(store, base_directory, vpath, only_first, max_link_depth, 0)
}

fn resolve_at_depth(
    store: &dyn KeyValueStore,
    base_directory: &Path,
    vpath: &str,
    only_first: bool,
    max_link_depth: u8,
    depth: u8,
) -> Result<Vec<Option<PathBuf>>, RepositoryError> {
    if depth > max_link_depth {
        return Err(RepositoryError::ResourceNotFound {
            path: vpath.to_string(),
        });
    }

    if store.exists(vpath) {
        return resolve_exact(store, base_directory, vpath, only_first, max_link_depth, depth);
    }

    resolve_ancestors(store, base_directory, vpath, only_first)
}

fn resolve_exact(
    store: &dyn KeyValueStore,
    base_directory: &Path,
    vpath: &str,
    only_first: bool,
    max_link_depth: u8,
    depth: u8,
) -> Result<Vec<Option<PathBuf>>, RepositoryError> {
    let raw = store.get(vpath).unwrap_or_default();
    let mut targets = target::decode_stack(&raw);
    if only_first {
        targets.truncate(1);
    }
    if targets.is_empty() {
        return Ok(vec![None]);
    }

    let mut results = Vec::new();
    for t in targets {
        match t {
            Target::FsPath(rel) => {
                results.push(Some(path_ops::join_fs(base_directory, &rel)));
            }
            Target::Link(target_vpath) => {
                let inner = resolve_at_depth(
                    store,
                    base_directory,
                    &target_vpath,
                    only_first,
                    max_link_depth,
                    depth + 1,
                )?;
                results.extend(inner);
            }
        }
        if only_first {
            break;
        }
    }
    Ok(results)
}

/// Walk ancestor mappings in descending-key-length order (ties broken
/// lexicographically) so more specific mappings shadow shallower ones — see
/// §9's resolution of the "reverse-key ancestor order" design note.
fn resolve_ancestors(
    store: &dyn KeyValueStore,
    base_directory: &Path,
    vpath: &str,
    only_first: bool,
) -> Result<Vec<Option<PathBuf>>, RepositoryError> {
    let mut keys = store.keys();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut results = Vec::new();
    for key in keys {
        if !path_ops::is_base_path(&key, vpath) {
            continue;
        }
        let with_slash = if key == "/" {
            "/".to_string()
        } else {
            format!("{key}/")
        };
        let suffix = &vpath[with_slash.len()..];

        let raw = store.get(&key).unwrap_or_default();
        for t in target::decode_stack(&raw) {
            match t {
                Target::FsPath(rel) => {
                    let base = path_ops::join_fs(base_directory, &rel);
                    let candidate = path_ops::append_fs(&base, suffix);
                    if candidate.exists() {
                        results.push(Some(candidate));
                        if only_first {
                            return Ok(results);
                        }
                    }
                }
                Target::Link(target_vpath) => {
                    // Preserved quirk (§9): the link's target string is
                    // appended as-is, without existence-checking or a
                    // further resolution hop, mirroring legacy behavior.
                    tracing::debug!(
                        ancestor = %key,
                        link_target = %target_vpath,
                        "ancestor link target appended without existence check"
                    );
                    results.push(Some(PathBuf::from(target_vpath)));
                    if only_first {
                        return Ok(results);
                    }
                }
            }
        }
    }
    Ok(results)
}
