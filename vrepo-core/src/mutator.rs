//! Installs and removes mappings.

use std::path::Path;

use crate::children::recursive_children;
use crate::error::RepositoryError;
use crate::path_ops;
use crate::query::{self, QueryLanguage};
use crate::resource::AddResource;
use crate::store::KeyValueStore;
use crate::target::{self, Target};

/// Install `resource` at `vpath`, pushing it onto that path's target stack.
pub fn add(
    store: &mut dyn KeyValueStore,
    base_directory: &Path,
    vpath: &str,
    resource: AddResource,
) -> Result<(), RepositoryError> {
    let vpath = path_ops::sanitize(vpath)?;

    let target = match resource {
        AddResource::Filesystem(res) => {
            let relative = path_ops::make_relative_fs(&res.fs_path, base_directory);
            res.attach_to(&vpath);
            Target::FsPath(relative)
        }
        AddResource::Link(res) => {
            let target_vpath = path_ops::sanitize(&res.target_vpath)?;
            res.attach_to(&vpath);
            Target::Link(target_vpath)
        }
    };

    tracing::info!(vpath = %vpath, target = %target.encode(), "adding mapping");
    target::push(store, &vpath, &target);
    Ok(())
}

/// Remove every mapping matched by `query`, after verifying every match is a
/// direct store key (not a merely inherited or on-disk resource).
pub fn remove(
    store: &mut dyn KeyValueStore,
    base_directory: &Path,
    query: &str,
    max_link_depth: u8,
) -> Result<usize, RepositoryError> {
    if query.trim().is_empty() || path_ops::canonicalize(query) == "/" {
        return Err(RepositoryError::InvalidPath {
            path: query.to_string(),
            reason: "root mapping cannot be removed",
        });
    }

    let matches = query::find(
        store,
        base_directory,
        query,
        QueryLanguage::Glob,
        max_link_depth,
    )?;

    let mut non_mappings = Vec::new();
    let mut mappings = Vec::new();
    for (vpath, _) in matches {
        if store.exists(&vpath) {
            mappings.push(vpath);
        } else {
            non_mappings.push(vpath);
        }
    }

    if !non_mappings.is_empty() {
        let message = if non_mappings.len() == 1 {
            format!(
                "'{}' is not a mapping and cannot be removed",
                non_mappings[0]
            )
        } else {
            format!(
                "{} matched paths are not mappings and cannot be removed: {}",
                non_mappings.len(),
                non_mappings.join(", ")
            )
        };
        return Err(RepositoryError::UnsupportedOperation { message });
    }

    let mut removed = 0usize;
    for vpath in mappings {
        let descendants = recursive_children(store, base_directory, &vpath, max_link_depth)?;
        let mut descendant_keys: Vec<String> = descendants
            .into_keys()
            .filter(|k| store.exists(k))
            .collect();
        descendant_keys.sort_by(|a, b| b.len().cmp(&a.len()));

        for key in descendant_keys {
            if store.remove(&key) {
                removed += 1;
            }
        }

        tracing::info!(vpath = %vpath, "removing mapping");
        if store.remove(&vpath) {
            removed += 1;
        }
    }

    Ok(removed)
}
