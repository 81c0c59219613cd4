//! Fuses on-disk directory listings with virtual key-value mappings to
//! enumerate a virtual path's children.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::RepositoryError;
use crate::resolver;
use crate::store::KeyValueStore;

/// Direct or recursive, children are always returned as a deterministic
/// `virtual_path -> resolved_fs_path` map (`None` for a known-virtual entry
/// with no backing file).
pub type ChildMap = BTreeMap<String, Option<PathBuf>>;

/// Direct children of `vpath`: on-disk entries one level deep under every
/// resolved fs path, overridden by any store key that is an immediate child
/// of `vpath`.
pub fn direct_children(
    store: &dyn KeyValueStore,
    base_directory: &Path,
    vpath: &str,
    max_link_depth: u8,
) -> Result<ChildMap, RepositoryError> {
    enumerate(store, base_directory, vpath, max_link_depth, false)
}

/// Recursive children of `vpath`: as [`direct_children`] but descending into
/// every on-disk directory and every virtual child that is itself a
/// directory.
pub fn recursive_children(
    store: &dyn KeyValueStore,
    base_directory: &Path,
    vpath: &str,
    max_link_depth: u8,
) -> Result<ChildMap, RepositoryError> {
    enumerate(store, base_directory, vpath, max_link_depth, true)
}

/// Short-circuiting form of [`direct_children`]: true as soon as any child is
/// found, without materializing the full map.
pub fn has_children(
    store: &dyn KeyValueStore,
    base_directory: &Path,
    vpath: &str,
    max_link_depth: u8,
) -> Result<bool, RepositoryError> {
    Ok(!direct_children(store, base_directory, vpath, max_link_depth)?.is_empty())
}

fn enumerate(
    store: &dyn KeyValueStore,
    base_directory: &Path,
    vpath: &str,
    max_link_depth: u8,
    recursive: bool,
) -> Result<ChildMap, RepositoryError> {
    let mut out = ChildMap::new();
    enumerate_into(store, base_directory, vpath, max_link_depth, recursive, &mut out)?;
    Ok(out)
}

fn enumerate_into(
    store: &dyn KeyValueStore,
    base_directory: &Path,
    vpath: &str,
    max_link_depth: u8,
    recursive: bool,
    out: &mut ChildMap,
) -> Result<(), RepositoryError> {
    // Step 1: on-disk children of every resolved fs path for vpath.
    let resolved = resolver::resolve(store, base_directory, vpath, false, max_link_depth)?;
    for fs_path in resolved.into_iter().flatten() {
        if fs_path.is_dir() {
            list_disk_children(&fs_path, vpath, recursive, out)?;
        }
    }

    // Step 2: virtual children override on-disk children with the same path.
    let prefix = if vpath == "/" {
        "/".to_string()
    } else {
        format!("{vpath}/")
    };
    let mut keys = store.keys();
    keys.sort();
    for key in keys {
        if key == vpath || !key.starts_with(&prefix) {
            continue;
        }
        let rest = &key[prefix.len()..];
        if !recursive && rest.contains('/') {
            continue;
        }
        let targets = resolver::resolve(store, base_directory, &key, false, max_link_depth)?;
        let fs_path = targets.into_iter().flatten().next();
        out.insert(key.clone(), fs_path);

        if recursive {
            enumerate_into(store, base_directory, &key, max_link_depth, recursive, out)?;
        }
    }

    Ok(())
}

fn list_disk_children(
    fs_dir: &Path,
    vpath: &str,
    recursive: bool,
    out: &mut ChildMap,
) -> Result<(), RepositoryError> {
    if !recursive {
        let mut entries: Vec<PathBuf> = fs::read_dir(fs_dir)
            .map_err(|source| RepositoryError::Io {
                action: "reading directory",
                path: fs_dir.to_path_buf(),
                source,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        entries.sort();

        for entry in entries {
            out.insert(child_vpath(vpath, fs_dir, &entry), Some(entry));
        }
        return Ok(());
    }

    // The underlying filesystem iterator offers no ordering guarantee (§4.4
    // step 5), so entries are sorted before insertion into the BTreeMap.
    let mut entries: Vec<PathBuf> = WalkDir::new(fs_dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok().map(|e| e.into_path()))
        .collect();
    entries.sort();

    for entry in entries {
        out.insert(child_vpath(vpath, fs_dir, &entry), Some(entry));
    }
    Ok(())
}

fn child_vpath(base_vpath: &str, base_fs: &Path, entry: &Path) -> String {
    let relative = entry
        .strip_prefix(base_fs)
        .unwrap_or(entry)
        .to_string_lossy()
        .replace('\\', "/");
    if base_vpath == "/" {
        format!("/{relative}")
    } else {
        format!("{base_vpath}/{relative}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::target::{self, Target};
    use pretty_assertions::assert_eq;

    #[test]
    fn direct_children_fuses_disk_and_virtual() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("css")).expect("mkdir");
        fs::write(dir.path().join("css/main.css"), b"body{}").expect("write");

        let mut store = MemoryStore::new();
        target::push(&mut store, "/app/css", &Target::FsPath("css".to_string()));

        let children = direct_children(&store, dir.path(), "/app/css", 32).expect("children");
        assert_eq!(children.len(), 1);
        assert_eq!(
            children.get("/app/css/main.css").unwrap().as_ref().unwrap(),
            &dir.path().join("css/main.css")
        );
    }

    #[test]
    fn virtual_child_overrides_disk_child() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("app/config")).expect("mkdir");
        fs::write(dir.path().join("app/config/a.yml"), b"x: 1").expect("write");
        fs::create_dir_all(dir.path().join("override")).expect("mkdir");
        fs::write(dir.path().join("override/a.yml"), b"x: 2").expect("write");

        let mut store = MemoryStore::new();
        target::push(&mut store, "/app", &Target::FsPath("app".to_string()));
        target::push(&mut store, "/app/config", &Target::FsPath("override".to_string()));

        let children = direct_children(&store, dir.path(), "/app", 32).expect("children");
        assert_eq!(
            children.get("/app/config").unwrap().as_ref().unwrap(),
            &dir.path().join("override")
        );
    }
}
