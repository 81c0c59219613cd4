//! Public facade binding the engine's internal modules into the operations
//! described by the repository contract.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::children;
use crate::config::RepositoryConfig;
use crate::error::RepositoryError;
use crate::mutator;
use crate::path_ops;
use crate::query::{self, QueryLanguage};
use crate::resolver;
use crate::resource::{AddResource, Resource, ResourceFactory};
use crate::store::KeyValueStore;

/// A virtual resource repository bound to a [`KeyValueStore`] and a
/// [`RepositoryConfig`].
///
/// The repository borrows its store mutably for the duration of each
/// mutating call rather than owning it, so callers remain free to choose
/// how the store is shared or persisted.
pub struct Repository<'s> {
    store: &'s mut dyn KeyValueStore,
    config: RepositoryConfig,
}

impl<'s> Repository<'s> {
    pub fn new(store: &'s mut dyn KeyValueStore, config: RepositoryConfig) -> Self {
        let mut repo = Self { store, config };
        repo.ensure_root();
        repo
    }

    /// Anchor the tree by ensuring `/` is present, per §3's invariant.
    fn ensure_root(&mut self) {
        if !self.store.exists("/") {
            self.store.set("/", Vec::new());
        }
    }

    pub fn base_directory(&self) -> &Path {
        &self.config.base_directory
    }

    /// Resolve `path` to its first backing resource.
    pub fn get(&self, path: &str) -> Result<Resource, RepositoryError> {
        let vpath = path_ops::sanitize(path)?;
        let resolved = resolver::resolve(
            self.store,
            &self.config.base_directory,
            &vpath,
            true,
            self.config.max_link_depth,
        )?;
        match resolved.into_iter().next() {
            Some(fs_path) => Ok(ResourceFactory::create(fs_path.as_deref(), &vpath)),
            None => Err(RepositoryError::ResourceNotFound { path: vpath }),
        }
    }

    /// Evaluate `query` in `language` (default `glob`) and return every
    /// matching resource.
    pub fn find(&self, query: &str, language: &str) -> Result<Vec<Resource>, RepositoryError> {
        let lang = QueryLanguage::from_str(language)?;
        let matches = query::find(
            self.store,
            &self.config.base_directory,
            query,
            lang,
            self.config.max_link_depth,
        )?;
        Ok(matches
            .into_iter()
            .map(|(vpath, fs_path)| ResourceFactory::create(fs_path.as_deref(), &vpath))
            .collect())
    }

    pub fn contains(&self, query: &str, language: &str) -> Result<bool, RepositoryError> {
        let lang = QueryLanguage::from_str(language)?;
        query::contains(
            self.store,
            &self.config.base_directory,
            query,
            lang,
            self.config.max_link_depth,
        )
    }

    /// Direct children of `path`.
    pub fn list_children(&self, path: &str) -> Result<Vec<Resource>, RepositoryError> {
        let vpath = path_ops::sanitize(path)?;
        self.ensure_resolvable(&vpath)?;
        let map = children::direct_children(
            self.store,
            &self.config.base_directory,
            &vpath,
            self.config.max_link_depth,
        )?;
        Ok(map
            .into_iter()
            .map(|(child_vpath, fs_path)| ResourceFactory::create(fs_path.as_deref(), &child_vpath))
            .collect())
    }

    pub fn has_children(&self, path: &str) -> Result<bool, RepositoryError> {
        let vpath = path_ops::sanitize(path)?;
        self.ensure_resolvable(&vpath)?;
        children::has_children(
            self.store,
            &self.config.base_directory,
            &vpath,
            self.config.max_link_depth,
        )
    }

    fn ensure_resolvable(&self, vpath: &str) -> Result<(), RepositoryError> {
        let resolved = resolver::resolve(
            self.store,
            &self.config.base_directory,
            vpath,
            true,
            self.config.max_link_depth,
        )?;
        if resolved.is_empty() {
            return Err(RepositoryError::ResourceNotFound {
                path: vpath.to_string(),
            });
        }
        Ok(())
    }

    /// Install `resource` at `path`.
    pub fn add(&mut self, path: &str, resource: AddResource) -> Result<(), RepositoryError> {
        mutator::add(self.store, &self.config.base_directory, path, resource)
    }

    /// Convenience wrapper over [`Repository::add`] for a plain filesystem
    /// mapping.
    pub fn add_fs_path(&mut self, path: &str, fs_path: impl Into<PathBuf>) -> Result<(), RepositoryError> {
        use crate::resource::FilesystemResource;
        self.add(
            path,
            AddResource::Filesystem(FilesystemResource::new(fs_path)),
        )
    }

    /// Convenience wrapper over [`Repository::add`] for a link mapping.
    pub fn add_link(&mut self, path: &str, target_vpath: impl Into<String>) -> Result<(), RepositoryError> {
        use crate::resource::LinkResource;
        self.add(path, AddResource::Link(LinkResource::new(target_vpath)))
    }

    /// Remove every mapping matched by `query`, returning the count removed.
    pub fn remove(&mut self, query: &str) -> Result<usize, RepositoryError> {
        mutator::remove(
            self.store,
            &self.config.base_directory,
            query,
            self.config.max_link_depth,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn scenario_inheritance_and_override() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("app/config")).expect("mkdir");
        fs::write(dir.path().join("app/config/a.yml"), b"base").expect("write");
        fs::create_dir_all(dir.path().join("override")).expect("mkdir");
        fs::write(dir.path().join("override/a.yml"), b"over").expect("write");

        let mut store = MemoryStore::new();
        let mut repo = Repository::new(&mut store, RepositoryConfig::new(dir.path()));

        repo.add_fs_path("/app", dir.path().join("app")).expect("add");
        repo.add_fs_path("/app/config", dir.path().join("override"))
            .expect("add override");

        let resource = repo.get("/app/config/a.yml").expect("get");
        assert_eq!(
            resource.fs_path.unwrap(),
            dir.path().join("override/a.yml")
        );
    }

    #[test]
    fn scenario_link_resolves_through() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("fs/css")).expect("mkdir");
        fs::write(dir.path().join("fs/css/main.css"), b"body{}").expect("write");

        let mut store = MemoryStore::new();
        let mut repo = Repository::new(&mut store, RepositoryConfig::new(dir.path()));
        repo.add_fs_path("/app/css", dir.path().join("fs/css")).expect("add");
        repo.add_link("/link/x", "/app/css/main.css").expect("link");

        let resource = repo.get("/link/x").expect("get");
        assert_eq!(resource.fs_path.unwrap(), dir.path().join("fs/css/main.css"));
    }
}
