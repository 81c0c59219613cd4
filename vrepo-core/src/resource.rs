//! The resource hierarchy consumed/produced by the repository facade.
//!
//! The core treats resources as opaque values constructed by
//! [`ResourceFactory`]; it never inspects their contents beyond the
//! virtual/filesystem path pair. `FilesystemResource` and `LinkResource` are
//! what callers pass into [`crate::mutator::add`].

use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// A resource backed by a concrete filesystem path.
#[derive(Debug)]
pub struct FilesystemResource {
    pub fs_path: PathBuf,
    attached_vpath: RefCell<Option<String>>,
}

impl FilesystemResource {
    pub fn new(fs_path: impl Into<PathBuf>) -> Self {
        Self {
            fs_path: fs_path.into(),
            attached_vpath: RefCell::new(None),
        }
    }

    /// Record the virtual path this resource was mounted at.
    ///
    /// This is a documented no-op hook rather than a real repository
    /// back-reference: the core only ever receives leaf resources (the
    /// recursive collection-add of directory trees is supplied by an
    /// external resource hierarchy out of scope for this crate), so there
    /// is nothing here that needs to extend the repository's lifetime.
    pub fn attach_to(&self, vpath: &str) {
        *self.attached_vpath.borrow_mut() = Some(vpath.to_string());
    }

    pub fn attached_vpath(&self) -> Option<String> {
        self.attached_vpath.borrow().clone()
    }
}

/// A resource that is an alias to another virtual path.
#[derive(Debug)]
pub struct LinkResource {
    pub target_vpath: String,
    attached_vpath: RefCell<Option<String>>,
}

impl LinkResource {
    pub fn new(target_vpath: impl Into<String>) -> Self {
        Self {
            target_vpath: target_vpath.into(),
            attached_vpath: RefCell::new(None),
        }
    }

    pub fn attach_to(&self, vpath: &str) {
        *self.attached_vpath.borrow_mut() = Some(vpath.to_string());
    }

    pub fn attached_vpath(&self) -> Option<String> {
        self.attached_vpath.borrow().clone()
    }
}

/// The resource kinds `Mutator::add` accepts.
#[derive(Debug)]
pub enum AddResource {
    Filesystem(FilesystemResource),
    Link(LinkResource),
}

/// An opaque resource returned from `get`/`find`/`listChildren`.
///
/// `fs_path` is `None` for a known-virtual entry with no backing file (an
/// empty target stack, or a link chain that bottoms out without resolving).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub virtual_path: String,
    pub fs_path: Option<PathBuf>,
}

/// Builds [`Resource`] values. The core calls this rather than constructing
/// `Resource` directly, matching the external `ResourceFactory` contract of
/// §6 (kept in-crate here since this repository does not depend on a
/// separate concrete-resource collaborator).
pub struct ResourceFactory;

impl ResourceFactory {
    pub fn create(fs_path: Option<&Path>, vpath: &str) -> Resource {
        Resource {
            virtual_path: vpath.to_string(),
            fs_path: fs_path.map(Path::to_path_buf),
        }
    }
}
