//! Target encoding and the per-virtual-path target stack.

use crate::store::KeyValueStore;

const LINK_PREFIX: &str = "l:";

/// A resolution edge from a virtual path to either a relative filesystem
/// path or another virtual path (a link).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A filesystem path relative to the repository's `base_directory`.
    FsPath(String),
    /// An absolute virtual path to resolve as a second hop.
    Link(String),
}

impl Target {
    /// Encode this target into the KV store's string representation.
    pub fn encode(&self) -> String {
        match self {
            Target::FsPath(path) => path.clone(),
            Target::Link(vpath) => format!("{LINK_PREFIX}{vpath}"),
        }
    }

    /// Decode a single raw string from the KV store into a [`Target`].
    pub fn decode(raw: &str) -> Target {
        match raw.strip_prefix(LINK_PREFIX) {
            Some(vpath) => Target::Link(vpath.to_string()),
            None => Target::FsPath(raw.to_string()),
        }
    }
}

/// Decode a raw stack of strings (most-recent-first) into [`Target`]s.
pub fn decode_stack(raw: &[String]) -> Vec<Target> {
    raw.iter().map(|s| Target::decode(s)).collect()
}

/// Push `target` onto the stack at `vpath`, inserting at the front unless an
/// identical entry is already present. Never removes or reorders existing
/// entries.
pub fn push(store: &mut dyn KeyValueStore, vpath: &str, target: &Target) {
    let mut raw = store.get(vpath).unwrap_or_default();
    let encoded = target.encode();
    if raw.contains(&encoded) {
        return;
    }
    raw.insert(0, encoded);
    tracing::debug!(vpath, "pushed target onto stack");
    store.set(vpath, raw);
}
