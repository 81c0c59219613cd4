//! Pure utilities over virtual path strings and filesystem paths.
//!
//! Virtual paths are always POSIX-style, `/`-separated strings, independent
//! of the host platform. Filesystem paths go through [`std::path::Path`] as
//! usual.

use std::path::{Path, PathBuf};

use crate::error::RepositoryError;

/// True iff `p` starts with `/`.
pub fn is_absolute(p: &str) -> bool {
    p.starts_with('/')
}

/// Lexically normalize a POSIX-style path: resolve `.`/`..`, collapse
/// duplicate slashes, and drop any trailing slash except for the root.
pub fn canonicalize(p: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in p.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    if stack.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", stack.join("/"))
    }
}

/// Validate and canonicalize a virtual path argument.
///
/// Fails with [`RepositoryError::InvalidPath`] if `p` is empty or not
/// absolute. Every public repository operation sanitizes its path inputs
/// through this function.
pub fn sanitize(p: &str) -> Result<String, RepositoryError> {
    if p.trim().is_empty() {
        return Err(RepositoryError::InvalidPath {
            path: p.to_string(),
            reason: "path must not be empty",
        });
    }
    if !is_absolute(p) {
        return Err(RepositoryError::InvalidPath {
            path: p.to_string(),
            reason: "path must be absolute",
        });
    }
    Ok(canonicalize(p))
}

/// True iff `prefix == path`, or `path` begins with `prefix` followed by `/`.
///
/// Both arguments are assumed already canonical.
pub fn is_base_path(prefix: &str, path: &str) -> bool {
    if prefix == path {
        return true;
    }
    if prefix == "/" {
        return path.starts_with('/');
    }
    path.starts_with(prefix) && path[prefix.len()..].starts_with('/')
}

/// The portion of `path` after `base` and its separating slash.
///
/// `base` must be a proper ancestor of `path` per [`is_base_path`].
pub fn make_relative(path: &str, base: &str) -> String {
    let with_slash = if base == "/" {
        "/".to_string()
    } else {
        format!("{base}/")
    };
    path.strip_prefix(&with_slash).unwrap_or(path).to_string()
}

/// Express `path` as a `/`-separated string relative to `base`, falling back
/// to the absolute path if `path` does not live under `base`.
pub fn make_relative_fs(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
        Err(_) => path.to_string_lossy().replace('\\', "/"),
    }
}

/// Join a `base_directory` with a relative filesystem path string.
pub fn join_fs(base: &Path, rel: &str) -> PathBuf {
    if rel.is_empty() {
        base.to_path_buf()
    } else {
        base.join(rel)
    }
}

/// Append a virtual-path suffix (e.g. `/x/y.txt`) onto a resolved filesystem
/// path.
pub fn append_fs(path: &Path, suffix: &str) -> PathBuf {
    let trimmed = suffix.trim_start_matches('/');
    if trimmed.is_empty() {
        path.to_path_buf()
    } else {
        path.join(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonicalize_collapses_dot_segments() {
        assert_eq!(canonicalize("/a/./b/../c"), "/a/c");
        assert_eq!(canonicalize("/a//b"), "/a/b");
        assert_eq!(canonicalize("/"), "/");
        assert_eq!(canonicalize("/a/"), "/a");
    }

    #[test]
    fn canonicalize_never_escapes_root() {
        assert_eq!(canonicalize("/../.."), "/");
    }

    #[test]
    fn sanitize_rejects_empty_and_relative() {
        assert!(sanitize("").is_err());
        assert!(sanitize("relative/path").is_err());
        assert_eq!(sanitize("/a/../b").unwrap(), "/b");
    }

    #[test]
    fn is_base_path_requires_segment_boundary() {
        assert!(is_base_path("/a", "/a"));
        assert!(is_base_path("/a", "/a/b"));
        assert!(!is_base_path("/a", "/ab"));
        assert!(is_base_path("/", "/anything/here"));
    }

    #[test]
    fn make_relative_strips_base_and_slash() {
        assert_eq!(make_relative("/a/b/c.txt", "/a"), "b/c.txt");
        assert_eq!(make_relative("/b/c.txt", "/"), "b/c.txt");
    }
}
