//! Error taxonomy for the virtual resource repository.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the repository engine.
///
/// Every public operation documented in the repository facade returns one of
/// these variants; none are swallowed internally.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("resource not found: {path}")]
    ResourceNotFound { path: String },

    #[error("unsupported query language: '{language}' (expected 'glob' or 'literal')")]
    UnsupportedLanguage { language: String },

    /// Reserved for a resource kind that is neither a filesystem nor a link
    /// mapping. `AddResource` currently has exactly those two variants, so
    /// this is unreachable through `add` today; see DESIGN.md's Mutator
    /// entry.
    #[error("unsupported resource: {description}")]
    UnsupportedResource { description: &'static str },

    #[error("unsupported operation: {message}")]
    UnsupportedOperation { message: String },

    #[error("I/O error while {action} '{path}': {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize store contents: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unsupported_resource_formats_its_description() {
        let error = RepositoryError::UnsupportedResource {
            description: "directory collection",
        };
        assert_eq!(error.to_string(), "unsupported resource: directory collection");
    }
}
