//! Catalog load errors

use thiserror::Error;

/// Errors raised while building an [`crate::AssetCatalog`]
///
/// Every variant represents a content-authoring mistake; none of them are
/// recoverable at runtime, so loaders surface them immediately instead of
/// constructing a partially valid catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read a definition document
    #[error("failed to read definition file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Document did not parse as the expected schema
    #[error("failed to parse definition file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A definition block is missing its required name
    #[error("definition in {path} is missing a name")]
    MissingName { path: String },

    /// Two definitions share the same name
    #[error("duplicate {kind} definition \"{name}\"")]
    Duplicate { kind: &'static str, name: String },

    /// A definition references another definition that does not exist
    #[error("{referenced_by} references unknown {kind} \"{referent}\"")]
    UnknownDefinition {
        kind: &'static str,
        referent: String,
        referenced_by: String,
    },

    /// A field value fails validation beyond what the schema expresses
    #[error("invalid field in {definition}: {message}")]
    InvalidField {
        definition: String,
        message: String,
    },
}
