//! Error types for SmartSearch.
//!
//! Provider failures are recovered by the controller (shown as a generic
//! message); configuration errors are returned to the host that supplied the
//! configuration.

use thiserror::Error;

use crate::types::ComponentType;

/// Failure reported by a [`crate::provider::SearchProvider`].
///
/// The controller only cares that a query failed; the text is logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The backing service could not be reached.
    #[error("search provider unavailable: {0}")]
    Unavailable(String),

    /// The backing service answered with an error.
    #[error("search provider failed: {0}")]
    Failed(String),
}

/// Invalid filter configuration handed to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("duplicate filter id '{0}'")]
    DuplicateFilterId(String),

    #[error("dropdown filter '{0}' has no options")]
    MissingOptions(String),

    #[error("default value of filter '{filter_id}' does not fit a {component_type} control")]
    DefaultKindMismatch { filter_id: String, component_type: ComponentType },
}
