//! Error types for node tree operations
//!
//! Simple, flat error hierarchy. Every failure is a caller error and is
//! reported before the tree is touched.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NodeError>;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Ambiguous match: {count} children named '{name}' where one was expected")]
    AmbiguousMatch { name: String, count: usize },

    #[error("Snapshot parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl NodeError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        NodeError::InvalidArgument(msg.into())
    }
}

/// Check a node name: non-empty and free of whitespace.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(NodeError::invalid("node name must not be empty"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(NodeError::invalid(format!(
            "node name must not contain whitespace: '{}'",
            name
        )));
    }
    Ok(())
}
