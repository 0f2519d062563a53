//! Error types for quintette-dom.

use thiserror::Error;

/// Errors from structural tree operations.
#[derive(Debug, Error)]
pub enum DomError {
	/// The anchor node is not a child of the node being spliced into
	#[error("node <{anchor}> is not a child of <{parent}>")]
	NotAChild { parent: String, anchor: String },
}

/// Result type alias for tree operations.
pub type DomResult<T> = Result<T, DomError>;
