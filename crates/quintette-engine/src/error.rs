//! Error types for quintette-engine.
//!
//! Every error aborts the current render pass and bubbles to the
//! top-level caller. A malformed template or a mismatched binding is a
//! development-time defect, not a runtime data condition, so nothing is
//! retried or silently downgraded.

use quintette_dom::DomError;
use quintette_expression::ExpressionError;
use thiserror::Error;

/// Errors raised while rendering a template tree.
#[derive(Debug, Error)]
pub enum RenderError {
	/// Expression parse or evaluation failure
	#[error(transparent)]
	Expression(#[from] ExpressionError),

	/// Structural tree operation failure
	#[error(transparent)]
	Dom(#[from] DomError),

	/// Internal consistency failure: a node was dispatched twice in one pass
	#[error("node <{name}> dispatched twice in one pass")]
	NodeRevisited { name: String },

	/// A directive node has no parent to splice expansion results into
	#[error("node <{name}> has no parent to splice into")]
	MissingParent { name: String },

	/// A value-template reference named an id no declaration registered
	#[error("unknown inline template id \"{id}\"")]
	UnknownTemplate { id: String },

	/// Two inline templates declared the same id
	#[error("inline template id \"{id}\" declared more than once")]
	DuplicateTemplate { id: String },

	/// A reserved scoped slot was already bound; raised when a `foreach`
	/// nests inside another `foreach`
	#[error("reserved slot \"{name}\" is already bound (nested foreach is not supported)")]
	ReservedSlotInUse { name: String },

	/// Required slot lookup failed
	#[error("slot \"{name}\" is not registered")]
	MissingSlot { name: String },

	/// A slot name was registered twice
	#[error("slot \"{name}\" is already registered")]
	DuplicateSlot { name: String },

	/// Lookup by type matched several slots
	#[error("{count} slots of type {type_name} registered; lookup by type requires exactly one")]
	AmbiguousTypeLookup { type_name: String, count: usize },

	/// A foreach expression produced something other than a sequence
	#[error("foreach expression \"{expression}\" must produce a sequence")]
	NotASequence { expression: String },

	/// A condition expression produced something other than a single boolean
	#[error("condition expression \"{expression}\" must produce a boolean, got {found}")]
	NotABoolean { expression: String, found: String },

	/// A value-template reference carries no value expression
	#[error("node <{name}> references a value template but carries no value expression")]
	MissingValueExpression { name: String },

	/// A value-template value expression fanned out
	#[error("value template \"{id}\" expects one bound value, got {count}")]
	AmbiguousTemplateValue { id: String, count: usize },

	/// Bound nodes no visitor claimed, surfaced only on request at the
	/// end of a pass
	#[error("{count} bound node(s) were not claimed by any visitor: {nodes}")]
	UnhandledDirective { count: usize, nodes: String },
}

/// Result type alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
