//! Error types for quintette-expression.

use thiserror::Error;

/// Errors raised while parsing or evaluating an expression.
///
/// Every error is fatal to the expression it was raised for: callers abort
/// the surrounding render pass instead of degrading output.
#[derive(Debug, Error)]
pub enum ExpressionError {
	/// A token appeared where the grammar expects a separator or the end of input
	#[error("unexpected token at position {position} in \"{expression}\"")]
	UnexpectedToken { expression: String, position: usize },

	/// The expression ended right after a `.` or `:` separator
	#[error("expression \"{expression}\" ends prematurely at position {position}")]
	PrematureEnd { expression: String, position: usize },

	/// A name resolved neither to an instruction nor to a declared field
	#[error("\"{name}\" does not resolve on type {type_name} (position {position})")]
	UnresolvedName {
		name: String,
		type_name: String,
		position: usize,
	},

	/// No registered formatter accepts the format name for the operand type
	#[error("no formatter accepts \"{format}\" for type {type_name} (position {position})")]
	UnsupportedFormat {
		format: String,
		type_name: String,
		position: usize,
	},

	/// Tokens followed a format spec, which must terminate the expression
	#[error("tokens after format spec \"{format}\" at position {position}")]
	TrailingTokens { format: String, position: usize },

	/// A side-effecting instruction was chained into a non-terminal position
	#[error("executor instruction \"{name}\" must terminate the chain")]
	ExecutorMidChain { name: String },

	/// A side-effecting instruction ran while the evaluation mode denies mutation
	#[error("executor instruction \"{name}\" invoked while mutation is denied")]
	MutationDenied { name: String },

	/// Internal consistency failure: the runtime context does not match the
	/// source type the AST node was resolved against
	#[error("context value of type {actual} does not match declared source type {declared}")]
	SourceTypeMismatch { declared: String, actual: String },

	/// A non-terminal chain link produced more than one value
	#[error(
		"intermediate link \"{name}\" produced {count} values; only the terminal \
		 position may fan out (use a script expression instead)"
	)]
	AmbiguousChain { name: String, count: usize },

	/// An escape-hatch expression was parsed but no script compiler is configured
	#[error("script compiler is not configured")]
	ScriptCompilerUnavailable,

	/// The script compiler rejected the source
	#[error("script compilation failed: {0}")]
	ScriptCompile(String),

	/// A compiled script failed at invocation time
	#[error("script invocation failed: {0}")]
	ScriptInvoke(String),

	/// A registered formatter failed on a value it claimed to support
	#[error("formatter \"{format}\" failed: {reason}")]
	FormatFailed { format: String, reason: String },

	/// A JSON value could not be bridged into the declared type
	#[error("cannot convert JSON {found} into {expected}")]
	JsonConversion { expected: String, found: String },
}

/// Result type alias for expression operations.
pub type ExpressionResult<T> = Result<T, ExpressionError>;
