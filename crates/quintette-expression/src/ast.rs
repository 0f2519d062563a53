//! Expression AST.
//!
//! An expression parses into a chain of nodes linked through `next`. A
//! trailing format spec wraps the whole chain in a terminal [`FormatNode`];
//! an escape-hatch expression is a single opaque [`ScriptNode`].

use crate::format::ValueFormatter;
use crate::instruction::InstructionDefinition;
use crate::schema::TypeDescriptor;
use crate::script::CompiledScript;
use std::fmt;
use std::sync::Arc;

/// Where the first link of a chain resolves its context value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionRoot {
	/// The walker's current scope object (loop element, template value,
	/// or the top-level slot record).
	Scope,
	/// The data container's slot record; set when the first token resolved
	/// through the slot-schema fallback.
	Slots,
}

/// A parsed expression: the chain plus its root binding.
#[derive(Debug, Clone)]
pub struct ParsedExpression {
	pub root: ExpressionRoot,
	pub node: ExprNode,
}

impl ParsedExpression {
	/// Declared type of the chain's terminal value, when one exists.
	pub fn result_type(&self) -> Option<&TypeDescriptor> {
		self.node.terminal_returns()
	}
}

/// One node of an expression chain.
#[derive(Clone)]
pub enum ExprNode {
	Property(PropertyNode),
	Instruction(InstructionNode),
	Format(FormatNode),
	Script(ScriptNode),
}

/// Declared-field access on the current context value.
#[derive(Clone)]
pub struct PropertyNode {
	pub source_type: String,
	pub name: String,
	pub returns: TypeDescriptor,
	pub next: Option<Box<ExprNode>>,
}

/// Custom instruction invocation on the current context value.
#[derive(Clone)]
pub struct InstructionNode {
	pub definition: InstructionDefinition,
	pub next: Option<Box<ExprNode>>,
}

/// Terminal format application to the wrapped operand chain.
#[derive(Clone)]
pub struct FormatNode {
	pub operand: Box<ExprNode>,
	pub format: String,
	/// Resolved at parse time for string-typed operands; `None` selects
	/// generic scalar formatting.
	pub formatter: Option<Arc<dyn ValueFormatter>>,
}

/// Opaque compiled escape-hatch expression.
#[derive(Clone)]
pub struct ScriptNode {
	pub source: String,
	pub artifact: Arc<dyn CompiledScript>,
}

impl ExprNode {
	/// Declared return type of this node alone. `None` for executors and
	/// scripts, whose results are untyped.
	pub fn returns(&self) -> Option<&TypeDescriptor> {
		match self {
			ExprNode::Property(p) => Some(&p.returns),
			ExprNode::Instruction(i) => i.definition.returns.as_ref(),
			ExprNode::Format(_) => None,
			ExprNode::Script(_) => None,
		}
	}

	/// Declared return type at the end of the chain starting here.
	pub fn terminal_returns(&self) -> Option<&TypeDescriptor> {
		match self {
			ExprNode::Property(p) => match &p.next {
				Some(next) => next.terminal_returns(),
				None => Some(&p.returns),
			},
			ExprNode::Instruction(i) => match &i.next {
				Some(next) => next.terminal_returns(),
				None => i.definition.returns.as_ref(),
			},
			ExprNode::Format(_) => None,
			ExprNode::Script(_) => None,
		}
	}

	pub(crate) fn next(&self) -> Option<&ExprNode> {
		match self {
			ExprNode::Property(p) => p.next.as_deref(),
			ExprNode::Instruction(i) => i.next.as_deref(),
			ExprNode::Format(_) | ExprNode::Script(_) => None,
		}
	}

	/// The display name of this link, used in diagnostics.
	pub fn link_name(&self) -> &str {
		match self {
			ExprNode::Property(p) => &p.name,
			ExprNode::Instruction(i) => &i.definition.name,
			ExprNode::Format(f) => &f.format,
			ExprNode::Script(_) => "@script",
		}
	}
}

impl fmt::Debug for ExprNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ExprNode::Property(p) => f
				.debug_struct("Property")
				.field("source_type", &p.source_type)
				.field("name", &p.name)
				.field("returns", &p.returns)
				.field("next", &p.next)
				.finish(),
			ExprNode::Instruction(i) => f
				.debug_struct("Instruction")
				.field("definition", &i.definition)
				.field("next", &i.next)
				.finish(),
			ExprNode::Format(node) => f
				.debug_struct("Format")
				.field("format", &node.format)
				.field("operand", &node.operand)
				.finish(),
			ExprNode::Script(s) => f.debug_struct("Script").field("source", &s.source).finish(),
		}
	}
}
