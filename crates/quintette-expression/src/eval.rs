//! AST evaluator.
//!
//! Walks a parsed chain against a starting context value and produces an
//! ordered sequence of result values. Fan-out is legal only at the terminal
//! position: a non-terminal link producing more than one value is a fatal
//! error, and a null intermediate short-circuits the rest of the chain to a
//! single null result.

use crate::ast::ExprNode;
use crate::error::{ExpressionError, ExpressionResult};
use crate::format::format_scalar;
use crate::instruction::InstructionKind;
use crate::schema::{SchemaRegistry, TypeDescriptor};
use crate::script::SlotAccess;
use crate::value::Value;

/// Explicit evaluation state passed by reference through the recursion.
pub struct EvalContext<'a> {
	/// Whether side-effecting executor instructions may run.
	pub mutation_allowed: bool,
	/// Slot access for script invocation; scripts fail without it.
	pub slots: Option<&'a dyn SlotAccess>,
}

impl<'a> EvalContext<'a> {
	pub fn new(mutation_allowed: bool) -> Self {
		Self {
			mutation_allowed,
			slots: None,
		}
	}

	pub fn with_slots(mut self, slots: &'a dyn SlotAccess) -> Self {
		self.slots = Some(slots);
		self
	}
}

/// Evaluates expression chains against runtime values.
pub struct Evaluator<'a> {
	schema: &'a SchemaRegistry,
}

impl<'a> Evaluator<'a> {
	pub fn new(schema: &'a SchemaRegistry) -> Self {
		Self { schema }
	}

	/// Evaluate a chain, producing zero or more result values.
	pub fn evaluate(
		&self,
		node: &ExprNode,
		context: &Value,
		ctx: &EvalContext<'_>,
	) -> ExpressionResult<Vec<Value>> {
		match node {
			ExprNode::Script(script) => {
				let slots = ctx.slots.ok_or_else(|| {
					ExpressionError::ScriptInvoke("no data container bound".to_string())
				})?;
				let result = script.artifact.invoke(slots)?;
				// Enumerable results flatten; everything else is one value.
				Ok(match result {
					Value::List(items) => items,
					other => vec![other],
				})
			}
			ExprNode::Property(property) => {
				if context.is_null() {
					return Ok(vec![Value::Null]);
				}
				self.check_source(&property.source_type, context)?;
				let value = match context {
					Value::Record(record) => {
						record.get(&property.name).cloned().unwrap_or(Value::Null)
					}
					_ => Value::Null,
				};
				let candidates = expand_candidates(value, &property.returns);
				self.continue_chain(candidates, property.next.as_deref(), &property.name, ctx)
			}
			ExprNode::Instruction(instruction) => {
				if context.is_null() {
					return Ok(vec![Value::Null]);
				}
				let definition = &instruction.definition;
				self.check_source(&definition.source_type, context)?;
				match &definition.kind {
					InstructionKind::Value(getter) => {
						let value = getter(context)?;
						let candidates = match &definition.returns {
							Some(returns) => expand_candidates(value, returns),
							None => vec![value],
						};
						self.continue_chain(
							candidates,
							instruction.next.as_deref(),
							&definition.name,
							ctx,
						)
					}
					InstructionKind::List(getter) => {
						let candidates = getter(context)?;
						self.continue_chain(
							candidates,
							instruction.next.as_deref(),
							&definition.name,
							ctx,
						)
					}
					InstructionKind::Execute(executor) => {
						if instruction.next.is_some() {
							return Err(ExpressionError::ExecutorMidChain {
								name: definition.name.clone(),
							});
						}
						if !ctx.mutation_allowed {
							return Err(ExpressionError::MutationDenied {
								name: definition.name.clone(),
							});
						}
						executor(context)?;
						Ok(Vec::new())
					}
				}
			}
			ExprNode::Format(format) => {
				let mut operand = self.evaluate(&format.operand, context, ctx)?;
				if operand.len() > 1 {
					return Err(ExpressionError::AmbiguousChain {
						name: format.format.clone(),
						count: operand.len(),
					});
				}
				let Some(value) = operand.pop() else {
					return Ok(Vec::new());
				};
				if value.is_null() {
					return Ok(vec![Value::Null]);
				}
				let text = match &format.formatter {
					Some(formatter) => formatter.format(&format.format, &value)?,
					None => format_scalar(&value, &format.format)?,
				};
				Ok(vec![Value::String(text)])
			}
		}
	}

	fn continue_chain(
		&self,
		candidates: Vec<Value>,
		next: Option<&ExprNode>,
		link: &str,
		ctx: &EvalContext<'_>,
	) -> ExpressionResult<Vec<Value>> {
		let Some(next) = next else {
			return Ok(candidates);
		};
		if candidates.len() > 1 {
			return Err(ExpressionError::AmbiguousChain {
				name: link.to_string(),
				count: candidates.len(),
			});
		}
		match candidates.into_iter().next() {
			None => Ok(Vec::new()),
			Some(Value::Null) => Ok(vec![Value::Null]),
			Some(value) => self.evaluate(next, &value, ctx),
		}
	}

	/// Internal consistency check: the runtime context must be assignable
	/// to the source type the node was resolved against.
	fn check_source(&self, declared: &str, context: &Value) -> ExpressionResult<()> {
		let actual = context.type_name();
		if actual == declared || self.schema.is_assignable(declared, actual) {
			return Ok(());
		}
		Err(ExpressionError::SourceTypeMismatch {
			declared: declared.to_string(),
			actual: actual.to_string(),
		})
	}
}

/// A value produced by a list-typed link fans out into its elements; any
/// other value is a single candidate.
fn expand_candidates(value: Value, returns: &TypeDescriptor) -> Vec<Value> {
	if returns.is_list {
		if let Value::List(items) = value {
			return items;
		}
	}
	vec![value]
}
