//! Recursive-descent expression parser.
//!
//! Grammar: `expr := token ('.' expr | ':' formatSpec)?`. At each token,
//! resolution order is: ordered custom instruction resolvers first (a match
//! overrides any declared field of the same name), then declared-type field
//! lookup through the schema registry (base types included). The first
//! token additionally falls back to the data container's slot schema, which
//! is how top-level slot names and the reserved `Loop`/`Value` slots enter
//! an expression.
//!
//! A `:` introduces a trailing format spec and nothing may follow it. A
//! leading escape prefix bypasses the grammar entirely and hands the raw
//! text to the configured script compiler.

use crate::ast::{
	ExprNode, ExpressionRoot, FormatNode, InstructionNode, ParsedExpression, PropertyNode,
	ScriptNode,
};
use crate::error::{ExpressionError, ExpressionResult};
use crate::format::FormatterRegistry;
use crate::instruction::ResolverSet;
use crate::schema::{SchemaRegistry, TypeDescriptor, SLOTS_TYPE_NAME};
use crate::script::{ScriptCache, ScriptCompiler, SlotDescriptor};
use crate::token::{tokenize, Separator, Token, Tokenized};

/// Everything the parser consults while resolving tokens.
pub struct ParserContext<'a> {
	pub schema: &'a SchemaRegistry,
	pub resolvers: &'a ResolverSet,
	pub formatters: &'a FormatterRegistry,
	/// Slot schema of the data container, used as the first-token fallback
	/// and handed to the script compiler.
	pub slots: &'a [SlotDescriptor],
	pub compiler: Option<&'a dyn ScriptCompiler>,
	pub cache: Option<&'a ScriptCache>,
}

/// Parse one expression against the given context type.
pub fn parse(
	expression: &str,
	context: &TypeDescriptor,
	ctx: &ParserContext<'_>,
) -> ExpressionResult<ParsedExpression> {
	tracing::trace!(expression = %expression, context = %context.name, "Parsing expression");
	match tokenize(expression) {
		Tokenized::Script(source) => parse_script(source, ctx),
		Tokenized::Tokens(tokens) => parse_tokens(expression, &tokens, context, ctx),
	}
}

fn parse_script(source: String, ctx: &ParserContext<'_>) -> ExpressionResult<ParsedExpression> {
	let compiler = ctx
		.compiler
		.ok_or(ExpressionError::ScriptCompilerUnavailable)?;
	let artifact = match ctx.cache {
		Some(cache) => cache.get_or_compile(&source, ctx.slots, compiler)?,
		None => compiler.compile(&source, ctx.slots)?,
	};
	Ok(ParsedExpression {
		root: ExpressionRoot::Scope,
		node: ExprNode::Script(ScriptNode { source, artifact }),
	})
}

fn parse_tokens(
	expression: &str,
	tokens: &[Token],
	context: &TypeDescriptor,
	ctx: &ParserContext<'_>,
) -> ExpressionResult<ParsedExpression> {
	validate_token_shape(expression, tokens)?;

	// A colon, when present, must introduce the final token.
	let format_at = tokens.iter().position(|t| t.leading == Some(Separator::Colon));
	if let Some(k) = format_at {
		if k + 1 < tokens.len() {
			return Err(ExpressionError::TrailingTokens {
				format: tokens[k].text.clone(),
				position: tokens[k + 1].position,
			});
		}
	}
	let chain_len = format_at.unwrap_or(tokens.len());

	let mut root = ExpressionRoot::Scope;
	let node = parse_chain(&tokens[..chain_len], 0, context, ctx, &mut root)?;

	let node = match format_at {
		Some(k) => wrap_format(node, &tokens[k], ctx)?,
		None => node,
	};
	Ok(ParsedExpression { root, node })
}

/// Empty tokens are structural defects; report them with their position
/// before any name resolution happens.
fn validate_token_shape(expression: &str, tokens: &[Token]) -> ExpressionResult<()> {
	for (i, token) in tokens.iter().enumerate() {
		if !token.text.is_empty() {
			continue;
		}
		if i + 1 == tokens.len() {
			return Err(ExpressionError::PrematureEnd {
				expression: expression.to_string(),
				position: token.position,
			});
		}
		return Err(ExpressionError::UnexpectedToken {
			expression: expression.to_string(),
			position: token.position,
		});
	}
	Ok(())
}

fn parse_chain(
	tokens: &[Token],
	idx: usize,
	context: &TypeDescriptor,
	ctx: &ParserContext<'_>,
	root: &mut ExpressionRoot,
) -> ExpressionResult<ExprNode> {
	let token = &tokens[idx];
	let mut node = resolve_token(token, idx == 0, context, ctx, root)?;

	if idx + 1 < tokens.len() {
		let Some(returns) = node.returns().cloned() else {
			return Err(ExpressionError::ExecutorMidChain {
				name: token.text.clone(),
			});
		};
		// Chaining through a list resolves against the element type; the
		// evaluator enforces the at-most-one-value rule at runtime.
		let next_context = returns.element(ctx.schema);
		let next = parse_chain(tokens, idx + 1, &next_context, ctx, root)?;
		match &mut node {
			ExprNode::Property(p) => p.next = Some(Box::new(next)),
			ExprNode::Instruction(i) => i.next = Some(Box::new(next)),
			ExprNode::Format(_) | ExprNode::Script(_) => unreachable!("terminal node kinds"),
		}
	}
	Ok(node)
}

fn resolve_token(
	token: &Token,
	is_first: bool,
	context: &TypeDescriptor,
	ctx: &ParserContext<'_>,
	root: &mut ExpressionRoot,
) -> ExpressionResult<ExprNode> {
	if let Some(definition) = ctx.resolvers.resolve(&context.name, &token.text) {
		return Ok(ExprNode::Instruction(InstructionNode {
			definition,
			next: None,
		}));
	}
	if let Some(field) = ctx.schema.lookup_field(&context.name, &token.text) {
		return Ok(ExprNode::Property(PropertyNode {
			source_type: context.name.clone(),
			name: token.text.clone(),
			returns: field.ty.clone(),
			next: None,
		}));
	}
	if is_first {
		if let Some(slot) = ctx.slots.iter().find(|s| s.name == token.text) {
			*root = ExpressionRoot::Slots;
			return Ok(ExprNode::Property(PropertyNode {
				source_type: SLOTS_TYPE_NAME.to_string(),
				name: token.text.clone(),
				returns: slot.ty.clone(),
				next: None,
			}));
		}
	}
	Err(ExpressionError::UnresolvedName {
		name: token.text.clone(),
		type_name: context.name.clone(),
		position: token.position,
	})
}

fn wrap_format(
	chain: ExprNode,
	format_token: &Token,
	ctx: &ParserContext<'_>,
) -> ExpressionResult<ExprNode> {
	let Some(returns) = chain.terminal_returns() else {
		return Err(ExpressionError::ExecutorMidChain {
			name: terminal_name(&chain).to_string(),
		});
	};
	let format = format_token.text.clone();
	if returns.is_list {
		return Err(ExpressionError::UnsupportedFormat {
			format,
			type_name: format!("list of {}", returns.name),
			position: format_token.position,
		});
	}
	let formatter = if returns.name == "String" {
		match ctx.formatters.find(&format) {
			Some(formatter) => Some(formatter),
			None => {
				return Err(ExpressionError::UnsupportedFormat {
					format,
					type_name: returns.name.clone(),
					position: format_token.position,
				});
			}
		}
	} else if returns.is_simple {
		// Generic value formatting, applied by the evaluator.
		None
	} else {
		return Err(ExpressionError::UnsupportedFormat {
			format,
			type_name: returns.name.clone(),
			position: format_token.position,
		});
	};
	Ok(ExprNode::Format(FormatNode {
		operand: Box::new(chain),
		format,
		formatter,
	}))
}

fn terminal_name(node: &ExprNode) -> &str {
	let mut current = node;
	while let Some(next) = current.next() {
		current = next;
	}
	current.link_name()
}
