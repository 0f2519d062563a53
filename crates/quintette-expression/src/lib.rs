//! # Quintette Expression
//!
//! The expression mini-language behind Quintette's template directives:
//! tokenizer, recursive-descent parser, AST and evaluator, plus the
//! pluggable lookups they consult (schema registry, instruction resolvers,
//! value formatters) and the escape-hatch script machinery.
//!
//! Expressions are dotted chains with an optional trailing format spec
//! (`Customer.Name:upper`) resolved against an ahead-of-time schema
//! registry, or — prefixed with `@` — opaque script text compiled by an
//! injected facility and cached process-wide.
//!
//! ## Example
//!
//! ```rust,ignore
//! use quintette_expression::{
//!     parse, Evaluator, EvalContext, FormatterRegistry, ParserContext, ResolverSet,
//!     SchemaRegistry, TypeDescriptor, TypeSchema, Value,
//! };
//!
//! let mut schema = SchemaRegistry::new();
//! schema.register(TypeSchema::new("Customer").field("Name", TypeDescriptor::simple("String")));
//!
//! let ctx = ParserContext {
//!     schema: &schema,
//!     resolvers: &ResolverSet::new(),
//!     formatters: &FormatterRegistry::with_builtins(),
//!     slots: &[],
//!     compiler: None,
//!     cache: None,
//! };
//! let parsed = parse("Name:upper", &TypeDescriptor::record("Customer"), &ctx)?;
//!
//! let customer = Value::record("Customer").with("Name", "ada");
//! let values = Evaluator::new(&schema).evaluate(
//!     &parsed.node,
//!     &customer.into(),
//!     &EvalContext::new(true),
//! )?;
//! assert_eq!(values, vec![Value::String("ADA".into())]);
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod format;
pub mod instruction;
pub mod parser;
pub mod schema;
pub mod script;
pub mod token;
pub mod value;

pub use ast::{
	ExprNode, ExpressionRoot, FormatNode, InstructionNode, ParsedExpression, PropertyNode,
	ScriptNode,
};
pub use error::{ExpressionError, ExpressionResult};
pub use eval::{EvalContext, Evaluator};
pub use format::{format_scalar, FormatterRegistry, ValueFormatter};
pub use instruction::{
	InstructionDefinition, InstructionKind, InstructionResolver, MapResolver, ResolverSet,
};
pub use parser::{parse, ParserContext};
pub use schema::{FieldDescriptor, SchemaRegistry, TypeDescriptor, TypeSchema, SLOTS_TYPE_NAME};
pub use script::{
	normalize_source, required_slot, CompiledScript, FnScript, FnScriptCompiler, ScriptCache,
	ScriptCompiler, SlotAccess, SlotDescriptor,
};
pub use token::{tokenize, Separator, Token, Tokenized, SCRIPT_PREFIX};
pub use value::{Record, Value};

#[cfg(test)]
mod tests;
