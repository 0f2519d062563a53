//! # Quintette
//!
//! A directive-driven templating engine for rendering structured,
//! data-bound HTML documents (typically emails). Markup nodes carry small
//! control attributes — `data-property`, `data-foreach`, `data-if`,
//! `template-id`, `value-template-id` — bound to expressions in a compact
//! mini-language; a depth-first tree walk evaluates the expressions
//! against registered model objects and rewrites the live tree into the
//! final document.
//!
//! The workspace splits into three crates, re-exported here:
//!
//! - [`expression`] — tokenizer, recursive-descent parser, AST and
//!   evaluator, plus the pluggable lookups they consult (ahead-of-time
//!   schema registry, instruction resolvers, value formatters) and the
//!   escape-hatch script machinery with its shared compile cache.
//! - [`dom`] — the minimal in-memory markup tree the engine consumes,
//!   with a fluent builder and deterministic HTML serialization.
//! - [`engine`] — directive detection, the data container and loop
//!   cursor, inline template extraction, the template tree walker,
//!   binding visitors, document assembly and the render facade.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use quintette::prelude::*;
//!
//! // Declare the model world once.
//! let mut schema = SchemaRegistry::new();
//! schema.register(
//!     TypeSchema::new("Customer").field("Name", TypeDescriptor::simple("String")),
//! );
//! let host = RenderHost::new(schema);
//!
//! // Register the data for one render.
//! let mut container = DataContainer::new();
//! container.add_prop(
//!     TypeDescriptor::list_of(&TypeDescriptor::record("Customer")),
//!     "Items",
//!     Value::List(vec![
//!         Value::Record(Value::record("Customer").with("Name", "A")),
//!         Value::Record(Value::record("Customer").with("Name", "B")),
//!     ]),
//! )?;
//!
//! // Build the template tree and render it.
//! let root = div()
//!     .child(
//!         div()
//!             .foreach("Items")
//!             .child(span().property("Name").build())
//!             .build(),
//!     )
//!     .build();
//! let mut visitors: Vec<Box<dyn BindingVisitor>> = vec![Box::new(TextBindingVisitor)];
//! let html = Renderer::new(&host).render(&root, &mut container, &mut visitors)?;
//! assert_eq!(html, "<span>A</span><span>B</span>");
//! ```

pub use quintette_dom as dom;
pub use quintette_engine as engine;
pub use quintette_expression as expression;

pub use quintette_dom::{ElementBuilder, NodeRef};
pub use quintette_engine::{
	BindingVisitor, DataContainer, DirectiveExt, DocumentAssembler, LoopCursor, RenderConfig,
	RenderError, RenderHost, RenderResult, Renderer, TextBindingVisitor,
};
pub use quintette_expression::{
	ExpressionError, ExpressionResult, FormatterRegistry, InstructionDefinition,
	InstructionResolver, Record, ResolverSet, SchemaRegistry, ScriptCache, ScriptCompiler,
	TypeDescriptor, TypeSchema, Value, ValueFormatter,
};

/// Commonly used types and builder functions in one import.
pub mod prelude {
	pub use quintette_dom::builder::{div, p, span, table, tbody, td, template, th, thead, tr};
	pub use quintette_dom::{to_html, ElementBuilder, NodeRef};
	pub use quintette_engine::{
		BindingVisitor, DataContainer, DirectiveExt, DocumentAssembler, RenderConfig, RenderError,
		RenderHost, RenderResult, Renderer, TextBindingVisitor,
	};
	pub use quintette_expression::{
		Record, SchemaRegistry, TypeDescriptor, TypeSchema, Value,
	};
}
