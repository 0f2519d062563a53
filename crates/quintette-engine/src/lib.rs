//! # Quintette Engine
//!
//! The directive-driven rendering engine: walks a markup tree whose nodes
//! carry small control attributes (`data-property`, `data-foreach`,
//! `data-if`, `template-id`, `value-template-id`) bound to expressions,
//! and rewrites the live tree from the evaluated results.
//!
//! One render is single-threaded cooperative work: parser, evaluator and
//! tree walker execute synchronously in one logical call stack, and the
//! data container and document tree have a single writer. The compiled
//! script cache is the only structure shared across concurrent renders.
//!
//! ## Example
//!
//! ```rust,ignore
//! use quintette_dom::builder::{div, span};
//! use quintette_engine::{
//!     DataContainer, DirectiveExt, RenderHost, Renderer, TextBindingVisitor,
//! };
//! use quintette_expression::{SchemaRegistry, TypeDescriptor, TypeSchema, Value};
//!
//! let mut schema = SchemaRegistry::new();
//! schema.register(TypeSchema::new("Customer").field("Name", TypeDescriptor::simple("String")));
//! let host = RenderHost::new(schema);
//!
//! let mut container = DataContainer::new();
//! container.add_prop(
//!     TypeDescriptor::list_of(&TypeDescriptor::record("Customer")),
//!     "Items",
//!     Value::List(vec![Value::Record(Value::record("Customer").with("Name", "A"))]),
//! )?;
//!
//! let root = div()
//!     .child(div().foreach("Items").child(span().property("Name").build()).build())
//!     .build();
//! let mut visitors: Vec<Box<dyn quintette_engine::BindingVisitor>> =
//!     vec![Box::new(TextBindingVisitor)];
//! let html = Renderer::new(&host).render(&root, &mut container, &mut visitors)?;
//! assert_eq!(html, "<span>A</span>");
//! ```

pub mod assemble;
pub mod container;
pub mod cursor;
pub mod directive;
pub mod error;
pub mod inline;
pub mod render;
pub mod visitor;
pub mod walker;

pub use assemble::DocumentAssembler;
pub use container::{DataContainer, LOOP_SLOT, VALUE_SLOT};
pub use cursor::LoopCursor;
pub use directive::{
	take_directive, DirectiveExt, DirectiveKind, ATTR_FOREACH, ATTR_IF, ATTR_PROPERTY,
	ATTR_TEMPLATE_ID, ATTR_VALUE_TEMPLATE_ID,
};
pub use error::{RenderError, RenderResult};
pub use inline::InlineTemplateRegistry;
pub use render::{RenderConfig, RenderHost, Renderer};
pub use visitor::{BindingVisitor, TextBindingVisitor};
pub use walker::{TemplateWalker, WalkScope};

#[cfg(test)]
mod tests;
