//! Depth-first directive dispatcher.
//!
//! Walks a template tree, dispatching each node exactly once per pass and
//! rewriting the live tree from evaluated expressions. Expansion always
//! follows the same shape: clone the relevant children, splice each clone
//! in before the directive node, walk the clone in place, and finally
//! remove the directive node itself. Children of the original node are
//! never walked directly, and child lists are snapshotted before any
//! iteration so structural mutation cannot invalidate a traversal.

use crate::container::{DataContainer, LOOP_SLOT, VALUE_SLOT};
use crate::cursor::LoopCursor;
use crate::directive::{take_directive, DirectiveKind, ATTR_TEMPLATE_ID};
use crate::error::{RenderError, RenderResult};
use crate::inline::InlineTemplateRegistry;
use crate::render::RenderHost;
use crate::visitor::BindingVisitor;
use quintette_dom::NodeRef;
use quintette_expression::{
	parse, EvalContext, Evaluator, ExpressionRoot, ParserContext, TypeDescriptor, Value,
	SLOTS_TYPE_NAME,
};
use std::collections::HashSet;

/// The context object expressions evaluate against at one point of the
/// walk: the top-level slot record, the current loop element, or the
/// bound template value.
#[derive(Debug, Clone)]
pub struct WalkScope {
	pub ty: TypeDescriptor,
	pub value: Value,
}

impl WalkScope {
	/// Top-level scope: the data container's slots as one record.
	pub fn slots(container: &DataContainer) -> Self {
		Self {
			ty: TypeDescriptor::record(SLOTS_TYPE_NAME),
			value: container.snapshot_record(),
		}
	}

	fn for_value(value: &Value) -> Self {
		Self {
			ty: value.type_descriptor(),
			value: value.clone(),
		}
	}
}

/// One pass of the directive dispatcher over one tree.
pub struct TemplateWalker<'h> {
	host: &'h RenderHost,
	container: &'h mut DataContainer,
	templates: &'h InlineTemplateRegistry,
	visitors: &'h mut Vec<Box<dyn BindingVisitor>>,
	mutation_allowed: bool,
	processed: HashSet<usize>,
	unclaimed: Vec<NodeRef>,
}

impl<'h> TemplateWalker<'h> {
	pub fn new(
		host: &'h RenderHost,
		container: &'h mut DataContainer,
		templates: &'h InlineTemplateRegistry,
		visitors: &'h mut Vec<Box<dyn BindingVisitor>>,
		mutation_allowed: bool,
	) -> Self {
		Self {
			host,
			container,
			templates,
			visitors,
			mutation_allowed,
			processed: HashSet::new(),
			unclaimed: Vec::new(),
		}
	}

	/// Dispatch one node and everything it expands to.
	pub fn walk(&mut self, node: &NodeRef, scope: &WalkScope) -> RenderResult<()> {
		if !self.processed.insert(node.id()) {
			return Err(RenderError::NodeRevisited {
				name: describe(node),
			});
		}
		if !node.is_element() {
			return Ok(());
		}
		// Unexpanded declaration content is visited only through explicit
		// reference expansion, never by ordinary descent.
		if node.attribute(ATTR_TEMPLATE_ID).is_some() {
			return Ok(());
		}
		let directive = take_directive(node)?;
		tracing::trace!(node = %describe(node), directive = ?directive, "Dispatching node");
		match directive {
			DirectiveKind::Foreach { expression } => self.expand_foreach(node, &expression, scope),
			DirectiveKind::Condition { expression } => {
				self.expand_condition(node, &expression, scope)
			}
			DirectiveKind::ValueTemplateRef {
				template_id,
				expression,
			} => self.expand_value_template(node, &template_id, &expression, scope),
			DirectiveKind::PropertyBinding { expression } => {
				self.bind_property(node, &expression, scope)
			}
			DirectiveKind::None => {
				for child in node.children() {
					self.walk(&child, scope)?;
				}
				Ok(())
			}
		}
	}

	/// Surface unclaimed bound nodes when the host asked for end-of-pass
	/// validation; otherwise they are silently left unmatched.
	pub fn finish(self, validate: bool) -> RenderResult<()> {
		if !validate || self.unclaimed.is_empty() {
			return Ok(());
		}
		let nodes = self
			.unclaimed
			.iter()
			.map(describe)
			.collect::<Vec<_>>()
			.join(", ");
		Err(RenderError::UnhandledDirective {
			count: self.unclaimed.len(),
			nodes,
		})
	}

	fn expand_foreach(
		&mut self,
		node: &NodeRef,
		expression: &str,
		scope: &WalkScope,
	) -> RenderResult<()> {
		if self.container.contains(LOOP_SLOT) {
			return Err(RenderError::ReservedSlotInUse {
				name: LOOP_SLOT.to_string(),
			});
		}
		let parent = require_parent(node)?;
		let values = self.evaluate(expression, scope)?;
		let elements: Vec<Value> = values.into_iter().filter(|v| !v.is_null()).collect();
		let count = elements.len();
		tracing::trace!(count, "Expanding foreach");

		for (index, element) in elements.into_iter().enumerate() {
			let cursor = LoopCursor::new(index, count, element.clone());
			self.container
				.add_prop(LoopCursor::descriptor(), LOOP_SLOT, cursor.into_value())?;
			let body_scope = WalkScope::for_value(&element);
			let expanded = self.expand_children_before(node, &parent, node, &body_scope);
			self.container.remove(LOOP_SLOT)?;
			expanded?;
		}
		node.detach();
		Ok(())
	}

	fn expand_condition(
		&mut self,
		node: &NodeRef,
		expression: &str,
		scope: &WalkScope,
	) -> RenderResult<()> {
		let values = self.evaluate(expression, scope)?;
		let truthy = match values.as_slice() {
			[Value::Bool(b)] => *b,
			[Value::Null] => false,
			other => {
				return Err(RenderError::NotABoolean {
					expression: expression.to_string(),
					found: other
						.first()
						.map(|v| v.type_name().to_string())
						.unwrap_or_else(|| "nothing".to_string()),
				});
			}
		};
		if truthy {
			// The directive attribute is already stripped, so the spliced
			// clone re-dispatches as a plain node (or through any
			// lower-priority directive it still carries).
			let parent = require_parent(node)?;
			let clone = node.clone_subtree();
			parent.insert_child_before(&clone, node)?;
			self.walk(&clone, scope)?;
		}
		// The original node disappears regardless of outcome.
		node.detach();
		Ok(())
	}

	fn expand_value_template(
		&mut self,
		node: &NodeRef,
		template_id: &str,
		expression: &str,
		scope: &WalkScope,
	) -> RenderResult<()> {
		let template = self.templates.get(template_id)?.clone();
		let parent = require_parent(node)?;
		let mut values = self.evaluate(expression, scope)?;
		if values.len() != 1 {
			return Err(RenderError::AmbiguousTemplateValue {
				id: template_id.to_string(),
				count: values.len(),
			});
		}
		let value = values.pop().unwrap_or(Value::Null);

		// Shadow any outer binding of the reserved value slot for the
		// duration of this expansion, then restore it.
		let previous = self.container.unbind(VALUE_SLOT);
		self.container
			.add_prop(value.type_descriptor(), VALUE_SLOT, value.clone())?;
		let body_scope = WalkScope::for_value(&value);
		let expanded = self.expand_children_before(&template, &parent, node, &body_scope);
		self.container.remove(VALUE_SLOT)?;
		if let Some((ty, prev)) = previous {
			self.container.add_prop(ty, VALUE_SLOT, prev)?;
		}
		expanded?;
		node.detach();
		Ok(())
	}

	fn bind_property(
		&mut self,
		node: &NodeRef,
		expression: &str,
		scope: &WalkScope,
	) -> RenderResult<()> {
		let values = self.evaluate(expression, scope)?;
		let mut claimed = false;
		for visitor in self.visitors.iter_mut() {
			if visitor.claim(node, &values)? {
				claimed = true;
				break;
			}
		}
		if !claimed {
			self.unclaimed.push(node.clone());
		}
		Ok(())
	}

	/// Clone each child of `source`, splice the clone in before `anchor`
	/// under `parent`, and walk it in place.
	fn expand_children_before(
		&mut self,
		source: &NodeRef,
		parent: &NodeRef,
		anchor: &NodeRef,
		scope: &WalkScope,
	) -> RenderResult<()> {
		for child in source.children() {
			let clone = child.clone_subtree();
			parent.insert_child_before(&clone, anchor)?;
			self.walk(&clone, scope)?;
		}
		Ok(())
	}

	/// Parse and evaluate one directive expression in the current scope.
	fn evaluate(&self, expression: &str, scope: &WalkScope) -> RenderResult<Vec<Value>> {
		let slot_schema = self.container.slot_schema();
		let ctx = ParserContext {
			schema: self.host.schema(),
			resolvers: self.host.resolvers(),
			formatters: self.host.formatters(),
			slots: &slot_schema,
			compiler: self.host.compiler(),
			cache: Some(self.host.cache()),
		};
		let parsed = parse(expression, &scope.ty, &ctx)?;
		let root_value = match parsed.root {
			ExpressionRoot::Scope => scope.value.clone(),
			ExpressionRoot::Slots => self.container.snapshot_record(),
		};
		let eval_ctx = EvalContext::new(self.mutation_allowed).with_slots(&*self.container);
		let values =
			Evaluator::new(self.host.schema()).evaluate(&parsed.node, &root_value, &eval_ctx)?;
		Ok(values)
	}
}

fn require_parent(node: &NodeRef) -> RenderResult<NodeRef> {
	node.parent().ok_or_else(|| RenderError::MissingParent {
		name: describe(node),
	})
}

fn describe(node: &NodeRef) -> String {
	node.name().unwrap_or("#text").to_string()
}
