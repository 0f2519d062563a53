//! Directive attribute detection.
//!
//! A node carries at most one of the main control attributes at a time;
//! `value-template-id` is an independent companion marker whose bound
//! value expression is the node's `data-property` expression. Detection
//! strips the consumed attributes from the node, so a directive attribute
//! is never visible to expression evaluation or serialization.

use crate::error::{RenderError, RenderResult};
use quintette_dom::{ElementBuilder, NodeRef};

/// Binds an expression whose value a host visitor commits onto the node.
pub const ATTR_PROPERTY: &str = "data-property";

/// Binds a sequence expression; the node's children expand per element.
pub const ATTR_FOREACH: &str = "data-foreach";

/// Binds a boolean expression gating the node's children.
pub const ATTR_IF: &str = "data-if";

/// Declares the node's content as a reusable inline template keyed by
/// this attribute's value.
pub const ATTR_TEMPLATE_ID: &str = "template-id";

/// References a declared inline template; companion to `data-property`.
pub const ATTR_VALUE_TEMPLATE_ID: &str = "value-template-id";

/// The recognized control attribute of one node, in priority order:
/// Foreach > Condition > ValueTemplateRef > PropertyBinding > None.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
	Foreach {
		expression: String,
	},
	Condition {
		expression: String,
	},
	ValueTemplateRef {
		template_id: String,
		expression: String,
	},
	PropertyBinding {
		expression: String,
	},
	None,
}

/// Detect the node's directive, stripping the consumed attributes.
pub fn take_directive(node: &NodeRef) -> RenderResult<DirectiveKind> {
	if !node.is_element() {
		return Ok(DirectiveKind::None);
	}
	if let Some(expression) = node.remove_attribute(ATTR_FOREACH) {
		return Ok(DirectiveKind::Foreach { expression });
	}
	if let Some(expression) = node.remove_attribute(ATTR_IF) {
		return Ok(DirectiveKind::Condition { expression });
	}
	if let Some(template_id) = node.remove_attribute(ATTR_VALUE_TEMPLATE_ID) {
		let expression = node.remove_attribute(ATTR_PROPERTY).ok_or_else(|| {
			RenderError::MissingValueExpression {
				name: node.name().unwrap_or("#text").to_string(),
			}
		})?;
		return Ok(DirectiveKind::ValueTemplateRef {
			template_id,
			expression,
		});
	}
	if let Some(expression) = node.remove_attribute(ATTR_PROPERTY) {
		return Ok(DirectiveKind::PropertyBinding { expression });
	}
	Ok(DirectiveKind::None)
}

/// Directive-setting extensions for the fluent element builder.
pub trait DirectiveExt {
	/// Bind a property expression (`data-property`).
	fn property(self, expression: &str) -> Self;

	/// Bind a sequence expression (`data-foreach`).
	fn foreach(self, expression: &str) -> Self;

	/// Bind a condition expression (`data-if`).
	fn when(self, expression: &str) -> Self;

	/// Declare this node's content as an inline template (`template-id`).
	fn template_id(self, id: &str) -> Self;

	/// Reference an inline template with a bound value expression
	/// (`value-template-id` plus `data-property`).
	fn value_template(self, id: &str, expression: &str) -> Self;
}

impl DirectiveExt for ElementBuilder {
	fn property(self, expression: &str) -> Self {
		self.attr(ATTR_PROPERTY, expression)
	}

	fn foreach(self, expression: &str) -> Self {
		self.attr(ATTR_FOREACH, expression)
	}

	fn when(self, expression: &str) -> Self {
		self.attr(ATTR_IF, expression)
	}

	fn template_id(self, id: &str) -> Self {
		self.attr(ATTR_TEMPLATE_ID, id)
	}

	fn value_template(self, id: &str, expression: &str) -> Self {
		self.attr(ATTR_VALUE_TEMPLATE_ID, id)
			.attr(ATTR_PROPERTY, expression)
	}
}
