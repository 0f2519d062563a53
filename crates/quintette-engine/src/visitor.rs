//! Binding visitors.
//!
//! A `data-property` node is committed by a host-supplied visitor, not by
//! the walker itself. Visitors are consulted in order and exactly one
//! successful claim is permitted per bound node per pass; the walker stops
//! offering the node after the first claim. Unclaimed nodes surface as an
//! unhandled-directive error only when the host requests end-of-pass
//! validation.

use crate::error::RenderResult;
use quintette_dom::NodeRef;
use quintette_expression::Value;

/// Per-node visitor callback responsible for committing evaluated values
/// onto a bound node.
pub trait BindingVisitor {
	/// Attempt to commit `values` onto `node`. Returning `true` claims
	/// the node; the node is retained unless the visitor removes it.
	fn claim(&mut self, node: &NodeRef, values: &[Value]) -> RenderResult<bool>;
}

/// Default visitor: commits a single evaluated value as the node's text
/// content. Escaping happens at serialization, so the raw value is
/// stored. Declines fan-out results and empty results.
pub struct TextBindingVisitor;

impl BindingVisitor for TextBindingVisitor {
	fn claim(&mut self, node: &NodeRef, values: &[Value]) -> RenderResult<bool> {
		let [value] = values else {
			return Ok(false);
		};
		node.set_text_content(value.to_string());
		Ok(true)
	}
}
