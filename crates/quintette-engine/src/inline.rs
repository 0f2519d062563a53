//! Inline template extraction and registry.
//!
//! One upfront scan of a top-level template finds every element carrying
//! `template-id`, detaches it from the live tree (so it never renders
//! directly) and indexes it by id. Whitespace-only text nodes are
//! stripped from the extracted content. Declarations live as long as the
//! owning top-level template's render.

use crate::directive::ATTR_TEMPLATE_ID;
use crate::error::{RenderError, RenderResult};
use quintette_dom::NodeRef;
use std::collections::BTreeMap;

/// Id-keyed registry of extracted inline template declarations.
#[derive(Debug, Default)]
pub struct InlineTemplateRegistry {
	templates: BTreeMap<String, NodeRef>,
}

impl InlineTemplateRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Scan `root` once, extracting every declaration below it.
	///
	/// Declaring the same id twice is a hard error: silent shadowing
	/// would hide an authoring mistake.
	pub fn extract(root: &NodeRef) -> RenderResult<Self> {
		let mut declarations = Vec::new();
		collect_declarations(root, &mut declarations);

		let mut registry = Self::new();
		for node in declarations {
			let Some(id) = node.remove_attribute(ATTR_TEMPLATE_ID) else {
				continue;
			};
			node.detach();
			strip_whitespace_text(&node);
			if registry.templates.insert(id.clone(), node).is_some() {
				return Err(RenderError::DuplicateTemplate { id });
			}
			tracing::debug!(template_id = %id, "Registered inline template");
		}
		Ok(registry)
	}

	/// Resolve a declaration by id; unknown ids are fatal.
	pub fn get(&self, id: &str) -> RenderResult<&NodeRef> {
		self.templates
			.get(id)
			.ok_or_else(|| RenderError::UnknownTemplate { id: id.to_string() })
	}

	pub fn len(&self) -> usize {
		self.templates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.templates.is_empty()
	}
}

fn collect_declarations(node: &NodeRef, out: &mut Vec<NodeRef>) {
	for child in node.children() {
		if child.is_element() && child.attribute(ATTR_TEMPLATE_ID).is_some() {
			out.push(child.clone());
		}
		collect_declarations(&child, out);
	}
}

fn strip_whitespace_text(node: &NodeRef) {
	for child in node.children() {
		match child.text() {
			Some(text) if text.trim().is_empty() => child.detach(),
			Some(_) => {}
			None => strip_whitespace_text(&child),
		}
	}
}
