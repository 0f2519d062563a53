//! Reference-counted markup nodes.
//!
//! This is deliberately the minimal capability surface the rendering
//! engine consumes: iterate children as a snapshot, insert before a
//! sibling, detach, deep-clone a subtree, and read/write attributes. One
//! render mutates one tree from one thread; nodes are not `Send`.

use crate::error::{DomError, DomResult};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A shared handle to one tree node.
#[derive(Clone)]
pub struct NodeRef(Rc<Node>);

pub struct Node {
	data: NodeData,
	parent: RefCell<Weak<Node>>,
	children: RefCell<Vec<NodeRef>>,
}

enum NodeData {
	Element(ElementData),
	Text(RefCell<String>),
}

struct ElementData {
	name: String,
	attributes: RefCell<Vec<(String, String)>>,
}

impl NodeRef {
	/// Create a detached element node.
	pub fn element(name: impl Into<String>) -> Self {
		Self(Rc::new(Node {
			data: NodeData::Element(ElementData {
				name: name.into(),
				attributes: RefCell::new(Vec::new()),
			}),
			parent: RefCell::new(Weak::new()),
			children: RefCell::new(Vec::new()),
		}))
	}

	/// Create a detached text node.
	pub fn text(content: impl Into<String>) -> Self {
		Self(Rc::new(Node {
			data: NodeData::Text(RefCell::new(content.into())),
			parent: RefCell::new(Weak::new()),
			children: RefCell::new(Vec::new()),
		}))
	}

	pub fn is_element(&self) -> bool {
		matches!(self.0.data, NodeData::Element(_))
	}

	pub fn is_text(&self) -> bool {
		matches!(self.0.data, NodeData::Text(_))
	}

	/// Element name; `None` for text nodes.
	pub fn name(&self) -> Option<&str> {
		match &self.0.data {
			NodeData::Element(element) => Some(&element.name),
			NodeData::Text(_) => None,
		}
	}

	/// Stable identity of this node instance, for processed-node tracking.
	pub fn id(&self) -> usize {
		Rc::as_ptr(&self.0) as usize
	}

	/// Whether two handles refer to the same node instance.
	pub fn same_node(&self, other: &NodeRef) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	pub fn parent(&self) -> Option<NodeRef> {
		self.0.parent.borrow().upgrade().map(NodeRef)
	}

	/// Snapshot of the current child list. Callers iterate the snapshot so
	/// structural mutation cannot invalidate the iteration.
	pub fn children(&self) -> Vec<NodeRef> {
		self.0.children.borrow().clone()
	}

	pub fn has_children(&self) -> bool {
		!self.0.children.borrow().is_empty()
	}

	/// Append a child, detaching it from any previous parent.
	pub fn append_child(&self, child: &NodeRef) {
		child.detach();
		*child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
		self.0.children.borrow_mut().push(child.clone());
	}

	/// Insert `new` immediately before `anchor` among this node's
	/// children.
	pub fn insert_child_before(&self, new: &NodeRef, anchor: &NodeRef) -> DomResult<()> {
		new.detach();
		let mut children = self.0.children.borrow_mut();
		let index = children
			.iter()
			.position(|c| c.same_node(anchor))
			.ok_or_else(|| DomError::NotAChild {
				parent: self.describe(),
				anchor: anchor.describe(),
			})?;
		*new.0.parent.borrow_mut() = Rc::downgrade(&self.0);
		children.insert(index, new.clone());
		Ok(())
	}

	/// Remove this node from its parent, if any.
	pub fn detach(&self) {
		if let Some(parent) = self.parent() {
			parent
				.0
				.children
				.borrow_mut()
				.retain(|c| !c.same_node(self));
		}
		*self.0.parent.borrow_mut() = Weak::new();
	}

	/// Deep-clone this node and everything below it. The clone is
	/// detached and carries fresh identity.
	pub fn clone_subtree(&self) -> NodeRef {
		let clone = match &self.0.data {
			NodeData::Element(element) => {
				let fresh = NodeRef::element(element.name.clone());
				if let NodeData::Element(data) = &fresh.0.data {
					*data.attributes.borrow_mut() = element.attributes.borrow().clone();
				}
				fresh
			}
			NodeData::Text(text) => NodeRef::text(text.borrow().clone()),
		};
		for child in self.children() {
			clone.append_child(&child.clone_subtree());
		}
		clone
	}

	pub fn attribute(&self, name: &str) -> Option<String> {
		match &self.0.data {
			NodeData::Element(element) => element
				.attributes
				.borrow()
				.iter()
				.find(|(n, _)| n == name)
				.map(|(_, v)| v.clone()),
			NodeData::Text(_) => None,
		}
	}

	/// Set an attribute, keeping first-set ordering for serialization.
	pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
		let NodeData::Element(element) = &self.0.data else {
			return;
		};
		let name = name.into();
		let value = value.into();
		let mut attributes = element.attributes.borrow_mut();
		match attributes.iter_mut().find(|(n, _)| *n == name) {
			Some(slot) => slot.1 = value,
			None => attributes.push((name, value)),
		}
	}

	/// Remove an attribute, returning its value when present.
	pub fn remove_attribute(&self, name: &str) -> Option<String> {
		let NodeData::Element(element) = &self.0.data else {
			return None;
		};
		let mut attributes = element.attributes.borrow_mut();
		let index = attributes.iter().position(|(n, _)| n == name)?;
		Some(attributes.remove(index).1)
	}

	/// Attribute list in serialization order.
	pub fn attributes(&self) -> Vec<(String, String)> {
		match &self.0.data {
			NodeData::Element(element) => element.attributes.borrow().clone(),
			NodeData::Text(_) => Vec::new(),
		}
	}

	/// Text node content; `None` for elements.
	pub fn text(&self) -> Option<String> {
		match &self.0.data {
			NodeData::Text(text) => Some(text.borrow().clone()),
			NodeData::Element(_) => None,
		}
	}

	/// Concatenated text of this node and its descendants.
	pub fn text_content(&self) -> String {
		match &self.0.data {
			NodeData::Text(text) => text.borrow().clone(),
			NodeData::Element(_) => self
				.children()
				.iter()
				.map(|c| c.text_content())
				.collect::<Vec<_>>()
				.concat(),
		}
	}

	/// Replace an element's children with a single text node, or rewrite
	/// a text node's content.
	pub fn set_text_content(&self, content: impl Into<String>) {
		match &self.0.data {
			NodeData::Text(text) => *text.borrow_mut() = content.into(),
			NodeData::Element(_) => {
				for child in self.children() {
					child.detach();
				}
				self.append_child(&NodeRef::text(content));
			}
		}
	}

	fn describe(&self) -> String {
		match self.name() {
			Some(name) => name.to_string(),
			None => "#text".to_string(),
		}
	}
}

impl std::fmt::Debug for NodeRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.0.data {
			NodeData::Element(element) => f
				.debug_struct("Element")
				.field("name", &element.name)
				.field("children", &self.0.children.borrow().len())
				.finish(),
			NodeData::Text(text) => f.debug_tuple("Text").field(&text.borrow()).finish(),
		}
	}
}
