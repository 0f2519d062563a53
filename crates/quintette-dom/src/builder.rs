//! Fluent element builder.
//!
//! Hosts and tests construct markup trees through method chaining instead
//! of going through an HTML parser.
//!
//! ## Example
//!
//! ```ignore
//! let row = div()
//!     .class("row")
//!     .child(span().text("Total").build())
//!     .build();
//! ```

use crate::node::NodeRef;

/// Markup element builder with a fluent API.
pub struct ElementBuilder {
	node: NodeRef,
}

impl ElementBuilder {
	/// Create a builder for an element with the given tag name.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			node: NodeRef::element(name),
		}
	}

	/// Set the class attribute.
	pub fn class(self, class: &str) -> Self {
		self.node.set_attribute("class", class);
		self
	}

	/// Set the id attribute.
	pub fn id(self, id: &str) -> Self {
		self.node.set_attribute("id", id);
		self
	}

	/// Set a custom attribute.
	pub fn attr(self, name: &str, value: &str) -> Self {
		self.node.set_attribute(name, value);
		self
	}

	/// Append a text child.
	pub fn text(self, text: &str) -> Self {
		self.node.append_child(&NodeRef::text(text));
		self
	}

	/// Append a child node.
	pub fn child(self, child: NodeRef) -> Self {
		self.node.append_child(&child);
		self
	}

	/// Append several child nodes in order.
	pub fn children(self, children: impl IntoIterator<Item = NodeRef>) -> Self {
		for child in children {
			self.node.append_child(&child);
		}
		self
	}

	/// Finalize the builder and return the node.
	pub fn build(self) -> NodeRef {
		self.node
	}
}

/// Macro for defining element creation functions
macro_rules! define_element {
	($(#[$meta:meta])* $name:ident, $tag:literal) => {
		$(#[$meta])*
		pub fn $name() -> ElementBuilder {
			ElementBuilder::new($tag)
		}
	};
}

define_element!(
	/// Create a `<div>` element
	div, "div"
);

define_element!(
	/// Create a `<span>` element
	span, "span"
);

define_element!(
	/// Create a `<p>` element (paragraph)
	p, "p"
);

define_element!(
	/// Create an `<a>` element (hyperlink)
	a, "a"
);

define_element!(
	/// Create an `<img>` element
	img, "img"
);

define_element!(
	/// Create a `<table>` element
	table, "table"
);

define_element!(
	/// Create a `<thead>` element
	thead, "thead"
);

define_element!(
	/// Create a `<tbody>` element
	tbody, "tbody"
);

define_element!(
	/// Create a `<tr>` element (table row)
	tr, "tr"
);

define_element!(
	/// Create a `<td>` element (table cell)
	td, "td"
);

define_element!(
	/// Create a `<th>` element (table header cell)
	th, "th"
);

define_element!(
	/// Create a `<ul>` element (unordered list)
	ul, "ul"
);

define_element!(
	/// Create an `<ol>` element (ordered list)
	ol, "ol"
);

define_element!(
	/// Create an `<li>` element (list item)
	li, "li"
);

define_element!(
	/// Create an `<h1>` element (heading level 1)
	h1, "h1"
);

define_element!(
	/// Create an `<h2>` element (heading level 2)
	h2, "h2"
);

define_element!(
	/// Create an `<h3>` element (heading level 3)
	h3, "h3"
);

define_element!(
	/// Create an `<em>` element
	em, "em"
);

define_element!(
	/// Create a `<strong>` element
	strong, "strong"
);

define_element!(
	/// Create a `<br>` element
	br, "br"
);

define_element!(
	/// Create an `<hr>` element
	hr, "hr"
);

define_element!(
	/// Create a `<section>` element
	section, "section"
);

define_element!(
	/// Create a `<header>` element
	header, "header"
);

define_element!(
	/// Create a `<footer>` element
	footer, "footer"
);

define_element!(
	/// Create a `<body>` element
	body, "body"
);

define_element!(
	/// Create a `<template>` element, the conventional wrapper for
	/// inline template declarations
	template, "template"
);
