//! Deterministic HTML serialization.
//!
//! Text and attribute values are escaped here, at the output boundary;
//! nodes always store raw text. Attributes serialize in first-set order,
//! so identical trees serialize byte-identically.

use crate::node::NodeRef;

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// Serialize a node and its subtree to HTML.
pub fn to_html(node: &NodeRef) -> String {
	let mut out = String::new();
	serialize_into(node, &mut out);
	out
}

fn serialize_into(node: &NodeRef, out: &mut String) {
	if let Some(text) = node.text() {
		out.push_str(&escape_text(&text));
		return;
	}
	let Some(name) = node.name() else {
		return;
	};
	out.push('<');
	out.push_str(name);
	for (attr, value) in node.attributes() {
		out.push(' ');
		out.push_str(&attr);
		out.push_str("=\"");
		out.push_str(&escape_attribute(&value));
		out.push('"');
	}
	if VOID_ELEMENTS.contains(&name) {
		out.push_str("/>");
		return;
	}
	out.push('>');
	for child in node.children() {
		serialize_into(&child, out);
	}
	out.push_str("</");
	out.push_str(name);
	out.push('>');
}

/// Escape text content for safe HTML output.
pub fn escape_text(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for ch in text.chars() {
		match ch {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			other => escaped.push(other),
		}
	}
	escaped
}

/// Escape an attribute value for double-quoted serialization.
pub fn escape_attribute(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());
	for ch in value.chars() {
		match ch {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			other => escaped.push(other),
		}
	}
	escaped
}
