//! Document assembly.
//!
//! Concatenates rendered fragments (serialized trees or raw strings) into
//! the final artifact, with an optional minimal email envelope around the
//! result.

use quintette_dom::{to_html, NodeRef};

/// Collects rendered fragments in order and joins them into one artifact.
#[derive(Debug, Default)]
pub struct DocumentAssembler {
	fragments: Vec<String>,
}

impl DocumentAssembler {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append an already-rendered fragment.
	pub fn push_fragment(&mut self, fragment: impl Into<String>) {
		self.fragments.push(fragment.into());
	}

	/// Serialize a node and append it as a fragment.
	pub fn push_node(&mut self, node: &NodeRef) {
		self.fragments.push(to_html(node));
	}

	pub fn is_empty(&self) -> bool {
		self.fragments.iter().all(|f| f.is_empty())
	}

	/// Concatenate all fragments in insertion order.
	pub fn assemble(self) -> String {
		self.fragments.concat()
	}

	/// Wrap the assembled fragments in a minimal HTML email document.
	pub fn into_email_document(self) -> String {
		format!(
			"<!DOCTYPE html><html><head><meta charset=\"utf-8\"/></head><body>{}</body></html>",
			self.assemble()
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use quintette_dom::builder::{p, span};
	use rstest::rstest;

	#[rstest]
	fn fragments_join_in_insertion_order() {
		// Arrange
		let mut assembler = DocumentAssembler::new();
		assembler.push_node(&p().text("one").build());
		assembler.push_fragment("<hr/>");
		assembler.push_node(&span().text("two").build());

		// Act / Assert
		assert_eq!(assembler.assemble(), "<p>one</p><hr/><span>two</span>");
	}

	#[rstest]
	fn email_envelope_wraps_the_body() {
		// Arrange
		let mut assembler = DocumentAssembler::new();
		assembler.push_fragment("<p>hi</p>");

		// Act
		let document = assembler.into_email_document();

		// Assert
		assert!(document.starts_with("<!DOCTYPE html>"));
		assert!(document.contains("<body><p>hi</p></body>"));
	}
}
