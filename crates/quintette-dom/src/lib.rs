//! # Quintette DOM
//!
//! A minimal in-memory markup tree: exactly the capability surface the
//! rendering engine consumes (snapshot iteration, insert-before, detach,
//! deep clone, attributes), a fluent element builder, and deterministic
//! HTML serialization. No parsing, no styling, no live-document concerns —
//! hosts with a full document implementation can keep using their own tree
//! and feed the engine through this one.

pub mod builder;
pub mod error;
pub mod node;
pub mod serialize;

pub use builder::ElementBuilder;
pub use error::{DomError, DomResult};
pub use node::NodeRef;
pub use serialize::{escape_attribute, escape_text, to_html};
