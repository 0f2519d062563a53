//! Type descriptors and the ahead-of-time schema registry.
//!
//! The original design resolved property names through runtime reflection on
//! live types. Here the lookup source is a registry populated up front: each
//! semantic type is identified by a string id and carries named, typed field
//! descriptors. Resolution logic is unchanged, only the lookup source moved.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Type id of the pseudo-record that exposes data-container slots as fields.
pub const SLOTS_TYPE_NAME: &str = "$slots";

/// Identifies a semantic type for dispatch.
///
/// `name` is the concrete type id (for list descriptors, the element type
/// id). `is_simple` marks scalar types that support generic value
/// formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
	pub name: String,
	pub is_list: bool,
	pub is_simple: bool,
}

impl TypeDescriptor {
	/// A scalar type (`String`, `Int`, ...).
	pub fn simple(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			is_list: false,
			is_simple: true,
		}
	}

	/// A record type registered in the schema.
	pub fn record(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			is_list: false,
			is_simple: false,
		}
	}

	/// A list whose elements are described by `element`.
	pub fn list_of(element: &TypeDescriptor) -> Self {
		Self {
			name: element.name.clone(),
			is_list: true,
			is_simple: false,
		}
	}

	/// The descriptor of one element of a list descriptor.
	///
	/// For non-list descriptors this is the descriptor itself.
	pub fn element(&self, registry: &SchemaRegistry) -> TypeDescriptor {
		if !self.is_list {
			return self.clone();
		}
		TypeDescriptor {
			name: self.name.clone(),
			is_list: false,
			is_simple: registry.is_simple(&self.name),
		}
	}
}

/// A named, typed field of a registered type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
	pub name: String,
	pub ty: TypeDescriptor,
}

/// Declared shape of one semantic type: fields plus base types searched
/// when a name does not resolve on the type itself.
#[derive(Debug, Clone, Serialize)]
pub struct TypeSchema {
	name: String,
	bases: Vec<String>,
	fields: Vec<FieldDescriptor>,
}

impl TypeSchema {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			bases: Vec::new(),
			fields: Vec::new(),
		}
	}

	/// Declare a field. Declaration order is preserved.
	pub fn field(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
		self.fields.push(FieldDescriptor {
			name: name.into(),
			ty,
		});
		self
	}

	/// Declare a base type whose fields are searched as a fallback.
	pub fn base(mut self, name: impl Into<String>) -> Self {
		self.bases.push(name.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields.iter().find(|f| f.name == name)
	}
}

/// Ahead-of-time registry mapping type ids to their declared shape.
///
/// The built-in simple types `String`, `Int`, `Float`, `Bool` and
/// `DateTime` are pre-registered with no fields.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
	types: BTreeMap<String, TypeSchema>,
	simple: BTreeSet<String>,
}

impl SchemaRegistry {
	pub fn new() -> Self {
		let mut simple = BTreeSet::new();
		for name in ["String", "Int", "Float", "Bool", "DateTime"] {
			simple.insert(name.to_string());
		}
		Self {
			types: BTreeMap::new(),
			simple,
		}
	}

	/// Register a type schema, replacing any earlier registration.
	pub fn register(&mut self, schema: TypeSchema) {
		self.types.insert(schema.name.clone(), schema);
	}

	pub fn contains(&self, type_name: &str) -> bool {
		self.types.contains_key(type_name)
	}

	pub fn is_simple(&self, type_name: &str) -> bool {
		self.simple.contains(type_name)
	}

	/// Declared fields of a type, in declaration order. Empty for unknown
	/// types.
	pub fn fields_of(&self, type_name: &str) -> &[FieldDescriptor] {
		self.types
			.get(type_name)
			.map(|s| s.fields.as_slice())
			.unwrap_or(&[])
	}

	/// Declared base types of a type. Empty for unknown types.
	pub fn bases_of(&self, type_name: &str) -> Vec<String> {
		self.types
			.get(type_name)
			.map(|s| s.bases.clone())
			.unwrap_or_default()
	}

	/// Resolve a field on `type_name`, searching declared base types
	/// depth-first when the type itself does not carry the field.
	pub fn lookup_field(&self, type_name: &str, field: &str) -> Option<&FieldDescriptor> {
		let mut visited = BTreeSet::new();
		self.lookup_field_inner(type_name, field, &mut visited)
	}

	fn lookup_field_inner<'a>(
		&'a self,
		type_name: &str,
		field: &str,
		visited: &mut BTreeSet<String>,
	) -> Option<&'a FieldDescriptor> {
		if !visited.insert(type_name.to_string()) {
			return None;
		}
		let schema = self.types.get(type_name)?;
		if let Some(found) = schema.find_field(field) {
			return Some(found);
		}
		for base in &schema.bases {
			if let Some(found) = self.lookup_field_inner(base, field, visited) {
				return Some(found);
			}
		}
		None
	}

	/// Whether `actual` is `declared` or transitively derives from it.
	pub fn is_assignable(&self, declared: &str, actual: &str) -> bool {
		if declared == actual {
			return true;
		}
		let mut visited = BTreeSet::new();
		self.derives_from(actual, declared, &mut visited)
	}

	fn derives_from(&self, ty: &str, target: &str, visited: &mut BTreeSet<String>) -> bool {
		if !visited.insert(ty.to_string()) {
			return false;
		}
		let Some(schema) = self.types.get(ty) else {
			return false;
		};
		schema
			.bases
			.iter()
			.any(|base| base == target || self.derives_from(base, target, visited))
	}
}

impl Default for SchemaRegistry {
	fn default() -> Self {
		Self::new()
	}
}
