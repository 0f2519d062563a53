//! Runtime value model shared by the evaluator and the rendering engine.
//!
//! Field maps are ordered so that repeated renders of identical input data
//! produce byte-identical output.

use crate::error::{ExpressionError, ExpressionResult};
use crate::schema::{SchemaRegistry, TypeDescriptor};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// A runtime value flowing through expression evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	DateTime(DateTime<Utc>),
	List(Vec<Value>),
	Record(Record),
}

/// A typed record: a semantic type id plus ordered named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
	type_name: String,
	fields: BTreeMap<String, Value>,
}

impl Record {
	pub fn new(type_name: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
			fields: BTreeMap::new(),
		}
	}

	/// Set a field, replacing any earlier value.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.fields.insert(name.into(), value.into());
		self
	}

	pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		self.fields.insert(name.into(), value.into());
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.get(name)
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}
}

impl Value {
	pub fn record(type_name: impl Into<String>) -> Record {
		Record::new(type_name)
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// The runtime type id used for source-type consistency checks.
	pub fn type_name(&self) -> &str {
		match self {
			Value::Null => "Null",
			Value::Bool(_) => "Bool",
			Value::Int(_) => "Int",
			Value::Float(_) => "Float",
			Value::String(_) => "String",
			Value::DateTime(_) => "DateTime",
			Value::List(_) => "List",
			Value::Record(r) => r.type_name(),
		}
	}

	/// Descriptor of this value's runtime type.
	pub fn type_descriptor(&self) -> TypeDescriptor {
		match self {
			Value::Null => TypeDescriptor::record("Null"),
			Value::Bool(_) => TypeDescriptor::simple("Bool"),
			Value::Int(_) => TypeDescriptor::simple("Int"),
			Value::Float(_) => TypeDescriptor::simple("Float"),
			Value::String(_) => TypeDescriptor::simple("String"),
			Value::DateTime(_) => TypeDescriptor::simple("DateTime"),
			Value::List(items) => {
				let element = items
					.iter()
					.find(|v| !v.is_null())
					.map(Value::type_descriptor)
					.unwrap_or_else(|| TypeDescriptor::record("Null"));
				TypeDescriptor::list_of(&element)
			}
			Value::Record(r) => TypeDescriptor::record(r.type_name()),
		}
	}

	/// Bridge a `serde_json::Value` into the runtime model against a
	/// declared type.
	///
	/// Declared fields absent from the JSON object become `Null`; JSON
	/// members without a declared field are ignored. `DateTime` fields
	/// accept RFC 3339 strings.
	pub fn from_json(
		json: &serde_json::Value,
		ty: &TypeDescriptor,
		registry: &SchemaRegistry,
	) -> ExpressionResult<Value> {
		if json.is_null() {
			return Ok(Value::Null);
		}
		if ty.is_list {
			let serde_json::Value::Array(items) = json else {
				return Err(conversion_error(ty, json));
			};
			let element = ty.element(registry);
			let converted = items
				.iter()
				.map(|item| Value::from_json(item, &element, registry))
				.collect::<ExpressionResult<Vec<_>>>()?;
			return Ok(Value::List(converted));
		}
		match ty.name.as_str() {
			"String" => json
				.as_str()
				.map(|s| Value::String(s.to_string()))
				.ok_or_else(|| conversion_error(ty, json)),
			"Int" => json
				.as_i64()
				.map(Value::Int)
				.ok_or_else(|| conversion_error(ty, json)),
			"Float" => json
				.as_f64()
				.map(Value::Float)
				.ok_or_else(|| conversion_error(ty, json)),
			"Bool" => json
				.as_bool()
				.map(Value::Bool)
				.ok_or_else(|| conversion_error(ty, json)),
			"DateTime" => {
				let text = json.as_str().ok_or_else(|| conversion_error(ty, json))?;
				DateTime::parse_from_rfc3339(text)
					.map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
					.map_err(|_| conversion_error(ty, json))
			}
			record_type => {
				let serde_json::Value::Object(members) = json else {
					return Err(conversion_error(ty, json));
				};
				let mut record = Record::new(record_type);
				if let Some(schema) = registry_fields(registry, record_type) {
					for field in schema {
						let value = match members.get(&field.name) {
							Some(member) => Value::from_json(member, &field.ty, registry)?,
							None => Value::Null,
						};
						record.set(field.name.clone(), value);
					}
				}
				Ok(Value::Record(record))
			}
		}
	}
}

fn registry_fields<'a>(
	registry: &'a SchemaRegistry,
	type_name: &str,
) -> Option<Vec<crate::schema::FieldDescriptor>> {
	// Fields plus inherited ones, nearest declaration winning.
	if !registry.contains(type_name) {
		return None;
	}
	let mut seen = std::collections::BTreeSet::new();
	let mut fields = Vec::new();
	collect_fields(registry, type_name, &mut seen, &mut fields);
	Some(fields)
}

fn collect_fields(
	registry: &SchemaRegistry,
	type_name: &str,
	seen: &mut std::collections::BTreeSet<String>,
	out: &mut Vec<crate::schema::FieldDescriptor>,
) {
	for field in registry.fields_of(type_name) {
		if seen.insert(field.name.clone()) {
			out.push(field.clone());
		}
	}
	for base in registry.bases_of(type_name) {
		collect_fields(registry, &base, seen, out);
	}
}

fn conversion_error(ty: &TypeDescriptor, json: &serde_json::Value) -> ExpressionError {
	let found = match json {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "boolean",
		serde_json::Value::Number(_) => "number",
		serde_json::Value::String(_) => "string",
		serde_json::Value::Array(_) => "array",
		serde_json::Value::Object(_) => "object",
	};
	ExpressionError::JsonConversion {
		expected: if ty.is_list {
			format!("list of {}", ty.name)
		} else {
			ty.name.clone()
		},
		found: found.to_string(),
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => Ok(()),
			Value::Bool(b) => write!(f, "{b}"),
			Value::Int(i) => write!(f, "{i}"),
			Value::Float(x) => write!(f, "{x}"),
			Value::String(s) => f.write_str(s),
			Value::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
			Value::List(items) => {
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				Ok(())
			}
			Value::Record(r) => f.write_str(r.type_name()),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int(v as i64)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::String(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::String(v)
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(v: DateTime<Utc>) -> Self {
		Value::DateTime(v)
	}
}

impl From<Record> for Value {
	fn from(v: Record) -> Self {
		Value::Record(v)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(v: Vec<T>) -> Self {
		Value::List(v.into_iter().map(Into::into).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::TypeSchema;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn json_bridging_follows_declared_fields() {
		// Arrange
		let mut registry = SchemaRegistry::new();
		registry.register(
			TypeSchema::new("Customer")
				.field("Name", TypeDescriptor::simple("String"))
				.field("Age", TypeDescriptor::simple("Int")),
		);
		let json = json!({"Name": "Alice", "Age": 30, "Ignored": true});

		// Act
		let value =
			Value::from_json(&json, &TypeDescriptor::record("Customer"), &registry).unwrap();

		// Assert
		let Value::Record(record) = value else {
			panic!("expected record");
		};
		assert_eq!(record.get("Name"), Some(&Value::String("Alice".into())));
		assert_eq!(record.get("Age"), Some(&Value::Int(30)));
		assert_eq!(record.get("Ignored"), None);
	}

	#[rstest]
	fn json_bridging_rejects_mismatched_scalars() {
		// Arrange
		let registry = SchemaRegistry::new();

		// Act
		let result = Value::from_json(&json!("text"), &TypeDescriptor::simple("Int"), &registry);

		// Assert
		assert!(matches!(
			result,
			Err(ExpressionError::JsonConversion { .. })
		));
	}

	#[rstest]
	fn missing_declared_fields_become_null() {
		// Arrange
		let mut registry = SchemaRegistry::new();
		registry
			.register(TypeSchema::new("Customer").field("Name", TypeDescriptor::simple("String")));

		// Act
		let value =
			Value::from_json(&json!({}), &TypeDescriptor::record("Customer"), &registry).unwrap();

		// Assert
		let Value::Record(record) = value else {
			panic!("expected record");
		};
		assert_eq!(record.get("Name"), Some(&Value::Null));
	}

	#[rstest]
	fn display_is_stable_for_scalars() {
		// Arrange / Act / Assert
		assert_eq!(Value::Null.to_string(), "");
		assert_eq!(Value::Int(7).to_string(), "7");
		assert_eq!(Value::Bool(false).to_string(), "false");
		assert_eq!(Value::from(vec![1i64, 2, 3]).to_string(), "1, 2, 3");
	}
}
