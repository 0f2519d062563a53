//! Instruction model and pluggable resolvers.
//!
//! An instruction binds (source type, name) to a value-producing or
//! side-effecting operation, usable in an expression wherever a plain
//! property lookup would be. Resolvers are consulted in registration order
//! before the schema registry, so a custom instruction shadows a
//! same-named declared field.

use crate::error::ExpressionResult;
use crate::schema::TypeDescriptor;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Produces one value from the context object.
pub type ValueGetter = Arc<dyn Fn(&Value) -> ExpressionResult<Value> + Send + Sync>;

/// Produces a sequence of values from the context object.
pub type ListGetter = Arc<dyn Fn(&Value) -> ExpressionResult<Vec<Value>> + Send + Sync>;

/// Side-effecting operation with no return value. Must terminate a chain.
pub type Executor = Arc<dyn Fn(&Value) -> ExpressionResult<()> + Send + Sync>;

/// The operation an instruction performs.
#[derive(Clone)]
pub enum InstructionKind {
	Value(ValueGetter),
	List(ListGetter),
	Execute(Executor),
}

impl fmt::Debug for InstructionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			InstructionKind::Value(_) => f.write_str("Value"),
			InstructionKind::List(_) => f.write_str("List"),
			InstructionKind::Execute(_) => f.write_str("Execute"),
		}
	}
}

/// A named binding between a source type and an operation.
#[derive(Clone)]
pub struct InstructionDefinition {
	pub source_type: String,
	pub name: String,
	/// Declared return type; `None` for executors, which return nothing.
	pub returns: Option<TypeDescriptor>,
	pub kind: InstructionKind,
}

impl InstructionDefinition {
	pub fn value(
		source_type: impl Into<String>,
		name: impl Into<String>,
		returns: TypeDescriptor,
		getter: impl Fn(&Value) -> ExpressionResult<Value> + Send + Sync + 'static,
	) -> Self {
		Self {
			source_type: source_type.into(),
			name: name.into(),
			returns: Some(returns),
			kind: InstructionKind::Value(Arc::new(getter)),
		}
	}

	pub fn list(
		source_type: impl Into<String>,
		name: impl Into<String>,
		element: TypeDescriptor,
		getter: impl Fn(&Value) -> ExpressionResult<Vec<Value>> + Send + Sync + 'static,
	) -> Self {
		Self {
			source_type: source_type.into(),
			name: name.into(),
			returns: Some(TypeDescriptor::list_of(&element)),
			kind: InstructionKind::List(Arc::new(getter)),
		}
	}

	pub fn executor(
		source_type: impl Into<String>,
		name: impl Into<String>,
		executor: impl Fn(&Value) -> ExpressionResult<()> + Send + Sync + 'static,
	) -> Self {
		Self {
			source_type: source_type.into(),
			name: name.into(),
			returns: None,
			kind: InstructionKind::Execute(Arc::new(executor)),
		}
	}
}

impl fmt::Debug for InstructionDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InstructionDefinition")
			.field("source_type", &self.source_type)
			.field("name", &self.name)
			.field("returns", &self.returns)
			.field("kind", &self.kind)
			.finish()
	}
}

/// Pluggable lookup of (source type, name) to an instruction.
pub trait InstructionResolver: Send + Sync {
	fn resolve(&self, source_type: &str, name: &str) -> Option<InstructionDefinition>;
}

/// Ordered resolver list; the first match wins.
#[derive(Clone, Default)]
pub struct ResolverSet {
	resolvers: Vec<Arc<dyn InstructionResolver>>,
}

impl ResolverSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, resolver: Arc<dyn InstructionResolver>) {
		self.resolvers.push(resolver);
	}

	pub fn resolve(&self, source_type: &str, name: &str) -> Option<InstructionDefinition> {
		self.resolvers
			.iter()
			.find_map(|r| r.resolve(source_type, name))
	}

	pub fn is_empty(&self) -> bool {
		self.resolvers.is_empty()
	}
}

/// Map-backed resolver for statically registered instructions.
#[derive(Clone, Default)]
pub struct MapResolver {
	instructions: BTreeMap<(String, String), InstructionDefinition>,
}

impl MapResolver {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, definition: InstructionDefinition) {
		self.instructions.insert(
			(definition.source_type.clone(), definition.name.clone()),
			definition,
		);
	}
}

impl InstructionResolver for MapResolver {
	fn resolve(&self, source_type: &str, name: &str) -> Option<InstructionDefinition> {
		self.instructions
			.get(&(source_type.to_string(), name.to_string()))
			.cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn first_matching_resolver_wins() {
		// Arrange
		let mut first = MapResolver::new();
		first.register(InstructionDefinition::value(
			"Customer",
			"Greeting",
			TypeDescriptor::simple("String"),
			|_| Ok(Value::String("first".into())),
		));
		let mut second = MapResolver::new();
		second.register(InstructionDefinition::value(
			"Customer",
			"Greeting",
			TypeDescriptor::simple("String"),
			|_| Ok(Value::String("second".into())),
		));
		let mut set = ResolverSet::new();
		set.push(Arc::new(first));
		set.push(Arc::new(second));

		// Act
		let definition = set.resolve("Customer", "Greeting").unwrap();
		let InstructionKind::Value(getter) = &definition.kind else {
			panic!("expected value getter");
		};

		// Assert
		assert_eq!(getter(&Value::Null).unwrap(), Value::String("first".into()));
	}

	#[rstest]
	fn executors_carry_no_return_type() {
		// Arrange / Act
		let definition = InstructionDefinition::executor("Order", "MarkSent", |_| Ok(()));

		// Assert
		assert!(definition.returns.is_none());
	}
}
