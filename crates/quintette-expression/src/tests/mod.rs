//! Parser and evaluator test suites.

mod eval_tests;
mod parser_tests;

use crate::format::FormatterRegistry;
use crate::instruction::{InstructionDefinition, MapResolver, ResolverSet};
use crate::parser::ParserContext;
use crate::schema::{SchemaRegistry, TypeDescriptor, TypeSchema};
use crate::script::SlotDescriptor;
use crate::value::Value;
use std::sync::Arc;

/// Shared fixture: a small commerce schema with slots, one custom
/// instruction and one executor.
pub(crate) struct Fixture {
	pub schema: SchemaRegistry,
	pub resolvers: ResolverSet,
	pub formatters: FormatterRegistry,
	pub slots: Vec<SlotDescriptor>,
}

impl Fixture {
	pub fn new() -> Self {
		let mut schema = SchemaRegistry::new();
		schema.register(TypeSchema::new("Entity").field("Id", TypeDescriptor::simple("Int")));
		schema.register(
			TypeSchema::new("Customer")
				.base("Entity")
				.field("Name", TypeDescriptor::simple("String"))
				.field("Age", TypeDescriptor::simple("Int"))
				.field("Address", TypeDescriptor::record("Address"))
				.field(
					"Orders",
					TypeDescriptor::list_of(&TypeDescriptor::record("Order")),
				),
		);
		schema.register(
			TypeSchema::new("Address").field("City", TypeDescriptor::simple("String")),
		);
		schema.register(TypeSchema::new("Order").field("Total", TypeDescriptor::simple("Float")));

		let mut instructions = MapResolver::new();
		instructions.register(InstructionDefinition::value(
			"Customer",
			"Greeting",
			TypeDescriptor::simple("String"),
			|customer| {
				let name = match customer {
					Value::Record(r) => r
						.get("Name")
						.map(|v| v.to_string())
						.unwrap_or_default(),
					_ => String::new(),
				};
				Ok(Value::String(format!("Hello, {name}!")))
			},
		));
		// Shadows the declared `Age` field on purpose.
		instructions.register(InstructionDefinition::value(
			"Customer",
			"Age",
			TypeDescriptor::simple("Int"),
			|_| Ok(Value::Int(99)),
		));
		instructions.register(InstructionDefinition::executor("Order", "MarkSent", |_| {
			Ok(())
		}));
		let mut resolvers = ResolverSet::new();
		resolvers.push(Arc::new(instructions));

		let slots = vec![
			SlotDescriptor {
				name: "Customer".to_string(),
				ty: TypeDescriptor::record("Customer"),
			},
			SlotDescriptor {
				name: "Items".to_string(),
				ty: TypeDescriptor::list_of(&TypeDescriptor::record("Customer")),
			},
		];

		Self {
			schema,
			resolvers,
			formatters: FormatterRegistry::with_builtins(),
			slots,
		}
	}

	pub fn parser_context(&self) -> ParserContext<'_> {
		ParserContext {
			schema: &self.schema,
			resolvers: &self.resolvers,
			formatters: &self.formatters,
			slots: &self.slots,
			compiler: None,
			cache: None,
		}
	}

	pub fn customer(name: &str) -> Value {
		Value::Record(
			Value::record("Customer")
				.with("Id", 7i64)
				.with("Name", name)
				.with("Age", 30i64)
				.with(
					"Address",
					Value::record("Address").with("City", "Paris"),
				)
				.with(
					"Orders",
					Value::List(vec![
						Value::Record(Value::record("Order").with("Total", 12.5)),
						Value::Record(Value::record("Order").with("Total", 20.0)),
					]),
				),
		)
	}
}
