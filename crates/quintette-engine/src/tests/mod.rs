//! Walker and render pipeline test suites.


use crate::container::DataContainer;
use crate::render::RenderHost;
use crate::visitor::{BindingVisitor, TextBindingVisitor};
use quintette_expression::{SchemaRegistry, TypeDescriptor, TypeSchema, Value};

/// Host over a small commerce schema.
pub(crate) fn commerce_host() -> RenderHost {
	let mut schema = SchemaRegistry::new();
	schema.register(
		TypeSchema::new("Customer")
			.field("Name", TypeDescriptor::simple("String"))
			.field("Address", TypeDescriptor::record("Address")),
	);
	schema.register(TypeSchema::new("Address").field("City", TypeDescriptor::simple("String")));
	RenderHost::new(schema)
}

pub(crate) fn customer(name: &str) -> Value {
	Value::Record(
		Value::record("Customer")
			.with("Name", name)
			.with("Address", Value::record("Address").with("City", "Paris")),
	)
}

/// Container with an `Items` sequence and an `IsVisible` flag.
pub(crate) fn commerce_container(items: Vec<Value>, visible: bool) -> DataContainer {
	let mut container = DataContainer::new();
	container
		.add_prop(
			TypeDescriptor::list_of(&TypeDescriptor::record("Customer")),
			"Items",
			Value::List(items),
		)
		.expect("fresh container");
	container
		.add_prop(TypeDescriptor::simple("Bool"), "IsVisible", visible.into())
		.expect("fresh container");
	container
}

pub(crate) fn text_visitors() -> Vec<Box<dyn BindingVisitor>> {
	vec![Box::new(TextBindingVisitor)]
}
