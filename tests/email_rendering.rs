//! End-to-end rendering through the public facade.

use quintette::prelude::*;
use rstest::rstest;

fn order_schema() -> SchemaRegistry {
	let mut schema = SchemaRegistry::new();
	schema.register(TypeSchema::new("Customer").field("Name", TypeDescriptor::simple("String")));
	schema.register(
		TypeSchema::new("Line")
			.field("Sku", TypeDescriptor::simple("String"))
			.field("Total", TypeDescriptor::simple("Float")),
	);
	schema
}

fn order_container() -> DataContainer {
	let mut container = DataContainer::new();
	container
		.add_prop(
			TypeDescriptor::record("Customer"),
			"Customer",
			Value::Record(Value::record("Customer").with("Name", "ada")),
		)
		.unwrap();
	container
		.add_prop(
			TypeDescriptor::list_of(&TypeDescriptor::record("Line")),
			"Lines",
			Value::List(vec![
				Value::Record(
					Value::record("Line").with("Sku", "SKU-1").with("Total", 12.5),
				),
				Value::Record(
					Value::record("Line")
						.with("Sku", "SKU-2")
						.with("Total", 1200.0),
				),
			]),
		)
		.unwrap();
	container
		.add_prop(TypeDescriptor::simple("Bool"), "HasDiscount", true.into())
		.unwrap();
	container
}

fn order_template() -> NodeRef {
	div()
		.child(
			template()
				.template_id("greeting")
				.child(p().child(span().property("Name:upper").build()).build())
				.build(),
		)
		.child(div().value_template("greeting", "Customer").build())
		.child(p().when("HasDiscount").text("Discount applied").build())
		.child(
			table()
				.child(
					tbody()
						.child(
							div()
								.foreach("Lines")
								.child(
									tr()
										.child(td().property("Sku").build())
										.child(td().property("Total:N2").build())
										.build(),
								)
								.build(),
						)
						.build(),
				)
				.build(),
		)
		.build()
}

#[rstest]
fn renders_a_complete_order_email() {
	// Arrange
	let host = RenderHost::new(order_schema());
	let mut container = order_container();
	let mut visitors: Vec<Box<dyn BindingVisitor>> = vec![Box::new(TextBindingVisitor)];

	// Act
	let html = Renderer::new(&host)
		.render(&order_template(), &mut container, &mut visitors)
		.unwrap();

	// Assert
	assert_eq!(
		html,
		"<p><span>ADA</span></p>\
		 <p>Discount applied</p>\
		 <table><tbody>\
		 <tr><td>SKU-1</td><td>12.50</td></tr>\
		 <tr><td>SKU-2</td><td>1,200.00</td></tr>\
		 </tbody></table>"
	);
}

#[rstest]
fn repeated_renders_are_byte_identical() {
	// Arrange
	let host = RenderHost::new(order_schema());
	let render_once = || {
		let mut container = order_container();
		let mut visitors: Vec<Box<dyn BindingVisitor>> = vec![Box::new(TextBindingVisitor)];
		Renderer::new(&host)
			.render(&order_template(), &mut container, &mut visitors)
			.unwrap()
	};

	// Act / Assert
	assert_eq!(render_once(), render_once());
}

#[rstest]
fn validation_surfaces_unclaimed_bindings() {
	// Arrange: no visitors registered at all
	let host = RenderHost::new(order_schema());
	let mut container = order_container();
	let mut visitors: Vec<Box<dyn BindingVisitor>> = Vec::new();

	// Act
	let result = Renderer::with_config(&host, RenderConfig::new().validate_bindings(true))
		.render(&order_template(), &mut container, &mut visitors);

	// Assert
	assert!(matches!(result, Err(RenderError::UnhandledDirective { .. })));
}
