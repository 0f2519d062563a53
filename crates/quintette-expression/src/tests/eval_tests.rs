//! Evaluator behavior: fan-out, short-circuits, mutation gating.

use super::Fixture;
use crate::error::ExpressionError;
use crate::eval::{EvalContext, Evaluator};
use crate::parser::{parse, ParserContext};
use crate::schema::TypeDescriptor;
use crate::script::{CompiledScript, FnScript, FnScriptCompiler, SlotAccess, SlotDescriptor};
use crate::value::Value;
use rstest::rstest;
use std::sync::Arc;

fn customer_type() -> TypeDescriptor {
	TypeDescriptor::record("Customer")
}

struct NoSlots;

impl SlotAccess for NoSlots {
	fn slot_value(&self, _name: &str) -> Option<&Value> {
		None
	}
}

#[rstest]
fn evaluates_dotted_chain() {
	// Arrange
	let fixture = Fixture::new();
	let parsed = parse("Address.City", &customer_type(), &fixture.parser_context()).unwrap();

	// Act
	let values = Evaluator::new(&fixture.schema)
		.evaluate(&parsed.node, &Fixture::customer("Ada"), &EvalContext::new(true))
		.unwrap();

	// Assert
	assert_eq!(values, vec![Value::String("Paris".into())]);
}

#[rstest]
fn null_intermediate_short_circuits() {
	// Arrange
	let fixture = Fixture::new();
	let parsed = parse("Address.City", &customer_type(), &fixture.parser_context()).unwrap();
	let customer = Value::Record(
		Value::record("Customer")
			.with("Name", "Ada")
			.with("Address", Value::Null),
	);

	// Act
	let values = Evaluator::new(&fixture.schema)
		.evaluate(&parsed.node, &customer, &EvalContext::new(true))
		.unwrap();

	// Assert
	assert_eq!(values, vec![Value::Null]);
}

#[rstest]
fn list_valued_terminal_fans_out() {
	// Arrange
	let fixture = Fixture::new();
	let parsed = parse("Orders", &customer_type(), &fixture.parser_context()).unwrap();

	// Act
	let values = Evaluator::new(&fixture.schema)
		.evaluate(&parsed.node, &Fixture::customer("Ada"), &EvalContext::new(true))
		.unwrap();

	// Assert
	assert_eq!(values.len(), 2);
}

#[rstest]
fn multi_value_intermediate_link_is_fatal() {
	// Arrange: two orders, so `Orders.Total` is ambiguous
	let fixture = Fixture::new();
	let parsed = parse("Orders.Total", &customer_type(), &fixture.parser_context()).unwrap();

	// Act
	let result = Evaluator::new(&fixture.schema).evaluate(
		&parsed.node,
		&Fixture::customer("Ada"),
		&EvalContext::new(true),
	);

	// Assert
	assert!(matches!(
		result,
		Err(ExpressionError::AmbiguousChain { ref name, count: 2 }) if name == "Orders"
	));
}

#[rstest]
fn single_element_list_chains_through() {
	// Arrange
	let fixture = Fixture::new();
	let parsed = parse("Orders.Total", &customer_type(), &fixture.parser_context()).unwrap();
	let customer = Value::Record(Value::record("Customer").with(
		"Orders",
		Value::List(vec![Value::Record(
			Value::record("Order").with("Total", 12.5),
		)]),
	));

	// Act
	let values = Evaluator::new(&fixture.schema)
		.evaluate(&parsed.node, &customer, &EvalContext::new(true))
		.unwrap();

	// Assert
	assert_eq!(values, vec![Value::Float(12.5)]);
}

#[rstest]
fn executor_runs_only_when_mutation_is_allowed() {
	// Arrange
	let fixture = Fixture::new();
	let parsed = parse(
		"MarkSent",
		&TypeDescriptor::record("Order"),
		&fixture.parser_context(),
	)
	.unwrap();
	let order = Value::Record(Value::record("Order").with("Total", 1.0));
	let evaluator = Evaluator::new(&fixture.schema);

	// Act
	let allowed = evaluator.evaluate(&parsed.node, &order, &EvalContext::new(true));
	let denied = evaluator.evaluate(&parsed.node, &order, &EvalContext::new(false));

	// Assert: executors produce no values and honor the mutation gate
	assert_eq!(allowed.unwrap(), Vec::<Value>::new());
	assert!(matches!(
		denied,
		Err(ExpressionError::MutationDenied { ref name }) if name == "MarkSent"
	));
}

#[rstest]
fn mismatched_context_type_is_an_internal_error() {
	// Arrange
	let fixture = Fixture::new();
	let parsed = parse("Name", &customer_type(), &fixture.parser_context()).unwrap();
	let not_a_customer = Value::Record(Value::record("Order").with("Total", 1.0));

	// Act
	let result = Evaluator::new(&fixture.schema).evaluate(
		&parsed.node,
		&not_a_customer,
		&EvalContext::new(true),
	);

	// Assert
	assert!(matches!(
		result,
		Err(ExpressionError::SourceTypeMismatch { ref declared, ref actual })
			if declared == "Customer" && actual == "Order"
	));
}

#[rstest]
fn subtype_context_passes_the_source_check() {
	// Arrange: resolved against `Entity`, the runtime value is `Customer`
	let fixture = Fixture::new();
	let parsed = parse(
		"Id",
		&TypeDescriptor::record("Entity"),
		&fixture.parser_context(),
	)
	.unwrap();

	// Act
	let values = Evaluator::new(&fixture.schema)
		.evaluate(&parsed.node, &Fixture::customer("Ada"), &EvalContext::new(true))
		.unwrap();

	// Assert
	assert_eq!(values, vec![Value::Int(7)]);
}

#[rstest]
fn script_results_flatten_enumerables_only() {
	// Arrange
	let fixture = Fixture::new();
	let list_script = FnScriptCompiler::new(|_: &str, _: &[SlotDescriptor]| {
		Ok(Arc::new(FnScript::new(|_| {
			Ok(Value::List(vec![Value::Int(1), Value::Int(2)]))
		})) as Arc<dyn CompiledScript>)
	});
	let ctx = ParserContext {
		compiler: Some(&list_script),
		..fixture.parser_context()
	};
	let parsed = parse("@pair()", &customer_type(), &ctx).unwrap();

	// Act
	let values = Evaluator::new(&fixture.schema)
		.evaluate(
			&parsed.node,
			&Value::Null,
			&EvalContext::new(true).with_slots(&NoSlots),
		)
		.unwrap();

	// Assert
	assert_eq!(values, vec![Value::Int(1), Value::Int(2)]);
}

#[rstest]
fn format_applies_to_evaluated_value() {
	// Arrange
	let fixture = Fixture::new();
	let parsed = parse("Name:upper", &customer_type(), &fixture.parser_context()).unwrap();

	// Act
	let values = Evaluator::new(&fixture.schema)
		.evaluate(&parsed.node, &Fixture::customer("ada"), &EvalContext::new(true))
		.unwrap();

	// Assert
	assert_eq!(values, vec![Value::String("ADA".into())]);
}

#[rstest]
fn formatting_null_yields_null() {
	// Arrange
	let fixture = Fixture::new();
	let parsed = parse("Name:upper", &customer_type(), &fixture.parser_context()).unwrap();
	let customer = Value::Record(Value::record("Customer").with("Name", Value::Null));

	// Act
	let values = Evaluator::new(&fixture.schema)
		.evaluate(&parsed.node, &customer, &EvalContext::new(true))
		.unwrap();

	// Assert
	assert_eq!(values, vec![Value::Null]);
}
