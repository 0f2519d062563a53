//! Parser behavior: resolution order, format rules, structural errors.

use super::Fixture;
use crate::ast::{ExprNode, ExpressionRoot};
use crate::error::ExpressionError;
use crate::parser::{parse, ParserContext};
use crate::schema::{TypeDescriptor, SLOTS_TYPE_NAME};
use crate::script::{CompiledScript, FnScript, FnScriptCompiler, ScriptCache, SlotDescriptor};
use crate::value::Value;
use rstest::rstest;
use std::sync::Arc;

fn customer_type() -> TypeDescriptor {
	TypeDescriptor::record("Customer")
}

#[rstest]
fn parses_dotted_chain_through_declared_fields() {
	// Arrange
	let fixture = Fixture::new();

	// Act
	let parsed = parse("Address.City", &customer_type(), &fixture.parser_context()).unwrap();

	// Assert
	assert_eq!(parsed.root, ExpressionRoot::Scope);
	let ExprNode::Property(address) = &parsed.node else {
		panic!("expected property");
	};
	assert_eq!(address.name, "Address");
	let ExprNode::Property(city) = address.next.as_deref().unwrap() else {
		panic!("expected property continuation");
	};
	assert_eq!(city.name, "City");
	assert_eq!(city.source_type, "Address");
	assert_eq!(city.returns, TypeDescriptor::simple("String"));
}

#[rstest]
fn fields_of_base_types_resolve() {
	// Arrange
	let fixture = Fixture::new();

	// Act
	let parsed = parse("Id", &customer_type(), &fixture.parser_context()).unwrap();

	// Assert
	let ExprNode::Property(id) = &parsed.node else {
		panic!("expected property");
	};
	assert_eq!(id.returns, TypeDescriptor::simple("Int"));
}

#[rstest]
fn instruction_resolvers_shadow_declared_fields() {
	// Arrange
	let fixture = Fixture::new();

	// Act: `Age` is both a declared field and a registered instruction
	let parsed = parse("Age", &customer_type(), &fixture.parser_context()).unwrap();

	// Assert
	assert!(matches!(parsed.node, ExprNode::Instruction(_)));
}

#[rstest]
fn first_token_falls_back_to_slot_schema() {
	// Arrange
	let fixture = Fixture::new();

	// Act
	let parsed = parse(
		"Items",
		&TypeDescriptor::record(SLOTS_TYPE_NAME),
		&fixture.parser_context(),
	)
	.unwrap();

	// Assert
	assert_eq!(parsed.root, ExpressionRoot::Slots);
	let ExprNode::Property(items) = &parsed.node else {
		panic!("expected property");
	};
	assert_eq!(items.source_type, SLOTS_TYPE_NAME);
	assert!(items.returns.is_list);
}

#[rstest]
fn slot_fallback_applies_to_first_token_only() {
	// Arrange
	let fixture = Fixture::new();

	// Act: `Address.Items` must not resolve `Items` through the slots
	let result = parse("Address.Items", &customer_type(), &fixture.parser_context());

	// Assert
	assert!(matches!(
		result,
		Err(ExpressionError::UnresolvedName { ref name, ref type_name, .. })
			if name == "Items" && type_name == "Address"
	));
}

#[rstest]
fn unresolved_name_reports_type_and_position() {
	// Arrange
	let fixture = Fixture::new();

	// Act
	let result = parse("Address.Planet", &customer_type(), &fixture.parser_context());

	// Assert
	assert!(matches!(
		result,
		Err(ExpressionError::UnresolvedName { ref name, position: 8, .. }) if name == "Planet"
	));
}

#[rstest]
fn string_format_parses_iff_a_capable_formatter_exists() {
	// Arrange
	let fixture = Fixture::new();

	// Act
	let ok = parse("Name:upper", &customer_type(), &fixture.parser_context());
	let missing = parse("Name:sparkle", &customer_type(), &fixture.parser_context());

	// Assert
	let parsed = ok.unwrap();
	let ExprNode::Format(format) = &parsed.node else {
		panic!("expected format node");
	};
	assert!(format.formatter.is_some());
	assert!(matches!(
		missing,
		Err(ExpressionError::UnsupportedFormat { ref format, .. }) if format == "sparkle"
	));
}

#[rstest]
fn simple_non_string_operands_use_generic_formatting() {
	// Arrange
	let fixture = Fixture::new();

	// Act
	let parsed = parse("Age.F0", &customer_type(), &fixture.parser_context());
	let parsed_colon = parse("Id:F0", &customer_type(), &fixture.parser_context()).unwrap();

	// Assert: dot chains into a simple type fail, the colon form works
	assert!(parsed.is_err());
	let ExprNode::Format(format) = &parsed_colon.node else {
		panic!("expected format node");
	};
	assert!(format.formatter.is_none());
}

#[rstest]
#[case("Orders:upper")]
#[case("Address:upper")]
fn lists_and_records_reject_format_specs(#[case] expression: &str) {
	// Arrange
	let fixture = Fixture::new();

	// Act
	let result = parse(expression, &customer_type(), &fixture.parser_context());

	// Assert
	assert!(matches!(
		result,
		Err(ExpressionError::UnsupportedFormat { .. })
	));
}

#[rstest]
fn tokens_after_format_spec_are_rejected() {
	// Arrange
	let fixture = Fixture::new();

	// Act
	let result = parse("Name:upper.Name", &customer_type(), &fixture.parser_context());

	// Assert
	assert!(matches!(
		result,
		Err(ExpressionError::TrailingTokens { ref format, .. }) if format == "upper"
	));
}

#[rstest]
#[case("Name.")]
#[case("Name:")]
#[case("")]
fn premature_end_is_reported(#[case] expression: &str) {
	// Arrange
	let fixture = Fixture::new();

	// Act
	let result = parse(expression, &customer_type(), &fixture.parser_context());

	// Assert
	assert!(matches!(result, Err(ExpressionError::PrematureEnd { .. })));
}

#[rstest]
#[case(".Name")]
#[case("Address..City")]
fn structural_empty_tokens_are_reported(#[case] expression: &str) {
	// Arrange
	let fixture = Fixture::new();

	// Act
	let result = parse(expression, &customer_type(), &fixture.parser_context());

	// Assert
	assert!(matches!(result, Err(ExpressionError::UnexpectedToken { .. })));
}

#[rstest]
fn executors_cannot_be_chained_into() {
	// Arrange
	let fixture = Fixture::new();

	// Act
	let result = parse(
		"MarkSent.Total",
		&TypeDescriptor::record("Order"),
		&fixture.parser_context(),
	);

	// Assert
	assert!(matches!(
		result,
		Err(ExpressionError::ExecutorMidChain { ref name }) if name == "MarkSent"
	));
}

#[rstest]
fn script_expressions_require_a_compiler() {
	// Arrange
	let fixture = Fixture::new();

	// Act
	let result = parse(
		"@Customer.Name.ToUpper()",
		&customer_type(),
		&fixture.parser_context(),
	);

	// Assert
	assert!(matches!(
		result,
		Err(ExpressionError::ScriptCompilerUnavailable)
	));
}

#[rstest]
fn undeclared_slot_fails_at_compilation_not_at_parse() {
	// Arrange: a compiler that resolves bare slot references
	let fixture = Fixture::new();
	let compiler = FnScriptCompiler::new(
		|source: &str, schema: &[SlotDescriptor]| {
			let root = source.split('.').next().unwrap_or(source).trim();
			if !schema.iter().any(|s| s.name == root) {
				return Err(ExpressionError::ScriptCompile(format!(
					"unknown accessor \"{root}\""
				)));
			}
			Ok(Arc::new(FnScript::new(|_| Ok(Value::Null))) as Arc<dyn CompiledScript>)
		},
	);
	let cache = ScriptCache::new();
	let ctx = ParserContext {
		compiler: Some(&compiler),
		cache: Some(&cache),
		..fixture.parser_context()
	};

	// Act
	let known = parse("@Customer.Name", &customer_type(), &ctx);
	let unknown = parse("@Basket.Name", &customer_type(), &ctx);

	// Assert: the mini-language grammar never saw either expression
	assert!(known.is_ok());
	assert!(matches!(
		unknown,
		Err(ExpressionError::ScriptCompile(ref reason)) if reason.contains("Basket")
	));
}
