//! Per-iteration loop cursor.
//!
//! One cursor exists per `foreach` iteration, bound under the reserved
//! [`LOOP_SLOT`](crate::container::LOOP_SLOT) name for exactly the
//! duration of expanding that iteration's body clone. The cursor is a
//! tagged value carrying the boxed current element plus scalar loop
//! metadata; consumers recover the element's concrete type through the
//! schema registry rather than through a constructed generic.

use quintette_expression::{Record, TypeDescriptor, TypeSchema, Value};

/// Transient loop metadata plus the current element.
#[derive(Debug, Clone)]
pub struct LoopCursor {
	pub index: usize,
	pub position: usize,
	pub count: usize,
	pub is_first: bool,
	pub is_last: bool,
	pub is_odd: bool,
	pub current: Value,
}

impl LoopCursor {
	/// Semantic type id of the cursor record.
	pub const TYPE_NAME: &'static str = "LoopCursor";

	pub fn new(index: usize, count: usize, current: Value) -> Self {
		Self {
			index,
			position: index + 1,
			count,
			is_first: index == 0,
			is_last: index + 1 == count,
			is_odd: index % 2 == 1,
			current,
		}
	}

	pub fn descriptor() -> TypeDescriptor {
		TypeDescriptor::record(Self::TYPE_NAME)
	}

	/// Declared shape of the cursor's scalar metadata. `Current` is
	/// intentionally absent: its type varies per loop, and loop bodies
	/// address the element directly as their scope.
	pub fn schema() -> TypeSchema {
		TypeSchema::new(Self::TYPE_NAME)
			.field("Index", TypeDescriptor::simple("Int"))
			.field("Position", TypeDescriptor::simple("Int"))
			.field("Count", TypeDescriptor::simple("Int"))
			.field("IsFirst", TypeDescriptor::simple("Bool"))
			.field("IsLast", TypeDescriptor::simple("Bool"))
			.field("IsOdd", TypeDescriptor::simple("Bool"))
	}

	/// The cursor as the record value bound under the reserved slot.
	pub fn into_value(self) -> Value {
		Value::Record(
			Record::new(Self::TYPE_NAME)
				.with("Index", self.index as i64)
				.with("Position", self.position as i64)
				.with("Count", self.count as i64)
				.with("IsFirst", self.is_first)
				.with("IsLast", self.is_last)
				.with("IsOdd", self.is_odd)
				.with("Current", self.current),
		)
	}
}
