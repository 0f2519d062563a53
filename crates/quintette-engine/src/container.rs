//! Named, typed slot registry exposed to expressions.
//!
//! Hosts register their model objects here before a render; the walker
//! pushes and pops the reserved `Loop` and `Value` slots around one
//! expansion step. Slot order is registration order, so the schema handed
//! to the script compiler and the snapshot record are deterministic.

use crate::error::{RenderError, RenderResult};
use quintette_expression::{
	Record, SlotAccess, SlotDescriptor, TypeDescriptor, Value, SLOTS_TYPE_NAME,
};

/// Reserved slot name carrying the loop cursor during one `foreach`
/// body expansion. Not re-entrant.
pub const LOOP_SLOT: &str = "Loop";

/// Reserved slot name carrying the bound value during one value-template
/// expansion.
pub const VALUE_SLOT: &str = "Value";

#[derive(Debug, Clone)]
struct Slot {
	name: String,
	ty: TypeDescriptor,
	value: Value,
}

/// Name-and-type keyed slot registry for one render instance.
#[derive(Debug, Clone, Default)]
pub struct DataContainer {
	slots: Vec<Slot>,
}

impl DataContainer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a slot. Names are unique.
	pub fn add_prop(
		&mut self,
		ty: TypeDescriptor,
		name: impl Into<String>,
		value: Value,
	) -> RenderResult<()> {
		let name = name.into();
		if self.slots.iter().any(|s| s.name == name) {
			return Err(RenderError::DuplicateSlot { name });
		}
		self.slots.push(Slot { name, ty, value });
		Ok(())
	}

	/// Overwrite the value of a registered slot.
	pub fn set(&mut self, name: &str, value: Value) -> RenderResult<()> {
		let slot = self
			.slots
			.iter_mut()
			.find(|s| s.name == name)
			.ok_or_else(|| RenderError::MissingSlot {
				name: name.to_string(),
			})?;
		slot.value = value;
		Ok(())
	}

	/// Required lookup by name.
	pub fn get(&self, name: &str) -> RenderResult<&Value> {
		self.try_get(name).ok_or_else(|| RenderError::MissingSlot {
			name: name.to_string(),
		})
	}

	pub fn try_get(&self, name: &str) -> Option<&Value> {
		self.slots.iter().find(|s| s.name == name).map(|s| &s.value)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.slots.iter().any(|s| s.name == name)
	}

	/// Required lookup by type; the type must identify exactly one slot.
	pub fn get_by_type(&self, type_name: &str) -> RenderResult<&Value> {
		let mut matches = self.slots.iter().filter(|s| s.ty.name == type_name);
		let first = matches.next().ok_or_else(|| RenderError::MissingSlot {
			name: type_name.to_string(),
		})?;
		let extra = matches.count();
		if extra > 0 {
			return Err(RenderError::AmbiguousTypeLookup {
				type_name: type_name.to_string(),
				count: extra + 1,
			});
		}
		Ok(&first.value)
	}

	/// Overwrite the value of the unique slot of a type.
	pub fn set_by_type(&mut self, type_name: &str, value: Value) -> RenderResult<()> {
		let mut indices = self
			.slots
			.iter()
			.enumerate()
			.filter(|(_, s)| s.ty.name == type_name)
			.map(|(i, _)| i);
		let first = indices.next().ok_or_else(|| RenderError::MissingSlot {
			name: type_name.to_string(),
		})?;
		let extra = indices.count();
		if extra > 0 {
			return Err(RenderError::AmbiguousTypeLookup {
				type_name: type_name.to_string(),
				count: extra + 1,
			});
		}
		self.slots[first].value = value;
		Ok(())
	}

	/// Remove a slot, failing when it is not registered.
	pub fn remove(&mut self, name: &str) -> RenderResult<Value> {
		self.unbind(name)
			.map(|(_, value)| value)
			.ok_or_else(|| RenderError::MissingSlot {
				name: name.to_string(),
			})
	}

	/// Remove a slot if present, returning its type and value for later
	/// restoration.
	pub fn unbind(&mut self, name: &str) -> Option<(TypeDescriptor, Value)> {
		let index = self.slots.iter().position(|s| s.name == name)?;
		let slot = self.slots.remove(index);
		Some((slot.ty, slot.value))
	}

	/// The (name, type) projection handed to the expression parser and
	/// the script compiler.
	pub fn slot_schema(&self) -> Vec<SlotDescriptor> {
		self.slots
			.iter()
			.map(|s| SlotDescriptor {
				name: s.name.clone(),
				ty: s.ty.clone(),
			})
			.collect()
	}

	/// Snapshot of all slots as one record, the evaluation root for
	/// slot-rooted expressions.
	pub fn snapshot_record(&self) -> Value {
		let mut record = Record::new(SLOTS_TYPE_NAME);
		for slot in &self.slots {
			record.set(slot.name.clone(), slot.value.clone());
		}
		Value::Record(record)
	}
}

impl SlotAccess for DataContainer {
	fn slot_value(&self, name: &str) -> Option<&Value> {
		self.try_get(name)
	}
}
