//! Escape-hatch script compilation and the shared artifact cache.
//!
//! An expression prefixed with `@` bypasses the mini-language grammar: its
//! raw text goes to an injected [`ScriptCompiler`] together with the current
//! slot schema, and the returned artifact is invoked as a unit at
//! evaluation time. Compiled artifacts are cached keyed by structurally
//! normalized source, so structurally identical scripts compile once. The
//! cache is append-only and safe for concurrent insertion; it is owned and
//! injected by the host rather than being ambient global state.

use crate::error::{ExpressionError, ExpressionResult};
use crate::schema::TypeDescriptor;
use crate::value::Value;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// One registered data-container slot as seen by the script compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDescriptor {
	pub name: String,
	pub ty: TypeDescriptor,
}

/// Read access to slot values at invocation time. Implemented by the
/// engine's data container.
pub trait SlotAccess {
	fn slot_value(&self, name: &str) -> Option<&Value>;
}

/// A compiled, invocable script artifact.
pub trait CompiledScript: Send + Sync {
	fn invoke(&self, slots: &dyn SlotAccess) -> ExpressionResult<Value>;
}

/// External compilation facility for escape-hatch expressions.
///
/// Receives the raw script text and the full slot schema; every registered
/// slot is to be exposed to the script as a named, typed accessor. A
/// reference to a slot the schema does not declare fails here, not in the
/// mini-language parser.
pub trait ScriptCompiler: Send + Sync {
	fn compile(
		&self,
		source: &str,
		schema: &[SlotDescriptor],
	) -> ExpressionResult<Arc<dyn CompiledScript>>;
}

static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapse whitespace runs so structurally identical scripts share one
/// cache entry.
pub fn normalize_source(source: &str) -> String {
	WHITESPACE_RUNS.replace_all(source.trim(), " ").into_owned()
}

/// Process-wide cache of compiled script artifacts.
///
/// Append-only: entries are never evicted, and a losing racer on insert
/// adopts the winner's artifact so lookups never observe a torn entry.
#[derive(Default)]
pub struct ScriptCache {
	entries: RwLock<HashMap<String, Arc<dyn CompiledScript>>>,
}

impl ScriptCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	/// Fetch the artifact for `source`, compiling on first sight.
	pub fn get_or_compile(
		&self,
		source: &str,
		schema: &[SlotDescriptor],
		compiler: &dyn ScriptCompiler,
	) -> ExpressionResult<Arc<dyn CompiledScript>> {
		let key = normalize_source(source);
		if let Some(artifact) = self.entries.read().get(&key) {
			return Ok(artifact.clone());
		}
		let compiled = compiler.compile(source, schema)?;
		let mut entries = self.entries.write();
		let artifact = entries.entry(key).or_insert(compiled);
		Ok(artifact.clone())
	}
}

/// Closure-backed compiler, convenient for hosts whose "native" facility
/// is itself Rust code, and for tests.
pub struct FnScriptCompiler<F> {
	compile: F,
}

impl<F> FnScriptCompiler<F>
where
	F: Fn(&str, &[SlotDescriptor]) -> ExpressionResult<Arc<dyn CompiledScript>> + Send + Sync,
{
	pub fn new(compile: F) -> Self {
		Self { compile }
	}
}

impl<F> ScriptCompiler for FnScriptCompiler<F>
where
	F: Fn(&str, &[SlotDescriptor]) -> ExpressionResult<Arc<dyn CompiledScript>> + Send + Sync,
{
	fn compile(
		&self,
		source: &str,
		schema: &[SlotDescriptor],
	) -> ExpressionResult<Arc<dyn CompiledScript>> {
		(self.compile)(source, schema)
	}
}

/// Closure-backed script artifact.
pub struct FnScript<F> {
	invoke: F,
}

impl<F> FnScript<F>
where
	F: Fn(&dyn SlotAccess) -> ExpressionResult<Value> + Send + Sync,
{
	pub fn new(invoke: F) -> Self {
		Self { invoke }
	}
}

impl<F> CompiledScript for FnScript<F>
where
	F: Fn(&dyn SlotAccess) -> ExpressionResult<Value> + Send + Sync,
{
	fn invoke(&self, slots: &dyn SlotAccess) -> ExpressionResult<Value> {
		(self.invoke)(slots)
	}
}

/// Read one named slot at invocation time, failing when it is not bound.
pub fn required_slot<'a>(slots: &'a dyn SlotAccess, name: &str) -> ExpressionResult<&'a Value> {
	slots
		.slot_value(name)
		.ok_or_else(|| ExpressionError::ScriptInvoke(format!("slot \"{name}\" is not bound")))
}
