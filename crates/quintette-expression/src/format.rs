//! Value formatters for trailing format specs.
//!
//! A format spec (`Expr:name`) resolves in one of two ways. String-typed
//! operands require a registered [`ValueFormatter`] whose `can_format`
//! accepts the name. Other simple-typed operands go through generic scalar
//! formatting: named date formats for `DateTime`, `F<n>`/`N<n>` precision
//! forms for numbers.

use crate::error::{ExpressionError, ExpressionResult};
use crate::value::Value;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Pluggable string formatter.
pub trait ValueFormatter: Send + Sync {
	/// Whether this formatter handles the given format name.
	fn can_format(&self, name: &str) -> bool;

	/// Format a value under the given format name.
	fn format(&self, name: &str, value: &Value) -> ExpressionResult<String>;
}

/// Ordered formatter registry; lookup returns the first formatter whose
/// `can_format` accepts the name.
#[derive(Clone)]
pub struct FormatterRegistry {
	formatters: Vec<Arc<dyn ValueFormatter>>,
}

impl FormatterRegistry {
	/// An empty registry. String-typed format specs will fail to parse
	/// until a capable formatter is registered.
	pub fn new() -> Self {
		Self {
			formatters: Vec::new(),
		}
	}

	/// A registry pre-populated with the built-in casing formatters
	/// (`upper`, `lower`, `title`, `trim`).
	pub fn with_builtins() -> Self {
		let mut registry = Self::new();
		registry.register(BUILTIN_CASING.clone());
		registry
	}

	pub fn register(&mut self, formatter: Arc<dyn ValueFormatter>) {
		self.formatters.push(formatter);
	}

	pub fn find(&self, name: &str) -> Option<Arc<dyn ValueFormatter>> {
		self.formatters
			.iter()
			.find(|f| f.can_format(name))
			.cloned()
	}
}

impl Default for FormatterRegistry {
	fn default() -> Self {
		Self::with_builtins()
	}
}

static BUILTIN_CASING: Lazy<Arc<dyn ValueFormatter>> = Lazy::new(|| Arc::new(CasingFormatter));

/// Built-in string casing formatter.
struct CasingFormatter;

impl ValueFormatter for CasingFormatter {
	fn can_format(&self, name: &str) -> bool {
		matches!(name, "upper" | "lower" | "title" | "trim")
	}

	fn format(&self, name: &str, value: &Value) -> ExpressionResult<String> {
		let text = value.to_string();
		let formatted = match name {
			"upper" => text.to_uppercase(),
			"lower" => text.to_lowercase(),
			"title" => title_case(&text),
			"trim" => text.trim().to_string(),
			other => {
				return Err(ExpressionError::FormatFailed {
					format: other.to_string(),
					reason: "not a casing format".to_string(),
				});
			}
		};
		Ok(formatted)
	}
}

fn title_case(text: &str) -> String {
	text.split_whitespace()
		.map(|word| {
			let mut chars = word.chars();
			match chars.next() {
				Some(first) => {
					first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
				}
				None => String::new(),
			}
		})
		.collect::<Vec<_>>()
		.join(" ")
}

/// Generic formatting for non-string scalar operands.
///
/// `DateTime` accepts the named formats `date`, `time`, `datetime` and
/// `rfc3339`. Numbers accept `F<n>` (fixed precision) and `N<n>` (grouped
/// thousands with fixed precision). Booleans render as `true`/`false`
/// under any name.
pub fn format_scalar(value: &Value, format: &str) -> ExpressionResult<String> {
	match value {
		Value::DateTime(dt) => {
			let pattern = match format {
				"date" => "%Y-%m-%d",
				"time" => "%H:%M:%S",
				"datetime" => "%Y-%m-%d %H:%M:%S",
				"rfc3339" => return Ok(dt.to_rfc3339()),
				other => {
					return Err(ExpressionError::FormatFailed {
						format: other.to_string(),
						reason: "unknown date format".to_string(),
					});
				}
			};
			Ok(dt.format(pattern).to_string())
		}
		Value::Int(i) => format_number(*i as f64, format),
		Value::Float(x) => format_number(*x, format),
		Value::Bool(b) => Ok(b.to_string()),
		other => Err(ExpressionError::FormatFailed {
			format: format.to_string(),
			reason: format!("type {} has no generic formatting", other.type_name()),
		}),
	}
}

fn format_number(value: f64, format: &str) -> ExpressionResult<String> {
	let (grouped, digits) = parse_numeric_format(format).ok_or_else(|| {
		ExpressionError::FormatFailed {
			format: format.to_string(),
			reason: "unknown numeric format".to_string(),
		}
	})?;
	let fixed = format!("{value:.digits$}");
	if !grouped {
		return Ok(fixed);
	}
	Ok(group_thousands(&fixed))
}

fn parse_numeric_format(format: &str) -> Option<(bool, usize)> {
	let mut chars = format.chars();
	let grouped = match chars.next()? {
		'F' => false,
		'N' => true,
		_ => return None,
	};
	let rest = chars.as_str();
	let digits = if rest.is_empty() {
		2
	} else {
		rest.parse::<usize>().ok().filter(|d| *d <= 9)?
	};
	Some((grouped, digits))
}

fn group_thousands(fixed: &str) -> String {
	let (sign, unsigned) = match fixed.strip_prefix('-') {
		Some(rest) => ("-", rest),
		None => ("", fixed),
	};
	let (integer, fraction) = match unsigned.split_once('.') {
		Some((i, f)) => (i, Some(f)),
		None => (unsigned, None),
	};
	let mut grouped = String::new();
	for (i, ch) in integer.chars().enumerate() {
		if i > 0 && (integer.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(ch);
	}
	match fraction {
		Some(f) => format!("{sign}{grouped}.{f}"),
		None => format!("{sign}{grouped}"),
	}
}
