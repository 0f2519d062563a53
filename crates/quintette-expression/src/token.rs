//! Expression tokenizer.
//!
//! Splits an expression string into structural tokens on `.` and `:`.
//! Expressions starting with the escape prefix bypass tokenization: the
//! remainder is carried whole as opaque script text. No validation happens
//! here; empty tokens surface as positioned parse errors later.

/// Prefix marking the remainder of an expression as opaque script text.
pub const SCRIPT_PREFIX: char = '@';

/// Separator that introduced a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
	Dot,
	Colon,
}

/// One structural token with its byte position in the source expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	pub text: String,
	pub position: usize,
	/// The separator immediately before this token; `None` for the first.
	pub leading: Option<Separator>,
}

/// Tokenizer output: either opaque script text or an ordered token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tokenized {
	Script(String),
	Tokens(Vec<Token>),
}

/// Split an expression into tokens, or peel off the script prefix.
pub fn tokenize(input: &str) -> Tokenized {
	if let Some(rest) = input.strip_prefix(SCRIPT_PREFIX) {
		return Tokenized::Script(rest.to_string());
	}

	let mut tokens = Vec::new();
	let mut start = 0;
	let mut leading = None;
	for (offset, ch) in input.char_indices() {
		let separator = match ch {
			'.' => Separator::Dot,
			':' => Separator::Colon,
			_ => continue,
		};
		tokens.push(Token {
			text: input[start..offset].to_string(),
			position: start,
			leading,
		});
		leading = Some(separator);
		start = offset + ch.len_utf8();
	}
	tokens.push(Token {
		text: input[start..].to_string(),
		position: start,
		leading,
	});
	Tokenized::Tokens(tokens)
}
