//! Render facade.
//!
//! [`RenderHost`] bundles the long-lived collaborators (schema registry,
//! instruction resolvers, formatters, script compiler and cache) shared by
//! every render against one model world. [`Renderer`] drives a single
//! pass: extract inline templates, walk the tree, optionally validate
//! bindings, assemble the output.

use crate::assemble::DocumentAssembler;
use crate::container::DataContainer;
use crate::cursor::LoopCursor;
use crate::error::RenderResult;
use crate::inline::InlineTemplateRegistry;
use crate::visitor::BindingVisitor;
use crate::walker::{TemplateWalker, WalkScope};
use quintette_dom::NodeRef;
use quintette_expression::{
	FormatterRegistry, InstructionResolver, ResolverSet, SchemaRegistry, ScriptCache,
	ScriptCompiler, ValueFormatter,
};
use std::sync::Arc;

/// Long-lived collaborator bundle for rendering.
pub struct RenderHost {
	schema: SchemaRegistry,
	resolvers: ResolverSet,
	formatters: FormatterRegistry,
	compiler: Option<Arc<dyn ScriptCompiler>>,
	cache: Arc<ScriptCache>,
}

impl RenderHost {
	/// Build a host around a schema registry. The loop cursor's schema is
	/// registered so cursor metadata resolves in expressions.
	pub fn new(mut schema: SchemaRegistry) -> Self {
		schema.register(LoopCursor::schema());
		Self {
			schema,
			resolvers: ResolverSet::new(),
			formatters: FormatterRegistry::with_builtins(),
			compiler: None,
			cache: Arc::new(ScriptCache::new()),
		}
	}

	/// Append an instruction resolver; earlier resolvers win.
	pub fn with_resolver(mut self, resolver: Arc<dyn InstructionResolver>) -> Self {
		self.resolvers.push(resolver);
		self
	}

	/// Register an additional value formatter.
	pub fn with_formatter(mut self, formatter: Arc<dyn ValueFormatter>) -> Self {
		self.formatters.register(formatter);
		self
	}

	/// Replace the formatter registry entirely.
	pub fn with_formatters(mut self, formatters: FormatterRegistry) -> Self {
		self.formatters = formatters;
		self
	}

	/// Configure the escape-hatch script compiler.
	pub fn with_compiler(mut self, compiler: Arc<dyn ScriptCompiler>) -> Self {
		self.compiler = Some(compiler);
		self
	}

	/// Share a script cache with other hosts; the cache is the one
	/// structure expected to be shared across concurrently running
	/// renders.
	pub fn with_script_cache(mut self, cache: Arc<ScriptCache>) -> Self {
		self.cache = cache;
		self
	}

	pub fn schema(&self) -> &SchemaRegistry {
		&self.schema
	}

	pub fn resolvers(&self) -> &ResolverSet {
		&self.resolvers
	}

	pub fn formatters(&self) -> &FormatterRegistry {
		&self.formatters
	}

	pub fn compiler(&self) -> Option<&dyn ScriptCompiler> {
		self.compiler.as_deref()
	}

	pub fn cache(&self) -> &ScriptCache {
		&self.cache
	}

	pub fn script_cache(&self) -> Arc<ScriptCache> {
		self.cache.clone()
	}
}

/// Per-render configuration.
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
	validate_bindings: bool,
	email_envelope: bool,
}

impl RenderConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Raise an unhandled-directive error for bound nodes no visitor
	/// claimed. Off by default: unmatched nodes are silently left alone.
	pub fn validate_bindings(mut self, validate: bool) -> Self {
		self.validate_bindings = validate;
		self
	}

	/// Wrap the assembled output in a minimal HTML email document.
	pub fn email_envelope(mut self, envelope: bool) -> Self {
		self.email_envelope = envelope;
		self
	}
}

/// Drives one render pass over one tree.
pub struct Renderer<'h> {
	host: &'h RenderHost,
	config: RenderConfig,
}

impl<'h> Renderer<'h> {
	pub fn new(host: &'h RenderHost) -> Self {
		Self {
			host,
			config: RenderConfig::default(),
		}
	}

	pub fn with_config(host: &'h RenderHost, config: RenderConfig) -> Self {
		Self { host, config }
	}

	/// Render `root`'s content against the registered slots.
	///
	/// The tree is mutated in place; the returned artifact is the
	/// serialized concatenation of the root's remaining children.
	pub fn render(
		&self,
		root: &NodeRef,
		container: &mut DataContainer,
		visitors: &mut Vec<Box<dyn BindingVisitor>>,
	) -> RenderResult<String> {
		tracing::debug!(
			validate = self.config.validate_bindings,
			"Starting render pass"
		);
		let templates = InlineTemplateRegistry::extract(root)?;
		if !templates.is_empty() {
			tracing::debug!(count = templates.len(), "Extracted inline templates");
		}

		let scope = WalkScope::slots(container);
		let mut walker = TemplateWalker::new(self.host, container, &templates, visitors, true);
		walker.walk(root, &scope)?;
		walker.finish(self.config.validate_bindings)?;

		let mut assembler = DocumentAssembler::new();
		for child in root.children() {
			assembler.push_node(&child);
		}
		let output = if self.config.email_envelope {
			assembler.into_email_document()
		} else {
			assembler.assemble()
		};
		tracing::debug!(bytes = output.len(), "Render pass complete");
		Ok(output)
	}
}
