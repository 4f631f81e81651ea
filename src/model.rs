//! The public facade: `Model` ties the pool, parser, renderer and
//! `Environment` together behind one API, plus a small plugin-dispatch
//! registry for external equivalence/evaluation collaborators.
//!
//! Plugins are stored as `HashMap<String, Rc<dyn Fn(...) -> Result<...>>>`,
//! callable as a method on any interned node.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use crate::environment::{Environment, Ident};
use crate::error::ParseError;
use crate::node::Node;
use crate::parser::{self, ParserConfig};
use crate::pool::{self, NodeId};
use crate::render;

/// A plugin's result, left deliberately open: plugin internals like numeric
/// evaluation and symbolic/chemical equivalence are out of scope for this
/// crate, which only fixes the shape of the call.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginValue {
    Bool(bool),
    Number(f64),
    Node(NodeId),
    Text(String),
}

/// Raised when a plugin is missing or a plugin body reports failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelError(pub String);

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ModelError {}

/// A plugin callable through [`Model::call`]: the receiver node is always
/// the first argument; a second node is forwarded only for binary
/// (equivalence-predicate style) plugins.
pub type PluginFn = Rc<dyn Fn(&Model, NodeId, Option<NodeId>) -> Result<PluginValue, ModelError>>;

/// A name -> plugin map shared by every `Model` a `ModelFactory` creates.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, PluginFn>,
}

impl PluginRegistry {
    pub fn new() -> PluginRegistry {
        PluginRegistry::default()
    }

    pub fn register(&mut self, name: impl Into<String>, plugin: PluginFn) {
        self.plugins.insert(name.into(), plugin);
    }

    pub fn get(&self, name: &str) -> Option<&PluginFn> {
        self.plugins.get(name)
    }
}

/// Builds `Model`s sharing one `ParserConfig` and one `PluginRegistry`. The
/// `Environment` stays with the embedder and is borrowed per `Model`.
#[derive(Clone, Default)]
pub struct ModelFactory {
    config: ParserConfig,
    plugins: PluginRegistry,
}

impl ModelFactory {
    pub fn new() -> ModelFactory {
        ModelFactory::default()
    }

    pub fn with_config(config: ParserConfig) -> ModelFactory {
        ModelFactory { config, plugins: PluginRegistry::new() }
    }

    pub fn register_plugin(&mut self, name: impl Into<String>, plugin: PluginFn) {
        self.plugins.register(name, plugin);
    }

    pub fn create<'a>(&'a self, env: &'a mut Environment) -> Model<'a> {
        Model { env, config: self.config, plugins: &self.plugins }
    }
}

/// The per-parse facade: owns nothing, borrows the caller's `Environment`
/// for its lifetime. `Environment` stays owned by the embedding application;
/// `Model` borrows it for the duration of a `parse` call.
pub struct Model<'a> {
    env: &'a mut Environment,
    config: ParserConfig,
    plugins: &'a PluginRegistry,
}

impl<'a> Model<'a> {
    /// Parses `src` and interns the resulting tree, returning its pool id.
    pub fn parse(&self, src: &str) -> Result<NodeId, ParseError> {
        let tree = parser::parse(src, self.env, self.config)?;
        Ok(pool::intern(&tree))
    }

    /// Renders an interned node back to LaTeX.
    pub fn render(&self, id: NodeId) -> String {
        render::render(&pool::node(id))
    }

    pub fn intern(&self, node: &Node) -> NodeId {
        pool::intern(node)
    }

    pub fn node(&self, id: NodeId) -> Node {
        pool::node(id)
    }

    pub fn dump(&self, id: NodeId) -> String {
        pool::dump(id)
    }

    pub fn dump_all(&self) -> String {
        pool::dump_all()
    }

    /// Resets the process-wide pool. Intended for tests only.
    pub fn clear(&self) {
        pool::clear()
    }

    pub fn push_env(&mut self, frame: HashMap<String, Ident>) {
        self.env.push(frame);
    }

    pub fn pop_env(&mut self) {
        self.env.pop();
    }

    /// Dispatches a registered plugin by name. `other` is forwarded only
    /// when the caller supplies a second node of the same model family (the
    /// two-node equivalence-predicate case); otherwise the call is unary.
    pub fn call(&self, name: &str, receiver: NodeId, other: Option<NodeId>) -> Result<PluginValue, ModelError> {
        let plugin = self.plugins.get(name).ok_or_else(|| ModelError(format!("no plugin registered under '{}'", name)))?;
        let callable: &dyn Fn(&Model, NodeId, Option<NodeId>) -> Result<PluginValue, ModelError> = plugin.as_ref();
        callable(self, receiver, other)
    }
}
