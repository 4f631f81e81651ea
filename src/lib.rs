//! # mathcore
//!
//! A LaTeX math/chemistry expression parser, structural-hashing interning
//! pool, and LaTeX renderer, built for driving an automated grading tool's
//! equivalence checks rather than for typesetting.
//!
//! ## Pipeline
//!
//! An expression goes through three stages, each its own module:
//!
//! 1. [`scanner`] turns a LaTeX string into a stream of [`scanner::Token`]s,
//!    extended by an [`environment::Environment`] so chemistry symbols and
//!    other multi-character identifiers scan as one token instead of being
//!    split letter-by-letter.
//! 2. [`parser`] consumes that stream and builds a [`node::Node`] tree,
//!    applying a fixed set of normalizing rewrites (fraction to reciprocal
//!    multiplication, unary minus absorbed into addition, and so on) so that
//!    expressions that mean the same thing produce the same tree shape.
//! 3. That tree is interned into the process-wide [`pool`], which
//!    deduplicates identical subtrees and hands back a stable [`pool::NodeId`]
//!    — two expressions are equivalent exactly when they intern to the same
//!    id. [`render`] goes the other way, turning an interned (or freestanding)
//!    tree back into LaTeX.
//!
//! [`model::Model`] ties these three stages together behind one API, plus a
//! small registry for plugging in external equivalence/evaluation
//! collaborators that this crate deliberately doesn't implement itself:
//! numeric evaluation and symbolic/chemical equivalence are plugin
//! concerns, not parser concerns.
//!
//! ```
//! use mathcore::environment::Environment;
//! use mathcore::model::ModelFactory;
//!
//! let mut env = Environment::new();
//! let factory = ModelFactory::new();
//! let model = factory.create(&mut env);
//!
//! // "3 - 2" and "3 + (-2)" normalize to the same tree, so they intern
//! // to the same id regardless of which one a student typed.
//! let a = model.parse("3 - 2").unwrap();
//! let b = model.parse("3 + (-2)").unwrap();
//! assert_eq!(a, b);
//! ```

pub mod common;
pub mod environment;
pub mod error;
pub mod model;
pub mod node;
pub mod op;
pub mod parser;
pub mod pool;
pub mod render;
pub mod scanner;

pub use environment::{Environment, Ident};
pub use error::{ErrorCode, ImplementationError, ParseError};
pub use model::{Model, ModelError, ModelFactory, PluginFn, PluginRegistry, PluginValue};
pub use node::{Arg, Attrs, Node, NumberFormat};
pub use op::Op;
pub use parser::{IdentityScaler, NumberScaler, Parser, ParserConfig};
pub use pool::NodeId;
pub use scanner::{Scanner, Token};
