use std::rc::Rc;

use crate::common::span::Span;
use crate::op::Op;

/// The format a `NUM` leaf's lexeme was written in, kept as a sideband hint
/// for renderers/plugins. Not part of structural identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    Integer,
    Decimal,
}

/// Informational attributes attached to a node by the parser. Sideband only;
/// none of these participate in interning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs {
    pub lbrk: Option<char>,
    pub rbrk: Option<char>,
    pub is_fraction: bool,
    pub is_mixed_fraction: bool,
    pub is_binomial: bool,
    pub has_thousands_separator: bool,
    pub number_format: Option<NumberFormat>,
    pub explicit_operator: Option<char>,
    pub span: Option<Span>,
}

/// A single argument slot of a `Node`: either a literal leaf payload or a
/// nested subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Lit(Rc<str>),
    Node(Box<Node>),
}

impl Arg {
    pub fn lit(s: impl Into<Rc<str>>) -> Arg {
        Arg::Lit(s.into())
    }

    pub fn node(n: Node) -> Arg {
        Arg::Node(Box::new(n))
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Arg::Node(n) => Some(n),
            Arg::Lit(_) => None,
        }
    }

    pub fn into_node(self) -> Option<Node> {
        match self {
            Arg::Node(n) => Some(*n),
            Arg::Lit(_) => None,
        }
    }

    pub fn as_lit(&self) -> Option<&str> {
        match self {
            Arg::Lit(s) => Some(s),
            Arg::Node(_) => None,
        }
    }
}

/// An AST node: an operator tag plus an ordered sequence of argument slots,
/// plus sideband attributes that are informational only.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub op: Op,
    pub args: Vec<Arg>,
    pub attrs: Attrs,
}

impl Node {
    pub fn new(op: Op, args: Vec<Arg>) -> Node {
        Node { op, args, attrs: Attrs::default() }
    }

    pub fn leaf(op: Op, payload: impl Into<Rc<str>>) -> Node {
        debug_assert!(op.is_leaf(), "{} is not a leaf operator", op);
        Node { op, args: vec![Arg::lit(payload)], attrs: Attrs::default() }
    }

    pub fn inner(op: Op, children: Vec<Node>) -> Node {
        debug_assert!(!op.is_leaf(), "{} is a leaf operator, use Node::leaf", op);
        Node { op, args: children.into_iter().map(Arg::node).collect(), attrs: Attrs::default() }
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Node {
        self.attrs = attrs;
        self
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// The node's leaf payload, if this is a `VAR`/`NUM`/`CST` node.
    pub fn payload(&self) -> Option<&str> {
        if self.op.is_leaf() {
            self.args.first().and_then(Arg::as_lit)
        } else {
            None
        }
    }

    /// Children as nodes; panics (an implementation error) if this is a leaf.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.args.iter().map(move |a| {
            a.as_node()
                .unwrap_or_else(|| panic!("leaf argument found on non-leaf node {}", self.op))
        })
    }

    pub fn is_num(&self, text: &str) -> bool {
        self.op == Op::Num && self.payload() == Some(text)
    }
}
