use std::fmt::{self, Display, Formatter};

/// The closed operator tag set shared by every node in the tree.
///
/// A flat, exhaustively matched enum with a hand-written `Display` impl used
/// for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Frac,
    Pm,
    Pow,
    Subscript,
    Eql,
    Lt,
    Le,
    Gt,
    Ge,
    Comma,
    Colon,
    RightArrow,
    In,
    To,
    Sqrt,
    Vec,
    Abs,
    Paren,
    Sin,
    Cos,
    Tan,
    Sec,
    Cot,
    Csc,
    ArcSin,
    ArcCos,
    ArcTan,
    Ln,
    Lg,
    Log,
    Exp,
    Lim,
    Sum,
    Int,
    Prod,
    Percent,
    Fact,
    Binom,
    ForAll,
    Exists,
    /// Chemistry molar-mass marker, `\M(x)` / `M(x)` once bound in the environment.
    M,
    Var,
    Num,
    /// Named constant/symbol leaf (`\pi`, `\infty`, ...). See DESIGN.md for
    /// why there is no separate string-literal leaf tag.
    Cst,
    Row,
    Col,
    Matrix,
    Interval,
    List,
    Highlight,
}

impl Op {
    /// Binary-only operators: arity is exactly 2 at construction time and
    /// never grows.
    pub fn is_strictly_binary(self) -> bool {
        matches!(
            self,
            Op::Eql
                | Op::Lt
                | Op::Le
                | Op::Gt
                | Op::Ge
                | Op::Frac
                | Op::RightArrow
                | Op::In
                | Op::To
                | Op::Colon
        )
    }

    /// Operators that may be n-ary (arity >= 1, growable at construction time).
    pub fn is_nary(self) -> bool {
        matches!(self, Op::Add | Op::Mul | Op::Comma | Op::Row | Op::Col)
    }

    /// Leaf operators: their args are literal payloads, not child nodes.
    pub fn is_leaf(self) -> bool {
        matches!(self, Op::Var | Op::Num | Op::Cst)
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Op::Add => "ADD",
            Op::Sub => "SUB",
            Op::Mul => "MUL",
            Op::Div => "DIV",
            Op::Frac => "FRAC",
            Op::Pm => "PM",
            Op::Pow => "POW",
            Op::Subscript => "SUBSCRIPT",
            Op::Eql => "EQL",
            Op::Lt => "LT",
            Op::Le => "LE",
            Op::Gt => "GT",
            Op::Ge => "GE",
            Op::Comma => "COMMA",
            Op::Colon => "COLON",
            Op::RightArrow => "RIGHTARROW",
            Op::In => "IN",
            Op::To => "TO",
            Op::Sqrt => "SQRT",
            Op::Vec => "VEC",
            Op::Abs => "ABS",
            Op::Paren => "PAREN",
            Op::Sin => "SIN",
            Op::Cos => "COS",
            Op::Tan => "TAN",
            Op::Sec => "SEC",
            Op::Cot => "COT",
            Op::Csc => "CSC",
            Op::ArcSin => "ARCSIN",
            Op::ArcCos => "ARCCOS",
            Op::ArcTan => "ARCTAN",
            Op::Ln => "LN",
            Op::Lg => "LG",
            Op::Log => "LOG",
            Op::Exp => "EXP",
            Op::Lim => "LIM",
            Op::Sum => "SUM",
            Op::Int => "INT",
            Op::Prod => "PROD",
            Op::Percent => "PERCENT",
            Op::Fact => "FACT",
            Op::Binom => "BINOM",
            Op::ForAll => "FORALL",
            Op::Exists => "EXISTS",
            Op::M => "M",
            Op::Var => "VAR",
            Op::Num => "NUM",
            Op::Cst => "CST",
            Op::Row => "ROW",
            Op::Col => "COL",
            Op::Matrix => "MATRIX",
            Op::Interval => "INTERVAL",
            Op::List => "LIST",
            Op::Highlight => "HIGHLIGHT",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// `is_leaf`, `is_nary`, and `is_strictly_binary` partition the tag
        /// set: exactly one rule (or none, for plain fixed-arity operators
        /// like `SIN`/`SQRT`) ever applies to a given tag, never more than one.
        #[test]
        fn arity_class_rules_are_mutually_exclusive(op in any::<Op>()) {
            let classes = [op.is_leaf(), op.is_nary(), op.is_strictly_binary()];
            prop_assert!(classes.iter().filter(|c| **c).count() <= 1);
        }

        #[test]
        fn display_never_panics_or_empties(op in any::<Op>()) {
            prop_assert!(!op.to_string().is_empty());
        }
    }
}
