//! The precedence-climbing recursive-descent expression parser: one token of
//! lookahead, inline tree-rewriting normalizations, and a pluggable numeric
//! scaler seam.
//!
//! Built around a `current`/`advance`, `eat`-with-structured-error loop over
//! a small precedence ladder, with recursive match-and-rebuild tree rewrites
//! applied inline as each production returns.

pub mod config;
pub mod number;

use std::rc::Rc;

use crate::common::source::Code;
use crate::common::span::Span;
use crate::environment::Environment;
use crate::error::ParseError;
use crate::node::{Arg, Attrs, Node, NumberFormat};
use crate::op::Op;
use crate::scanner::{Scanner, Token};

pub use config::ParserConfig;
pub use number::{IdentityScaler, NumberScaler};

/// Parses `src` against `env` with the default (no-op) numeric scaler.
pub fn parse(src: &str, env: &Environment, config: ParserConfig) -> Result<Node, ParseError> {
    Parser::new(src, env, config)?.parse()
}

pub struct Parser<'a> {
    scanner: Scanner<'a>,
    env: &'a Environment,
    config: ParserConfig,
    scaler: &'a dyn NumberScaler,
    chemistry_mode: bool,
}

impl<'a> Parser<'a> {
    pub fn new(src: &str, env: &'a Environment, config: ParserConfig) -> Result<Parser<'a>, ParseError> {
        static IDENTITY: IdentityScaler = IdentityScaler;
        Parser::with_scaler(src, env, config, &IDENTITY)
    }

    pub fn with_scaler(
        src: &str,
        env: &'a Environment,
        config: ParserConfig,
        scaler: &'a dyn NumberScaler,
    ) -> Result<Parser<'a>, ParseError> {
        let code = Rc::new(Code::new(src));
        let scanner = Scanner::new(code, env, config.allow_thousands_separator, config.ignore_text)?;
        let chemistry_mode = env.has_chemistry_elements();
        Ok(Parser { scanner, env, config, scaler, chemistry_mode })
    }

    /// Parses a complete top-level expression, failing with `TrailingInput`
    /// if anything remains afterward.
    pub fn parse(&mut self) -> Result<Node, ParseError> {
        let tree = self.comma()?;
        if *self.hd() != Token::Eof {
            return Err(ParseError::trailing_input(&self.hd().to_string(), self.span()));
        }
        Ok(tree)
    }

    fn hd(&self) -> &Token {
        self.scanner.hd()
    }

    fn span(&self) -> Span {
        self.scanner.span()
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.scanner.next()?;
        Ok(())
    }

    fn eat(&mut self, expected: Token) -> Result<(), ParseError> {
        if *self.hd() == expected {
            self.advance()
        } else {
            Err(ParseError::syntax(&expected.to_string(), &self.hd().describe(), self.span()))
        }
    }

    fn starts_value(&self) -> bool {
        self.starts_exponential() || matches!(self.hd(), Token::Plus | Token::Minus | Token::Pm | Token::Caret)
    }

    fn starts_exponential(&self) -> bool {
        matches!(
            self.hd(),
            Token::Num(_)
                | Token::Var(_)
                | Token::LParen
                | Token::LBracket
                | Token::LBrace
                | Token::Pipe
                | Token::Frac
                | Token::Sqrt
                | Token::Vec
                | Token::Binom
                | Token::Sin
                | Token::Cos
                | Token::Tan
                | Token::Sec
                | Token::Cot
                | Token::Csc
                | Token::ArcSin
                | Token::ArcCos
                | Token::ArcTan
                | Token::Ln
                | Token::Lg
                | Token::Log
                | Token::Lim
                | Token::Exp
                | Token::Sum
                | Token::Int
                | Token::Prod
                | Token::Exists
                | Token::ForAll
                | Token::M
                | Token::Begin
                | Token::Circ
        )
    }

    // ---- grammar, in declining precedence ----

    fn comma(&mut self) -> Result<Node, ParseError> {
        let first = self.equal()?;
        if !matches!(self.hd(), Token::Comma) {
            return Ok(first);
        }
        let mut args = vec![first];
        while matches!(self.hd(), Token::Comma) {
            self.advance()?;
            args.push(self.equal()?);
        }
        Ok(Node::inner(Op::Comma, args))
    }

    fn synthesized_underscore() -> Node {
        Node::leaf(Op::Var, "_")
    }

    fn equal(&mut self) -> Result<Node, ParseError> {
        let mut left = if self.starts_value() {
            self.relational()?
        } else {
            Self::synthesized_underscore()
        };
        loop {
            let op = match self.hd() {
                Token::Eq => Op::Eql,
                Token::Arrow | Token::RightArrow => Op::RightArrow,
                _ => break,
            };
            self.advance()?;
            let right = if self.starts_value() { self.relational()? } else { Self::synthesized_underscore() };
            left = Node::inner(op, vec![left, right]);
        }
        Ok(left)
    }

    fn relational(&mut self) -> Result<Node, ParseError> {
        let mut left = if self.starts_value() {
            self.additive()?
        } else {
            Self::synthesized_underscore()
        };
        loop {
            let op = match self.hd() {
                Token::Lt => Op::Lt,
                Token::Le => Op::Le,
                Token::Gt => Op::Gt,
                Token::Ge => Op::Ge,
                Token::Colon => Op::Colon,
                Token::In => Op::In,
                Token::To => Op::To,
                _ => break,
            };
            self.advance()?;
            let right = if self.starts_value() { self.additive()? } else { Self::synthesized_underscore() };
            left = Node::inner(op, vec![left, right]);
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<Node, ParseError> {
        let mut acc = self.multiplicative()?;
        loop {
            match self.hd() {
                Token::Plus => {
                    self.advance()?;
                    let rhs = self.multiplicative()?;
                    acc = self.fold_add(acc, rhs);
                }
                Token::Minus => {
                    self.advance()?;
                    let rhs = self.multiplicative()?;
                    let negated = self.negate(rhs);
                    acc = self.fold_add(acc, negated);
                }
                Token::Pm => {
                    self.advance()?;
                    let rhs = self.multiplicative()?;
                    acc = Node::inner(Op::Pm, vec![acc, rhs]);
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    /// Flattens into an existing `ADD` n-ary node, or starts one.
    fn fold_add(&self, acc: Node, rhs: Node) -> Node {
        if acc.op == Op::Add {
            let mut acc = acc;
            acc.args.push(Arg::node(rhs));
            acc
        } else {
            Node::inner(Op::Add, vec![acc, rhs])
        }
    }

    /// Both prefix and binary minus normalize to negation-absorption into
    /// `ADD`/`MUL` rather than a standalone `SUB` node, since this is a
    /// structural-equivalence engine: `3 - 2` and `3 + (-2)` must intern
    /// identically. `Op::Sub` stays in the closed tag set purely for
    /// directly constructed trees and the renderer.
    fn negate(&self, node: Node) -> Node {
        if node.op == Op::Num {
            let payload = node.payload().unwrap_or("0");
            let negated = match payload.strip_prefix('-') {
                Some(rest) => rest.to_string(),
                None => format!("-{}", payload),
            };
            return Node::leaf(Op::Num, negated);
        }
        if node.op == Op::Mul {
            let mut node = node;
            node.args.insert(0, Arg::node(Node::leaf(Op::Num, "-1")));
            return node;
        }
        Node::inner(Op::Mul, vec![Node::leaf(Op::Num, "-1"), node])
    }

    fn multiplicative(&mut self) -> Result<Node, ParseError> {
        let mut acc = self.exponential()?;
        loop {
            if matches!(self.hd(), Token::Star) {
                self.advance()?;
                let rhs = self.exponential()?;
                acc = self.combine_mul(acc, rhs, false);
            } else if matches!(self.hd(), Token::Slash) {
                self.advance()?;
                let rhs = self.exponential()?;
                acc = Node::inner(Op::Div, vec![acc, rhs]);
            } else if self.starts_exponential() {
                let rhs = self.exponential()?;
                acc = self.combine_mul(acc, rhs, true);
            } else {
                break;
            }
        }
        Ok(acc)
    }

    fn is_chem_leaf(&self, node: &Node) -> bool {
        node.op == Op::Var && node.payload().map_or(false, |p| self.env.lookup(p).is_some())
    }

    /// Adjacent chemistry symbols concatenate under `ADD`, and a leading
    /// numeric coefficient factors out of that `ADD`
    /// (e.g. `2NaCl` -> `MUL(2, ADD(Na, Cl))`).
    fn try_chemistry_concat(&self, acc: &Node, rhs: &Node) -> Option<Node> {
        if !self.chemistry_mode || !self.is_chem_leaf(rhs) {
            return None;
        }
        if self.is_chem_leaf(acc) {
            return Some(Node::inner(Op::Add, vec![acc.clone(), rhs.clone()]));
        }
        if acc.op == Op::Mul && acc.args.len() == 2 {
            let coeff = acc.args[0].as_node()?.clone();
            let tail = acc.args[1].as_node()?;
            if self.is_chem_leaf(tail) {
                let merged = Node::inner(Op::Add, vec![tail.clone(), rhs.clone()]);
                return Some(Node::inner(Op::Mul, vec![coeff, merged]));
            }
            if tail.op == Op::Add && tail.children().all(|c| self.is_chem_leaf(c)) {
                let mut merged = tail.clone();
                merged.args.push(Arg::node(rhs.clone()));
                return Some(Node::inner(Op::Mul, vec![coeff, merged]));
            }
        }
        if acc.op == Op::Add && acc.children().all(|c| self.is_chem_leaf(c)) {
            let mut merged = acc.clone();
            merged.args.push(Arg::node(rhs.clone()));
            return Some(merged);
        }
        None
    }

    fn combine_mul(&self, acc: Node, rhs: Node, implicit: bool) -> Node {
        if implicit && rhs.attrs.is_fraction {
            let leading_ok = self.config.permissive_mixed_fractions || acc.op == Op::Num;
            if leading_ok {
                let leading_negative = acc.payload().map_or(false, |p| p.starts_with('-'));
                let acc_for_mix = acc.clone();
                let frac_term = if leading_negative { self.negate(rhs) } else { rhs };
                return Node::inner(Op::Add, vec![acc_for_mix, frac_term])
                    .with_attrs(Attrs { is_mixed_fraction: true, ..Default::default() });
            }
        }
        if implicit {
            if let Some(merged) = self.try_chemistry_concat(&acc, &rhs) {
                return merged;
            }
        }
        if acc.op == Op::Mul {
            let mut acc = acc;
            acc.args.push(Arg::node(rhs));
            acc
        } else {
            Node::inner(Op::Mul, vec![acc, rhs])
        }
    }

    fn exponential(&mut self) -> Result<Node, ParseError> {
        let mut base = self.subscript()?;
        while matches!(self.hd(), Token::Caret) {
            self.advance()?;
            if self.chemistry_mode && self.is_chem_leaf(&base) {
                if let Some(ion) = self.try_ion_exponent()? {
                    base = Node::inner(Op::Pow, vec![base, ion]);
                    continue;
                }
            }
            let exponent = self.unary()?;
            if is_bare_degree(&exponent) {
                base = Node::inner(Op::Mul, vec![base, exponent]);
            } else {
                base = Node::inner(Op::Pow, vec![base, exponent]);
            }
        }
        Ok(base)
    }

    /// Chemistry ion exponents: `Al^+`, `Al^-`, `Al^{3+}`, `Al^{2-}`. Called
    /// with the `^` already consumed; `None` means "not an ion exponent,"
    /// in which case the caller falls back to a plain `POW`.
    fn try_ion_exponent(&mut self) -> Result<Option<Node>, ParseError> {
        match self.hd().clone() {
            Token::Plus => {
                self.advance()?;
                Ok(Some(Node::inner(Op::Add, vec![Node::leaf(Op::Num, "1")])))
            }
            Token::Minus => {
                self.advance()?;
                Ok(Some(Node::inner(Op::Sub, vec![Node::leaf(Op::Num, "1")])))
            }
            Token::LBrace => {
                self.advance()?;
                let coeff = match self.hd().clone() {
                    Token::Num(n) => {
                        self.advance()?;
                        n
                    }
                    _ => "1".to_string(),
                };
                let sign_op = match self.hd().clone() {
                    Token::Plus => {
                        self.advance()?;
                        Op::Add
                    }
                    Token::Minus => {
                        self.advance()?;
                        Op::Sub
                    }
                    other => {
                        return Err(ParseError::syntax("'+' or '-' in ion exponent", &other.describe(), self.span()))
                    }
                };
                self.eat(Token::RBrace)?;
                Ok(Some(Node::inner(sign_op, vec![Node::leaf(Op::Num, coeff)])))
            }
            _ => Ok(None),
        }
    }

    fn subscript(&mut self) -> Result<Node, ParseError> {
        let mut base = self.unary()?;
        while matches!(self.hd(), Token::Underscore) {
            self.advance()?;
            let sub = self.unary()?;
            base = Node::inner(Op::Subscript, vec![base, sub]);
        }
        Ok(base)
    }

    fn unary(&mut self) -> Result<Node, ParseError> {
        match self.hd() {
            Token::Plus => {
                self.advance()?;
                self.unary()
            }
            Token::Minus => {
                self.advance()?;
                let inner = self.unary()?;
                Ok(self.negate(inner))
            }
            Token::Pm => {
                self.advance()?;
                let inner = self.unary()?;
                Ok(Node::inner(Op::Pm, vec![inner]))
            }
            Token::Caret => {
                self.advance()?;
                self.unary()
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<Node, ParseError> {
        let mut node = self.primary()?;
        loop {
            match self.hd() {
                Token::Percent => {
                    self.advance()?;
                    node = Node::inner(Op::Percent, vec![node]);
                }
                Token::Bang => {
                    self.advance()?;
                    node = Node::inner(Op::Fact, vec![node]);
                }
                _ => break,
            }
        }
        Ok(node)
    }

    fn primary(&mut self) -> Result<Node, ParseError> {
        let span = self.span();
        match self.hd().clone() {
            Token::Num(n) => {
                self.advance()?;
                let format = if n.contains('.') { NumberFormat::Decimal } else { NumberFormat::Integer };
                let canonical = self.scaler.scale(&n, self.config.decimal_places);
                let mut node = Node::leaf(Op::Num, canonical);
                node.attrs.number_format = Some(format);
                Ok(node)
            }
            Token::Var(name) => self.primary_var(name),
            Token::LParen => {
                self.advance()?;
                let inner = self.comma()?;
                self.finish_group(inner, Token::RParen, false, Some('('), Some(')'))
            }
            Token::LBracket => {
                self.advance()?;
                let inner = self.comma()?;
                self.finish_group(inner, Token::RBracket, true, Some('['), Some(']'))
            }
            Token::LBrace => {
                self.advance()?;
                let inner = self.comma()?;
                self.finish_group(inner, Token::RBrace, false, None, None)
            }
            Token::Pipe => {
                self.advance()?;
                let inner = self.additive()?;
                self.eat(Token::Pipe)?;
                Ok(Node::inner(Op::Abs, vec![inner]))
            }
            Token::Frac => self.parse_frac(),
            Token::Binom => self.parse_binom(),
            Token::Sqrt => self.parse_sqrt(),
            Token::Vec => {
                self.advance()?;
                self.eat(Token::LBrace)?;
                let inner = self.comma()?;
                self.eat(Token::RBrace)?;
                Ok(Node::inner(Op::Vec, vec![inner]))
            }
            Token::Sin => self.parse_trig(Op::Sin),
            Token::Cos => self.parse_trig(Op::Cos),
            Token::Tan => self.parse_trig(Op::Tan),
            Token::Sec => self.parse_trig(Op::Sec),
            Token::Cot => self.parse_trig(Op::Cot),
            Token::Csc => self.parse_trig(Op::Csc),
            Token::ArcSin => {
                self.advance()?;
                let arg = self.primary()?;
                Ok(Node::inner(Op::ArcSin, vec![arg]))
            }
            Token::ArcCos => {
                self.advance()?;
                let arg = self.primary()?;
                Ok(Node::inner(Op::ArcCos, vec![arg]))
            }
            Token::ArcTan => {
                self.advance()?;
                let arg = self.primary()?;
                Ok(Node::inner(Op::ArcTan, vec![arg]))
            }
            Token::Ln => {
                self.advance()?;
                let arg = self.primary()?;
                Ok(Node::inner(Op::Log, vec![Node::leaf(Op::Cst, "e"), arg]))
            }
            Token::Lg => {
                self.advance()?;
                let arg = self.primary()?;
                Ok(Node::inner(Op::Log, vec![Node::leaf(Op::Num, "10"), arg]))
            }
            Token::Log => {
                self.advance()?;
                let base = if matches!(self.hd(), Token::Underscore) {
                    self.advance()?;
                    self.primary()?
                } else {
                    Node::leaf(Op::Cst, "e")
                };
                let arg = self.primary()?;
                Ok(Node::inner(Op::Log, vec![base, arg]))
            }
            Token::Lim => {
                self.advance()?;
                self.eat(Token::Underscore)?;
                let sub = self.primary()?;
                let arg = self.primary()?;
                Ok(Node::inner(Op::Lim, vec![sub, arg]))
            }
            Token::Sum | Token::Int | Token::Prod => self.parse_big_op(),
            Token::Exists => {
                self.advance()?;
                let arg = self.equal()?;
                Ok(Node::inner(Op::Exists, vec![arg]))
            }
            Token::ForAll => {
                self.advance()?;
                let arg = self.comma()?;
                Ok(Node::inner(Op::ForAll, vec![arg]))
            }
            Token::Exp => {
                self.advance()?;
                let arg = self.additive()?;
                Ok(Node::inner(Op::Exp, vec![arg]))
            }
            Token::M => {
                self.advance()?;
                let arg = self.multiplicative()?;
                Ok(Node::inner(Op::M, vec![arg]))
            }
            Token::Begin => self.parse_matrix(),
            Token::Circ => {
                self.advance()?;
                Ok(Node::leaf(Op::Cst, "\\circ"))
            }
            other => Err(ParseError::unexpected_expression(&other.describe(), span)),
        }
    }

    fn primary_var(&mut self, name: String) -> Result<Node, ParseError> {
        self.advance()?;

        // Chemistry-mode molar-mass sentinel: `M(x)` rewrites to `unaryM(x)`
        // when `M` resolves in the environment, not only via the dedicated
        // `\M` command token.
        if let Some(ident) = self.env.lookup(&name) {
            if ident.molar_mass_marker && matches!(self.hd(), Token::LParen) {
                self.advance()?;
                let arg = self.comma()?;
                self.eat(Token::RParen)?;
                return Ok(Node::inner(Op::M, vec![arg]));
            }
        }

        let mut var_node = Node::leaf(Op::Var, name);
        if matches!(self.hd(), Token::Underscore) {
            self.advance()?;
            let sub = self.primary()?;
            var_node = Node::inner(Op::Subscript, vec![var_node, sub]);
        }
        Ok(var_node)
    }

    fn finish_group(
        &mut self,
        inner: Node,
        close: Token,
        is_bracket: bool,
        lbrk: Option<char>,
        rbrk: Option<char>,
    ) -> Result<Node, ParseError> {
        self.eat(close)?;
        if inner.op == Op::Comma {
            let arity = inner.arity();
            if is_bracket && arity != 2 {
                return Err(ParseError::interval_bracket(self.span()));
            }
            let wrapper = if self.config.allow_interval && arity == 2 { Op::Interval } else { Op::List };
            return Ok(Node::inner(wrapper, vec![inner]));
        }
        let mut inner = inner;
        inner.attrs.lbrk = lbrk;
        inner.attrs.rbrk = rbrk;
        Ok(inner)
    }

    fn parse_frac(&mut self) -> Result<Node, ParseError> {
        self.advance()?;
        self.eat(Token::LBrace)?;
        let numerator = self.comma()?;
        self.eat(Token::RBrace)?;
        self.eat(Token::LBrace)?;
        let denominator = self.comma()?;
        self.eat(Token::RBrace)?;
        let reciprocal = Node::inner(Op::Pow, vec![denominator, Node::leaf(Op::Num, "-1")]);
        Ok(Node::inner(Op::Mul, vec![numerator, reciprocal])
            .with_attrs(Attrs { is_fraction: true, ..Default::default() }))
    }

    fn parse_sqrt(&mut self) -> Result<Node, ParseError> {
        self.advance()?;
        let index = if matches!(self.hd(), Token::LBracket) {
            self.advance()?;
            let n = self.comma()?;
            self.eat(Token::RBracket)?;
            n
        } else {
            Node::leaf(Op::Num, "2")
        };
        self.eat(Token::LBrace)?;
        let radicand = self.comma()?;
        self.eat(Token::RBrace)?;
        Ok(Node::inner(Op::Pow, vec![radicand, index, Node::leaf(Op::Num, "-1")]))
    }

    fn parse_binom(&mut self) -> Result<Node, ParseError> {
        self.advance()?;
        self.eat(Token::LBrace)?;
        let n = self.comma()?;
        self.eat(Token::RBrace)?;
        self.eat(Token::LBrace)?;
        let k = self.comma()?;
        self.eat(Token::RBrace)?;
        let n_minus_k = self.fold_add(n.clone(), self.negate(k.clone()));
        let denominator = Node::inner(
            Op::Mul,
            vec![Node::inner(Op::Fact, vec![k]), Node::inner(Op::Fact, vec![n_minus_k])],
        );
        let reciprocal = Node::inner(Op::Pow, vec![denominator, Node::leaf(Op::Num, "-1")]);
        Ok(Node::inner(Op::Mul, vec![Node::inner(Op::Fact, vec![n]), reciprocal])
            .with_attrs(Attrs { is_binomial: true, ..Default::default() }))
    }

    /// `\sin^{-1}(x)`-style inverse rewriting and generic exponentiation of
    /// trig functions, called with the trig token not yet consumed. The `-1`
    /// exponent is recognized both bare (`\sin^-1`) and brace-grouped
    /// (`\sin^{-1}`, spec.md §4.3's literal form) since `unary()` already
    /// unwraps a single-expression brace group down to its inner node.
    fn parse_trig(&mut self, base_op: Op) -> Result<Node, ParseError> {
        self.advance()?;
        let mut pending_exponents = Vec::new();
        let mut inverse = false;

        while matches!(self.hd(), Token::Caret) {
            self.advance()?;
            let exponent = self.unary()?;
            if exponent.is_num("-1") {
                inverse = true;
            } else {
                pending_exponents.push(exponent);
            }
        }

        let arg = self.primary()?;
        let rewrites_to_inverse = inverse && pending_exponents.is_empty();

        let mut result = if rewrites_to_inverse {
            match base_op {
                Op::Sin => Node::inner(Op::ArcSin, vec![arg]),
                Op::Cos => Node::inner(Op::ArcCos, vec![arg]),
                Op::Tan => Node::inner(Op::ArcTan, vec![arg]),
                other => Node::inner(other, vec![arg]),
            }
        } else {
            Node::inner(base_op, vec![arg])
        };

        if !rewrites_to_inverse {
            let mut exponents = pending_exponents;
            if inverse {
                exponents.insert(0, Node::leaf(Op::Num, "-1"));
            }
            for exponent in exponents {
                result = Node::inner(Op::Pow, vec![result, exponent]);
            }
        }
        Ok(result)
    }

    fn parse_big_op(&mut self) -> Result<Node, ParseError> {
        let op = match self.hd() {
            Token::Sum => Op::Sum,
            Token::Int => Op::Int,
            Token::Prod => Op::Prod,
            _ => unreachable!("parse_big_op called on a non-big-operator token"),
        };
        self.advance()?;
        if matches!(self.hd(), Token::Underscore) {
            self.advance()?;
            let lower = self.primary()?;
            self.eat(Token::Caret)?;
            let upper = self.primary()?;
            let body = self.comma()?;
            Ok(Node::inner(op, vec![lower, upper, body]))
        } else {
            let body = self.comma()?;
            Ok(Node::inner(op, vec![body]))
        }
    }

    fn parse_matrix(&mut self) -> Result<Node, ParseError> {
        self.eat(Token::Begin)?;

        let mut rows = vec![self.parse_matrix_row()?];
        while matches!(self.hd(), Token::NewRow) {
            self.advance()?;
            rows.push(self.parse_matrix_row()?);
        }

        self.eat(Token::End)?;

        Ok(Node::inner(Op::Matrix, rows))
    }

    fn parse_matrix_row(&mut self) -> Result<Node, ParseError> {
        let mut cols = vec![Node::inner(Op::Col, vec![self.equal()?])];
        while matches!(self.hd(), Token::NewCol) {
            self.advance()?;
            cols.push(Node::inner(Op::Col, vec![self.equal()?]));
        }
        Ok(Node::inner(Op::Row, cols))
    }
}

fn is_bare_degree(node: &Node) -> bool {
    node.op == Op::Cst && node.payload() == Some("\\circ")
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse_default(src: &str) -> Node {
        let env = Environment::new();
        parse(src, &env, ParserConfig::default()).unwrap()
    }

    #[test]
    fn addition_normalizes_spacing_identically() {
        let a = parse_default("10 + 20");
        let b = parse_default("10+20");
        assert_eq!(a, b);
        assert_eq!(a.op, Op::Add);
        assert_eq!(a.arity(), 2);
    }

    #[test]
    fn unary_minus_absorbs_into_product() {
        let tree = parse_default("-2x");
        assert_eq!(tree.op, Op::Mul);
        assert_eq!(tree.arity(), 3);
    }

    #[test]
    fn fraction_normalizes_to_reciprocal_multiplication() {
        let tree = parse_default("\\frac{1}{2}");
        assert_eq!(tree.op, Op::Mul);
        assert!(tree.attrs.is_fraction);
        let reciprocal = tree.children().nth(1).unwrap();
        assert_eq!(reciprocal.op, Op::Pow);
    }

    #[test]
    fn sqrt_normalizes_to_power_with_root_sentinel() {
        let tree = parse_default("\\sqrt[3]{x}");
        assert_eq!(tree.op, Op::Pow);
        assert_eq!(tree.arity(), 3);
    }

    #[test]
    fn trig_inverse_rewrites_to_arc_tag() {
        let tree = parse_default("\\sin^{-1}(x)");
        assert_eq!(tree.op, Op::ArcSin);
    }

    #[test]
    fn log_without_subscript_defaults_to_base_e() {
        let tree = parse_default("\\log(x)");
        assert_eq!(tree.op, Op::Log);
        assert!(tree.children().next().unwrap().is_num("e") || tree.children().next().unwrap().op == Op::Cst);
    }

    #[test]
    fn mixed_fraction_with_bare_integer_leading_term() {
        let tree = parse_default("3 \\frac{1}{2}");
        assert_eq!(tree.op, Op::Add);
        assert!(tree.attrs.is_mixed_fraction);
    }

    #[test]
    fn non_bare_leading_term_is_not_mixed_fraction_by_default() {
        let tree = parse_default("x \\frac{1}{2}");
        assert_eq!(tree.op, Op::Mul);
        assert!(!tree.attrs.is_mixed_fraction);
    }

    #[test]
    fn permissive_mixed_fractions_accepts_additive_leading_term() {
        let env = Environment::new();
        let config = ParserConfig { permissive_mixed_fractions: true, ..ParserConfig::default() };
        let tree = parse(&"x \\frac{1}{2}", &env, config).unwrap();
        assert_eq!(tree.op, Op::Add);
        assert!(tree.attrs.is_mixed_fraction);
    }

    #[test]
    fn thousands_separator_is_accepted_when_allowed() {
        let env = Environment::new();
        let config = ParserConfig { allow_thousands_separator: true, ..ParserConfig::default() };
        let tree = parse("1,234.5", &env, config).unwrap();
        assert_eq!(tree.payload(), Some("1234.5"));
    }

    #[test]
    fn misplaced_thousands_separator_is_error_1005() {
        let env = Environment::new();
        let config = ParserConfig { allow_thousands_separator: true, ..ParserConfig::default() };
        let err = parse("1,23", &env, config).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NumberFormat);
    }

    #[test]
    fn square_brackets_pair_becomes_interval_when_allowed() {
        let env = Environment::new();
        let config = ParserConfig { allow_interval: true, ..ParserConfig::default() };
        let tree = parse("[1,2]", &env, config).unwrap();
        assert_eq!(tree.op, Op::Interval);
    }

    #[test]
    fn square_brackets_non_pair_is_error_1002() {
        let env = Environment::new();
        let config = ParserConfig { allow_interval: true, ..ParserConfig::default() };
        let err = parse("[1,2,3]", &env, config).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::IntervalBracket);
    }

    #[test]
    fn chemistry_mode_concatenates_symbols_with_coefficient() {
        use crate::environment::Ident;
        let mut env = Environment::new();
        env.define("Na", Ident::new().with_mass(22.99));
        env.define("Cl", Ident::new().with_mass(35.45));
        let tree = parse("2NaCl", &env, ParserConfig::default()).unwrap();
        assert_eq!(tree.op, Op::Mul);
        let inner_add = tree.children().nth(1).unwrap();
        assert_eq!(inner_add.op, Op::Add);
        assert_eq!(inner_add.arity(), 2);
    }

    #[test]
    fn chemistry_ion_exponent_produces_add_of_coefficient() {
        use crate::environment::Ident;
        let mut env = Environment::new();
        env.define("Al", Ident::new().with_mass(26.98));
        let tree = parse("Al^{3+}", &env, ParserConfig::default()).unwrap();
        assert_eq!(tree.op, Op::Pow);
        let exponent = tree.children().nth(1).unwrap();
        assert_eq!(exponent.op, Op::Add);
        assert_eq!(exponent.children().next().unwrap().payload(), Some("3"));
    }

    #[test]
    fn trailing_input_is_error_1003() {
        let env = Environment::new();
        let err = Parser::new("1 + 2)", &env, ParserConfig::default()).unwrap().parse().unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::TrailingInput);
    }

    #[test]
    fn synthesized_underscore_fills_missing_relational_operand() {
        let tree = parse_default("=2");
        assert_eq!(tree.op, Op::Eql);
        assert_eq!(tree.children().next().unwrap().op, Op::Var);
        assert_eq!(tree.children().next().unwrap().payload(), Some("_"));
    }

    #[test]
    fn matrix_environment_builds_rows_and_columns() {
        let tree = parse_default("\\begin{matrix}1&2\\\\3&4\\end{matrix}");
        assert_eq!(tree.op, Op::Matrix);
        assert_eq!(tree.arity(), 2);
        let first_row = tree.children().next().unwrap();
        assert_eq!(first_row.op, Op::Row);
        assert_eq!(first_row.arity(), 2);
    }

    #[test]
    fn binomial_expands_to_factorial_ratio() {
        let tree = parse_default("\\binom{5}{2}");
        assert_eq!(tree.op, Op::Mul);
        assert!(tree.attrs.is_binomial);
    }
}
