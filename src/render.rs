//! Recursive LaTeX pretty-printer.
//!
//! The renderer does not invert every parser normalization — only the 3-arg
//! `POW` form produced by `\sqrt` (and the fraction/binomial shapes tagged
//! during parsing) are recognized and rewritten back to their macro form.
//! Everything else renders structurally: a `match` over the tagged operator
//! enum building a `String`, the same way `Token`'s `Display` impl works.

use crate::error::ImplementationError;
use crate::node::Node;
use crate::op::Op;

/// Renders `node` back to LaTeX source.
pub fn render(node: &Node) -> String {
    render_node(node)
}

fn single_child(node: &Node) -> &Node {
    node.children()
        .next()
        .unwrap_or_else(|| panic!("{}", ImplementationError::new(format!("{} built with no children", node.op))))
}

fn nth_child(node: &Node, n: usize) -> &Node {
    node.children()
        .nth(n)
        .unwrap_or_else(|| panic!("{}", ImplementationError::new(format!("{} missing argument {}", node.op, n))))
}

fn binary(node: &Node, symbol: &str) -> String {
    if node.arity() != 2 {
        panic!("{}", ImplementationError::new(format!("{} must have arity 2 to render, found {}", node.op, node.arity())));
    }
    format!("{} {} {}", render_node(nth_child(node, 0)), symbol, render_node(nth_child(node, 1)))
}

fn render_joined(node: &Node, separator: &str) -> String {
    node.children().map(render_node).collect::<Vec<_>>().join(separator)
}

fn render_fn(node: &Node, name: &str) -> String {
    format!("{{{}{{{}}}}}", name, render_node(single_child(node)))
}

fn render_node(node: &Node) -> String {
    match node.op {
        Op::Var | Op::Cst | Op::Num => node.payload().unwrap_or_default().to_string(),

        // Binary operators with uniform between-args rendering. The
        // relational/misc binary tags (LT/LE/GT/GE/COLON/RIGHTARROW/IN/TO)
        // share the same binary shape as DIV/PM/EQL, so they follow the
        // same rule.
        Op::Div => binary(node, "/"),
        Op::Pm => binary(node, "\\pm"),
        Op::Eql => binary(node, "="),
        Op::Lt => binary(node, "<"),
        Op::Le => binary(node, "\\leq"),
        Op::Gt => binary(node, ">"),
        Op::Ge => binary(node, "\\geq"),
        Op::Colon => binary(node, ":"),
        Op::RightArrow => binary(node, "\\rightarrow"),
        Op::In => binary(node, "\\in"),
        Op::To => binary(node, "\\to"),

        Op::Sub => render_sub(node),
        Op::Pow => render_pow(node),

        Op::Frac => format!("\\dfrac{{{}}}{{{}}}", render_node(nth_child(node, 0)), render_node(nth_child(node, 1))),
        Op::Sqrt => render_sqrt(node),
        Op::Vec => format!("\\vec{{{}}}", render_node(single_child(node))),
        Op::Binom => format!("\\binom{{{}}}{{{}}}", render_node(nth_child(node, 0)), render_node(nth_child(node, 1))),
        Op::Abs => format!("|{}|", render_node(single_child(node))),
        Op::Paren => format!("({})", render_node(single_child(node))),

        Op::Sin => render_fn(node, "\\sin"),
        Op::Cos => render_fn(node, "\\cos"),
        Op::Tan => render_fn(node, "\\tan"),
        Op::Sec => render_fn(node, "\\sec"),
        Op::Cot => render_fn(node, "\\cot"),
        Op::Csc => render_fn(node, "\\csc"),
        Op::ArcSin => render_fn(node, "\\arcsin"),
        Op::ArcCos => render_fn(node, "\\arccos"),
        Op::ArcTan => render_fn(node, "\\arctan"),
        Op::Ln => render_fn(node, "\\ln"),
        Op::Lg => render_fn(node, "\\lg"),
        Op::Exp => render_fn(node, "\\exp"),
        Op::M => render_fn(node, "M"),
        Op::Log => render_log(node),

        Op::Lim => format!("\\lim_{{{}}} {}", render_node(nth_child(node, 0)), render_node(nth_child(node, 1))),
        Op::Sum => render_bigop(node, "\\sum"),
        Op::Int => render_bigop(node, "\\int"),
        Op::Prod => render_bigop(node, "\\prod"),

        Op::Percent => format!("{}\\%", render_node(single_child(node))),
        Op::Fact => format!("{}!", render_node(single_child(node))),
        Op::ForAll => format!("\\forall {}", render_node(single_child(node))),
        Op::Exists => format!("\\exists {}", render_node(single_child(node))),

        Op::Add => render_joined(node, " + "),
        Op::Comma => render_joined(node, ", "),
        Op::Mul => fraction_shape(node).or_else(|| binomial_shape(node)).unwrap_or_else(|| render_mul(node)),

        Op::Row => render_joined(node, " & "),
        Op::Col => render_node(single_child(node)),
        Op::Matrix => render_matrix(node),

        Op::Interval => format!("[{}]", render_node(single_child(node))),
        Op::List => format!("({})", render_node(single_child(node))),
        Op::Highlight => render_node(single_child(node)),
    }
}

fn render_sub(node: &Node) -> String {
    match node.arity() {
        1 => format!("-{}", render_node(single_child(node))),
        2 => binary(node, "-"),
        other => panic!("{}", ImplementationError::new(format!("SUB has unsupported arity {} (must be 1 or 2)", other))),
    }
}

/// Recognizes the 3-arg `POW(radicand, index, -1)` sentinel `\sqrt` encoding
/// and inverts it back to `\sqrt`/`\sqrt[n]{}`; this is the renderer's one
/// mandatory round-trip obligation.
fn render_pow(node: &Node) -> String {
    if node.arity() == 3 {
        let radicand = nth_child(node, 0);
        let index = nth_child(node, 1);
        return if index.is_num("2") {
            format!("\\sqrt{{{}}}", render_node(radicand))
        } else {
            format!("\\sqrt[{}]{{{}}}", render_node(index), render_node(radicand))
        };
    }
    let base = nth_child(node, 0);
    let exponent = nth_child(node, 1);
    let base_str = render_node(base);
    let base_str = if matches!(base.op, Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Sqrt) {
        format!("({})", base_str)
    } else {
        base_str
    };
    format!("{{{}^{{{}}}}}", base_str, render_node(exponent))
}

fn render_sqrt(node: &Node) -> String {
    let radicand = nth_child(node, 0);
    match node.arity() {
        1 => format!("\\sqrt{{{}}}", render_node(radicand)),
        2 => format!("\\sqrt[{}]{{{}}}", render_node(nth_child(node, 1)), render_node(radicand)),
        other => panic!("{}", ImplementationError::new(format!("SQRT has unsupported arity {} (must be 1 or 2)", other))),
    }
}

fn render_log(node: &Node) -> String {
    let base = nth_child(node, 0);
    let arg = render_node(nth_child(node, 1));
    if base.is_num("10") {
        return format!("{{\\lg{{{}}}}}", arg);
    }
    if base.op == Op::Cst && base.payload() == Some("e") {
        return format!("{{\\log{{{}}}}}", arg);
    }
    format!("{{\\log_{{{}}}{{{}}}}}", render_node(base), arg)
}

fn render_bigop(node: &Node, symbol: &str) -> String {
    match node.arity() {
        3 => format!(
            "{}_{{{}}}^{{{}}} {}",
            symbol,
            render_node(nth_child(node, 0)),
            render_node(nth_child(node, 1)),
            render_node(nth_child(node, 2))
        ),
        1 => format!("{} {}", symbol, render_node(single_child(node))),
        other => panic!("{}", ImplementationError::new(format!("{} has unsupported arity {}", node.op, other))),
    }
}

/// `\frac{a}{b}` parses to `MUL(a, POW(b, -1))` tagged `isFraction`;
/// recognizing that shape here (alongside the 3-arg `POW` sqrt
/// sentinel) is what lets `render(parse("\frac{1}{2}"))` come back out as
/// `\dfrac{1}{2}` instead of a generic product.
fn fraction_shape(node: &Node) -> Option<String> {
    if !node.attrs.is_fraction || node.arity() != 2 {
        return None;
    }
    let denom_pow = nth_child(node, 1);
    if denom_pow.op != Op::Pow || denom_pow.arity() != 2 || !nth_child(denom_pow, 1).is_num("-1") {
        return None;
    }
    let numerator = render_node(nth_child(node, 0));
    let denominator = render_node(nth_child(denom_pow, 0));
    Some(format!("\\dfrac{{{}}}{{{}}}", numerator, denominator))
}

/// `\binom{n}{k}` expands to `MUL(FACT(n), POW(MUL(FACT(k), FACT(n-k)), -1))`
/// tagged `isBinomial`; mirrors [`fraction_shape`] to invert it.
fn binomial_shape(node: &Node) -> Option<String> {
    if !node.attrs.is_binomial || node.arity() != 2 {
        return None;
    }
    let fact_n = nth_child(node, 0);
    if fact_n.op != Op::Fact || fact_n.arity() != 1 {
        return None;
    }
    let denom_pow = nth_child(node, 1);
    if denom_pow.op != Op::Pow || denom_pow.arity() != 2 || !nth_child(denom_pow, 1).is_num("-1") {
        return None;
    }
    let denom_mul = nth_child(denom_pow, 0);
    if denom_mul.op != Op::Mul || denom_mul.arity() != 2 {
        return None;
    }
    let fact_k = nth_child(denom_mul, 0);
    if fact_k.op != Op::Fact || fact_k.arity() != 1 {
        return None;
    }
    let n = render_node(single_child(fact_n));
    let k = render_node(single_child(fact_k));
    Some(format!("\\binom{{{}}}{{{}}}", n, k))
}

/// Whether a term was originally written with explicit delimiters, per the
/// attrs sideband — MUL elides `\times` before such a term.
fn is_parenthesized(node: &Node) -> bool {
    node.op == Op::Paren || node.attrs.lbrk.is_some()
}

fn render_mul_term(node: &Node) -> String {
    if matches!(node.op, Op::Add | Op::Sub) {
        format!("({})", render_node(node))
    } else {
        render_node(node)
    }
}

/// `MUL` elides `\times` between a term and the next when the next term is
/// parenthesized, is a bare variable/constant, or the current term is
/// numeric and the next is not; otherwise `\times` is inserted. `ADD`/`SUB`
/// subterms are wrapped in parentheses.
fn render_mul(node: &Node) -> String {
    let children: Vec<&Node> = node.children().collect();
    if children.is_empty() {
        panic!("{}", ImplementationError::new("MUL built with no children"));
    }
    let mut out = String::new();
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            let prev = children[i - 1];
            let elide = is_parenthesized(child) || matches!(child.op, Op::Var | Op::Cst) || (prev.op == Op::Num && child.op != Op::Num);
            if !elide {
                out.push_str("\\times ");
            }
        }
        out.push_str(&render_mul_term(child));
    }
    out
}

fn render_matrix(node: &Node) -> String {
    format!("\\begin{{matrix}} {} \\end{{matrix}}", node.children().map(render_node).collect::<Vec<_>>().join(" \\\\ "))
}
