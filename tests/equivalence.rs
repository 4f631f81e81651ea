//! End-to-end checks of the parse/pool/render pipeline against the public
//! API, including the invariants and literal scenarios used to validate the
//! crate's core claim: structurally equivalent expressions intern to the
//! same id.

use mathcore::environment::{Environment, Ident};
use mathcore::model::ModelFactory;
use mathcore::node::{Node, NumberFormat};
use mathcore::op::Op;
use mathcore::parser::{self, ParserConfig};
use mathcore::pool;
use proptest::prelude::*;

fn fresh_env() -> Environment {
    Environment::new()
}

#[test]
fn implicit_and_explicit_addition_intern_identically() {
    let _guard = pool::test_lock();
    pool::clear();
    let env = fresh_env();
    let a = parser::parse("10 + 20", &env, ParserConfig::default()).unwrap();
    let b = parser::parse("10+20", &env, ParserConfig::default()).unwrap();
    let direct = Node::inner(Op::Add, vec![Node::leaf(Op::Num, "10"), Node::leaf(Op::Num, "20")]);
    assert_eq!(pool::intern(&a), pool::intern(&b));
    assert_eq!(pool::intern(&a), pool::intern(&direct));
}

#[test]
fn bare_constant_power_renders_with_brace_wrapping() {
    let env = fresh_env();
    let tree = parser::parse("e^2", &env, ParserConfig::default()).unwrap();
    assert_eq!(mathcore::render::render(&tree), "{e^{2}}");
}

#[test]
fn fraction_renders_back_to_dfrac() {
    let env = fresh_env();
    let tree = parser::parse("\\frac{1}{2}", &env, ParserConfig::default()).unwrap();
    assert_eq!(mathcore::render::render(&tree), "\\dfrac{1}{2}");
}

#[test]
fn equality_of_product_and_sum_renders_with_implicit_coefficient() {
    let env = fresh_env();
    let tree = parser::parse("x=2(y+1)", &env, ParserConfig::default()).unwrap();
    assert_eq!(mathcore::render::render(&tree), "x = 2(y + 1)");
}

#[test]
fn thousands_separator_requires_the_option_and_correct_grouping() {
    let env = fresh_env();
    let allowed = ParserConfig { allow_thousands_separator: true, ..ParserConfig::default() };
    let tree = parser::parse("1,234.5", &env, allowed).unwrap();
    assert_eq!(tree.payload(), Some("1234.5"));
    assert_eq!(tree.attrs.number_format, Some(NumberFormat::Decimal));

    let err = parser::parse("1,23", &env, allowed).unwrap_err();
    assert_eq!(err.code, mathcore::error::ErrorCode::NumberFormat);
}

#[test]
fn chemistry_environment_drives_concatenation_and_ion_exponents() {
    let mut env = fresh_env();
    env.define("Na", Ident::new().with_mass(22.99));
    env.define("Cl", Ident::new().with_mass(35.45));
    env.define("Al", Ident::new().with_mass(26.98));

    let salt = parser::parse("2NaCl", &env, ParserConfig::default()).unwrap();
    assert_eq!(salt.op, Op::Mul);
    let symbols = salt.children().nth(1).unwrap();
    assert_eq!(symbols.op, Op::Add);
    assert_eq!(symbols.children().map(|c| c.payload().unwrap().to_string()).collect::<Vec<_>>(), vec!["Na", "Cl"]);

    let ion = parser::parse("Al^{3+}", &env, ParserConfig::default()).unwrap();
    assert_eq!(ion.op, Op::Pow);
    let exponent = ion.children().nth(1).unwrap();
    assert_eq!(exponent.op, Op::Add);
    assert_eq!(exponent.children().next().unwrap().payload(), Some("3"));
}

#[test]
fn model_facade_parses_and_renders_through_the_pool() {
    let _guard = pool::test_lock();
    pool::clear();
    let mut env = fresh_env();
    let factory = ModelFactory::new();
    let model = factory.create(&mut env);

    let id = model.parse("\\sqrt[3]{x}").unwrap();
    assert_eq!(model.render(id), "\\sqrt[3]{x}");
}

#[test]
fn subtraction_and_negated_addition_are_the_same_tree() {
    let _guard = pool::test_lock();
    pool::clear();
    let mut env = fresh_env();
    let factory = ModelFactory::new();
    let model = factory.create(&mut env);

    let a = model.parse("3 - 2").unwrap();
    let b = model.parse("3 + (-2)").unwrap();
    assert_eq!(a, b);
}

fn leaf_strategy() -> impl Strategy<Value = Node> {
    prop_oneof![
        (1u32..999).prop_map(|n| Node::leaf(Op::Num, n.to_string())),
        proptest::sample::select(vec!["x", "y", "z"]).prop_map(|v| Node::leaf(Op::Var, v)),
    ]
}

fn tree_strategy() -> impl Strategy<Value = Node> {
    leaf_strategy().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Node::inner(Op::Add, vec![l, r])),
            (inner.clone(), inner).prop_map(|(l, r)| Node::inner(Op::Mul, vec![l, r])),
        ]
    })
}

/// Whether `target` occurs anywhere within `tree`, including at its root.
/// Interning `tree` necessarily interns every such subtree first (I4/P5), so
/// this tells `p4_ids_never_decrease_within_a_session` whether a second
/// `intern` call is expected to hit an already-assigned id.
fn contains_subtree(tree: &Node, target: &Node) -> bool {
    tree == target || tree.children().any(|child| contains_subtree(child, target))
}

proptest! {
    /// P1: structurally equal trees intern to the same id, regardless of
    /// how many times each is built.
    #[test]
    fn p1_structural_equality_implies_same_id(tree in tree_strategy()) {
        let _guard = pool::test_lock();
        pool::clear();
        let first = pool::intern(&tree);
        let second = pool::intern(&tree);
        prop_assert_eq!(first, second);
    }

    /// P2: interning a tree reconstructed from the pool yields the same id.
    #[test]
    fn p2_pool_round_trip_is_stable(tree in tree_strategy()) {
        let _guard = pool::test_lock();
        pool::clear();
        let id = pool::intern(&tree);
        let rebuilt = pool::node(id);
        prop_assert_eq!(pool::intern(&rebuilt), id);
    }

    /// P4: ids assigned during one clear-to-clear session never decrease.
    /// Interning `b` only has to land above `id_a` when it is actually new;
    /// if `b` is a subtree `a` already caused to be interned, `intern` is
    /// expected to return that earlier, smaller id (P1), not a fresh one.
    #[test]
    fn p4_ids_never_decrease_within_a_session(a in tree_strategy(), b in tree_strategy()) {
        let _guard = pool::test_lock();
        pool::clear();
        let id_a = pool::intern(&a);
        let id_b = pool::intern(&b);
        if a == b {
            prop_assert_eq!(id_a, id_b);
        } else if contains_subtree(&a, &b) {
            prop_assert!(id_b.get() <= id_a.get());
        } else {
            prop_assert!(id_b.get() > id_a.get());
        }
    }

    /// P5: every child id precedes its parent's id.
    #[test]
    fn p5_child_ids_precede_parent(tree in tree_strategy()) {
        let _guard = pool::test_lock();
        pool::clear();
        if !tree.op.is_leaf() {
            let children: Vec<Node> = tree.children().cloned().collect();
            let parent = pool::intern(&tree);
            for child in children {
                let child_id = pool::intern(&child);
                prop_assert!(child_id.get() < parent.get());
            }
        }
    }
}
