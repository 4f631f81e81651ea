use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, OnceLock};

use crate::error::ImplementationError;
use crate::node::Node;
use crate::op::Op;

/// A stable integer handle for an interned subtree.
///
/// Backed by `NonZeroU32` since index `0` is reserved as the pool's sentinel
/// and ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    fn from_len(len: usize) -> NodeId {
        NodeId(NonZeroU32::new(len as u32).expect("pool index overflowed u32"))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

/// A canonicalized pool entry: the operator tag plus either a literal
/// payload (leaf) or a list of child ids (inner node). Never mutated once
/// written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PoolRecord {
    Leaf { op: Op, payload: Arc<str> },
    Inner { op: Op, children: Vec<NodeId> },
}

/// The structural key used to deduplicate subtrees during interning: a tuple
/// key over the operator and its children/payload, rather than a
/// concatenated string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PoolKey {
    Leaf(Op, Arc<str>),
    Inner(Op, Vec<NodeId>),
}

fn key_of(record: &PoolRecord) -> PoolKey {
    match record {
        PoolRecord::Leaf { op, payload } => PoolKey::Leaf(*op, Arc::clone(payload)),
        PoolRecord::Inner { op, children } => PoolKey::Inner(*op, children.clone()),
    }
}

/// The process-wide structural-hashing arena.
///
/// An append-vector plus a lookup map (`symbols: Vec<T>, lookup:
/// HashMap<T, usize>`) — the same shape as any append-only interning arena.
pub struct Pool {
    records: Vec<Option<PoolRecord>>, // index 0 is the sentinel (None)
    lookup: HashMap<PoolKey, NodeId>,
}

impl Pool {
    fn new() -> Pool {
        Pool { records: vec![None], lookup: HashMap::new() }
    }

    fn leaf_record_of(&self, node: &Node) -> PoolRecord {
        let payload = node
            .payload()
            .unwrap_or_else(|| panic!("leaf node {} built without a payload", node.op));
        PoolRecord::Leaf { op: node.op, payload: Arc::from(payload) }
    }

    fn insert(&mut self, key: PoolKey, record: PoolRecord) -> NodeId {
        if let Some(&id) = self.lookup.get(&key) {
            return id;
        }
        self.records.push(Some(record));
        let id = NodeId::from_len(self.records.len() - 1);
        self.lookup.insert(key, id);
        id
    }

    /// Bottom-up intern: children are interned strictly before their parent,
    /// so together with monotonic ids every child id is always smaller than
    /// its parent's.
    fn intern_node(&mut self, node: &Node) -> NodeId {
        if node.op.is_leaf() {
            let record = self.leaf_record_of(node);
            let key = key_of(&record);
            return self.insert(key, record);
        }

        let mut children = Vec::with_capacity(node.args.len());
        for arg in &node.args {
            let child = arg
                .as_node()
                .unwrap_or_else(|| panic!("leaf argument found on non-leaf node {}", node.op));
            children.push(self.intern_node(child));
        }
        if node.op.is_strictly_binary() && children.len() != 2 {
            panic!(
                "{}",
                ImplementationError::new(format!(
                    "{} must have arity exactly 2, found {}",
                    node.op,
                    children.len()
                ))
            );
        }
        if children.is_empty() {
            panic!(
                "{}",
                ImplementationError::new(format!(
                    "non-leaf operator {} constructed with zero arguments",
                    node.op
                ))
            );
        }
        let record = PoolRecord::Inner { op: node.op, children };
        let key = key_of(&record);
        self.insert(key, record)
    }

    fn node_of(&self, id: NodeId) -> Node {
        let record = self.records[id.get() as usize]
            .as_ref()
            .unwrap_or_else(|| panic!("{}", ImplementationError::new("dangling pool id")));
        match record {
            PoolRecord::Leaf { op, payload } => Node::leaf(*op, payload.as_ref()),
            PoolRecord::Inner { op, children } => {
                let kids = children.iter().map(|&c| self.node_of(c)).collect();
                Node::inner(*op, kids)
            }
        }
    }

    fn dump_one(&self, id: NodeId) -> String {
        match self.records[id.get() as usize].as_ref().unwrap() {
            PoolRecord::Leaf { op, payload } => format!("#{} {}({:?})", id.get(), op, payload),
            PoolRecord::Inner { op, children } => {
                let kids: Vec<String> = children.iter().map(|c| format!("#{}", c.get())).collect();
                format!("#{} {}({})", id.get(), op, kids.join(", "))
            }
        }
    }

    fn dump_all_string(&self) -> String {
        let mut out = String::new();
        for i in 1..self.records.len() {
            let id = NodeId::from_len(i);
            out.push_str(&self.dump_one(id));
            out.push('\n');
        }
        out
    }

    fn clear_self(&mut self) {
        self.records.truncate(1);
        self.lookup.clear();
    }
}

fn global() -> &'static Mutex<Pool> {
    static POOL: OnceLock<Mutex<Pool>> = OnceLock::new();
    POOL.get_or_init(|| Mutex::new(Pool::new()))
}

/// Interns `node` into the process-wide pool and returns its id.
///
/// Idempotent: `intern(node(intern(t))) == intern(t)`.
pub fn intern(node: &Node) -> NodeId {
    let mut pool = global().lock().expect("pool mutex poisoned");
    pool.intern_node(node)
}

/// Reconstructs a freestanding tree from an id. Sideband attributes are not
/// restored, since they are not part of structural identity.
pub fn node(id: NodeId) -> Node {
    let pool = global().lock().expect("pool mutex poisoned");
    pool.node_of(id)
}

/// Diagnostic serialization of a single pool entry.
pub fn dump(id: NodeId) -> String {
    let pool = global().lock().expect("pool mutex poisoned");
    pool.dump_one(id)
}

/// Diagnostic serialization of every entry currently in the pool.
pub fn dump_all() -> String {
    let pool = global().lock().expect("pool mutex poisoned");
    pool.dump_all_string()
}

/// Resets the pool to its initial state, invalidating all previously issued
/// ids. Intended for tests only.
pub fn clear() {
    let mut pool = global().lock().expect("pool mutex poisoned");
    pool.clear_self();
}

/// Serializes tests that depend on `clear()`/specific id values against each
/// other. The pool is one process-wide singleton, so any two `#[test]`
/// functions that both call `clear()` would otherwise race under the default
/// parallel test runner; every such test takes this guard for its whole body.
#[doc(hidden)]
pub fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod test {
    use super::*;

    fn num(s: &str) -> Node {
        Node::leaf(Op::Num, s)
    }

    #[test]
    fn p1_structural_equality_interns_to_same_id() {
        let _guard = test_lock();
        clear();
        let a = Node::inner(Op::Add, vec![num("10"), num("20")]);
        let b = Node::inner(Op::Add, vec![num("10"), num("20")]);
        assert_eq!(intern(&a), intern(&b));
    }

    #[test]
    fn p2_round_trip_through_pool_is_stable() {
        let _guard = test_lock();
        clear();
        let tree = Node::inner(Op::Mul, vec![num("3"), num("4")]);
        let id = intern(&tree);
        let rebuilt = node(id);
        assert_eq!(intern(&rebuilt), id);
    }

    #[test]
    fn p4_ids_are_monotonic_and_never_alias() {
        let _guard = test_lock();
        clear();
        let id1 = intern(&num("1"));
        let id2 = intern(&num("2"));
        let id1_again = intern(&num("1"));
        assert!(id2.get() > id1.get());
        assert_eq!(id1, id1_again);
    }

    #[test]
    fn p5_child_ids_precede_parent_id() {
        let _guard = test_lock();
        clear();
        let left = num("5");
        let right = num("6");
        let tree = Node::inner(Op::Add, vec![left, right]);
        let parent = intern(&tree);
        // left/right were interned before parent, so their ids are smaller.
        let left_id = intern(&num("5"));
        let right_id = intern(&num("6"));
        assert!(left_id.get() < parent.get());
        assert!(right_id.get() < parent.get());
    }

    #[test]
    fn distinct_structure_interns_to_distinct_ids() {
        let _guard = test_lock();
        clear();
        let a = Node::inner(Op::Add, vec![num("1"), num("2")]);
        let b = Node::inner(Op::Sub, vec![num("1"), num("2")]);
        assert_ne!(intern(&a), intern(&b));
    }

    #[test]
    #[should_panic]
    fn nonleaf_with_no_children_panics() {
        let _guard = test_lock();
        clear();
        let malformed = Node { op: Op::Add, args: vec![], attrs: Default::default() };
        intern(&malformed);
    }

    #[test]
    #[should_panic]
    fn binary_only_operator_with_wrong_arity_panics() {
        let _guard = test_lock();
        clear();
        let malformed = Node::inner(Op::Eql, vec![num("1"), num("2"), num("3")]);
        intern(&malformed);
    }
}
