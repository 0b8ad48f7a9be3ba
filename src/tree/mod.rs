//! Derivation trees.
//!
//! Узлы неизменяемы: любое структурное изменение строит новое дерево, которое
//! разделяет (через `Rc`) все нетронутые поддеревья с исходным. Идентификатор
//! узла (`NodeId`) переносится при каждой перезаписи, поэтому "тот же" узел
//! можно найти в новом дереве через `find`.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::errors::{GraftError, GraftResult};

pub mod interner;
pub mod path;
pub mod parse_tree;

pub use interner::{Symbol, SymbolTable};
pub use parse_tree::ParseTree;
pub use path::Path;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Устойчивый идентификатор узла в пределах истории деривации.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn fresh() -> Self { NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)) }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

/// Expansion state of a node.
#[derive(Debug, Clone)]
pub enum Children {
    /// No production chosen yet.
    Unexpanded,
    /// Closed leaf.
    Terminal,
    /// One production's right-hand side; never empty.
    Expanded(Vec<DerivationTree>),
}

#[derive(Debug)]
pub struct TreeNode {
    pub id: NodeId,
    pub symbol: Symbol,
    pub children: Children,
}

/// Shared handle to an immutable node. Cloning is `O(1)`.
#[derive(Debug, Clone)]
pub struct DerivationTree(Rc<TreeNode>);

impl DerivationTree {
    pub fn with_id(id: NodeId, symbol: Symbol, children: Children) -> Self {
        let children = match children {
            Children::Expanded(v) if v.is_empty() => Children::Terminal,
            other => other,
        };
        DerivationTree(Rc::new(TreeNode { id, symbol, children }))
    }

    /// Expanded node; an empty child list yields a Terminal node (epsilon expansion).
    pub fn new(symbol: impl Into<Symbol>, children: Vec<DerivationTree>) -> Self {
        Self::with_id(NodeId::fresh(), symbol.into(), Children::Expanded(children))
    }

    pub fn leaf(symbol: impl Into<Symbol>) -> Self {
        Self::with_id(NodeId::fresh(), symbol.into(), Children::Terminal)
    }

    pub fn open(symbol: impl Into<Symbol>) -> Self {
        Self::with_id(NodeId::fresh(), symbol.into(), Children::Unexpanded)
    }

    pub fn id(&self) -> NodeId { self.0.id }
    pub fn symbol(&self) -> &Symbol { &self.0.symbol }
    pub fn node(&self) -> &TreeNode { &self.0 }
    pub fn is_open(&self) -> bool { matches!(self.0.children, Children::Unexpanded) }
    pub fn is_leaf(&self) -> bool { !matches!(self.0.children, Children::Expanded(_)) }
    pub fn same_node(&self, other: &DerivationTree) -> bool { Rc::ptr_eq(&self.0, &other.0) }

    /// Child nodes; empty for Unexpanded and Terminal nodes.
    pub fn children(&self) -> &[DerivationTree] {
        match &self.0.children {
            Children::Expanded(v) => v,
            _ => &[],
        }
    }

    /// No open node anywhere below.
    pub fn is_complete(&self) -> bool {
        self.preorder().all(|n| !n.is_open())
    }

    /// Node reached by following child indices.
    pub fn subtree_at(&self, path: &Path) -> GraftResult<DerivationTree> {
        let mut cur = self.clone();
        for (depth, &idx) in path.as_slice().iter().enumerate() {
            let next = match &cur.0.children {
                Children::Expanded(v) => v.get(idx).cloned().ok_or_else(|| {
                    GraftError::invalid_path(path, format!("index {} out of range at depth {} ({} children)", idx, depth, v.len()))
                })?,
                Children::Unexpanded => return Err(GraftError::invalid_path(path, format!("open node {} at depth {}", cur.symbol(), depth))),
                Children::Terminal => return Err(GraftError::invalid_path(path, format!("leaf {:?} at depth {}", cur.symbol().as_str(), depth))),
            };
            cur = next;
        }
        Ok(cur)
    }

    /// New tree with the subtree at `path` replaced. Ancestors keep their ids,
    /// siblings are shared.
    pub fn replace_at(&self, path: &Path, replacement: DerivationTree) -> GraftResult<DerivationTree> {
        fn recurse(node: &DerivationTree, rest: &[usize], full: &Path, replacement: DerivationTree) -> GraftResult<DerivationTree> {
            let Some((&head, tail)) = rest.split_first() else { return Ok(replacement) };
            let children = match &node.0.children {
                Children::Expanded(v) => v,
                _ => return Err(GraftError::invalid_path(full, format!("node {} has no children", node.symbol()))),
            };
            let child = children.get(head).ok_or_else(|| {
                GraftError::invalid_path(full, format!("index {} out of range ({} children)", head, children.len()))
            })?;
            let mut new_children = children.clone();
            new_children[head] = recurse(child, tail, full, replacement)?;
            Ok(DerivationTree::with_id(node.id(), node.symbol().clone(), Children::Expanded(new_children)))
        }
        recurse(self, path.as_slice(), path, replacement)
    }

    /// Depth-first search by id.
    pub fn find(&self, id: NodeId) -> Option<Path> {
        fn inner(node: &DerivationTree, id: NodeId, acc: &mut Vec<usize>) -> bool {
            if node.id() == id { return true; }
            for (i, c) in node.children().iter().enumerate() {
                acc.push(i);
                if inner(c, id, acc) { return true; }
                acc.pop();
            }
            false
        }
        let mut acc = Vec::new();
        if inner(self, id, &mut acc) { Some(Path::from(acc)) } else { None }
    }

    pub fn get(&self, id: NodeId) -> Option<DerivationTree> {
        self.preorder().find(|n| n.id() == id)
    }

    pub fn contains_id(&self, id: NodeId) -> bool { self.find(id).is_some() }

    /// Pre-order traversal (left to right).
    pub fn preorder(&self) -> impl Iterator<Item = DerivationTree> {
        let mut stack = vec![self.clone()];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            // дети в обратном порядке, чтобы обход шёл слева направо
            for c in node.children().iter().rev() { stack.push(c.clone()); }
            Some(node)
        })
    }

    pub fn node_ids(&self) -> Vec<NodeId> { self.preorder().map(|n| n.id()).collect() }

    /// Paths of all Unexpanded nodes, left to right.
    pub fn open_leaves(&self) -> Vec<Path> {
        fn inner(node: &DerivationTree, path: Path, out: &mut Vec<Path>) {
            if node.is_open() { out.push(path); return; }
            for (i, c) in node.children().iter().enumerate() { inner(c, path.child(i), out); }
        }
        let mut out = Vec::new();
        inner(self, Path::root(), &mut out);
        out
    }

    /// Deep copy with fresh ids.
    pub fn duplicate(&self) -> DerivationTree {
        let children = match &self.0.children {
            Children::Unexpanded => Children::Unexpanded,
            Children::Terminal => Children::Terminal,
            Children::Expanded(v) => Children::Expanded(v.iter().map(|c| c.duplicate()).collect()),
        };
        DerivationTree::with_id(NodeId::fresh(), self.symbol().clone(), children)
    }

    /// Render; open nodes optionally shown as their symbol.
    pub fn render(&self, show_open: bool) -> String {
        let mut out = String::new();
        for n in self.preorder() {
            match &n.0.children {
                Children::Terminal if n.symbol().is_terminal() => out.push_str(n.symbol().as_str()),
                Children::Unexpanded if show_open => out.push_str(n.symbol().as_str()),
                _ => {}
            }
        }
        out
    }

    /// Id-independent structural fingerprint (FNV over symbols and shape).
    pub fn fingerprint(&self) -> u64 {
        fn fnv64(acc: u64, byte: u64) -> u64 { let mut h = acc; h ^= byte.wrapping_mul(0x100000001b3); h = h.wrapping_mul(0x100000001b3); h }
        fn node_fp(node: &DerivationTree) -> u64 {
            let mut h: u64 = 0xcbf29ce484222325; // FNV offset
            for b in node.symbol().as_str().bytes() { h = fnv64(h, b as u64); }
            match &node.0.children {
                Children::Unexpanded => h = fnv64(h, 1),
                Children::Terminal => h = fnv64(h, 2),
                Children::Expanded(v) => {
                    h = fnv64(h, 3);
                    h = fnv64(h, v.len() as u64);
                    for c in v { h = fnv64(h, node_fp(c)); }
                }
            }
            h
        }
        node_fp(self)
    }

    /// Same shape, symbols and ids.
    pub fn structurally_equal(&self, other: &DerivationTree) -> bool {
        if self.same_node(other) { return true; }
        if self.id() != other.id() || self.symbol() != other.symbol() { return false; }
        match (&self.0.children, &other.0.children) {
            (Children::Unexpanded, Children::Unexpanded) | (Children::Terminal, Children::Terminal) => true,
            (Children::Expanded(a), Children::Expanded(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structurally_equal(y))
            }
            _ => false,
        }
    }
}

/// Terminal projection: terminal leaves left to right. Open nodes contribute nothing.
impl fmt::Display for DerivationTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}
