//! Rule matching and node construction for the insertion engine.
//!
//! - `walk_path` follows an abstract grammar path through a concrete tree,
//!   feeding side branches to the frontier;
//! - `matching_alternatives` picks productions that keep the old subtree and
//!   give the inserted tree a slot;
//! - `build_parent_node` / `wrap` realize those productions as new nodes.

use std::collections::VecDeque;

use crate::core::errors::{GraftError, GraftResult};
use crate::grammar::{Alternative, GrammarIndex};
use crate::tree::{DerivationTree, Symbol};

/// Result of following a grammar path through the target tree.
#[derive(Debug, Clone)]
pub struct Walk {
    /// Concrete node for the last path symbol before the insert symbol.
    pub parent: DerivationTree,
    /// Existing child of `parent` with the insert symbol.
    pub sibling: Option<DerivationTree>,
}

/// Follow `path` (`start.symbol, ..., insert`) from `start` down to the node for
/// the second-to-last symbol. Nonterminal children that are not walked into are
/// queued on `frontier`, also on the node where the walk fails.
pub fn walk_path(
    start: &DerivationTree,
    path: &[Symbol],
    insert: &Symbol,
    frontier: &mut VecDeque<DerivationTree>,
) -> GraftResult<Walk> {
    if path.len() < 2 || path[0] != *start.symbol() {
        return Err(GraftError::StructuralMismatch {
            symbol: start.symbol().to_string(),
            expected: path.first().map(|s| s.to_string()).unwrap_or_default(),
        });
    }
    let mut current = start.clone();
    for expected in &path[1..path.len() - 1] {
        let next = {
            let children = current.children();
            let idx = children.iter().position(|c| c.symbol() == expected);
            // боковые ветви уходят во фронтир и тогда, когда путь не реализован
            for (j, c) in children.iter().enumerate() {
                if Some(j) != idx && c.symbol().is_nonterminal() { frontier.push_back(c.clone()); }
            }
            let Some(idx) = idx else {
                return Err(GraftError::StructuralMismatch {
                    symbol: current.symbol().to_string(),
                    expected: expected.to_string(),
                });
            };
            children[idx].clone()
        };
        current = next;
    }
    let sibling = current.children().iter().find(|c| c.symbol() == insert).cloned();
    for c in current.children() {
        if c.symbol().is_nonterminal() { frontier.push_back(c.clone()); }
    }
    Ok(Walk { parent: current, sibling })
}

/// Alternatives of `parent` containing both `parent` and `insert` (as separate
/// slots when they coincide), shortest first, ties in declaration order.
pub fn matching_alternatives<'g>(grammar: &'g GrammarIndex, parent: &Symbol, insert: &Symbol) -> Vec<&'g Alternative> {
    let mut matching: Vec<&Alternative> = grammar
        .alternatives(parent)
        .iter()
        .filter(|alt| {
            if parent == insert {
                alt.iter().filter(|s| *s == parent).count() >= 2
            } else {
                alt.contains(parent) && alt.contains(insert)
            }
        })
        .collect();
    matching.sort_by_key(|alt| alt.len());
    matching
}

pub fn shortest_matching_alternative<'g>(grammar: &'g GrammarIndex, parent: &Symbol, insert: &Symbol) -> GraftResult<&'g Alternative> {
    matching_alternatives(grammar, parent, insert)
        .into_iter()
        .next()
        .ok_or_else(|| GraftError::NoProduction { parent: parent.to_string(), child: insert.to_string() })
}

/// Node for a slot that is neither the old subtree nor the inserted tree.
pub fn filler(grammar: &GrammarIndex, symbol: &Symbol, expand_trivial: bool) -> DerivationTree {
    if symbol.is_terminal() {
        return DerivationTree::leaf(symbol.clone());
    }
    if expand_trivial {
        if let Some(alt) = grammar.trivial_expansion(symbol) {
            return DerivationTree::new(symbol.clone(), alt.iter().map(|s| DerivationTree::leaf(s.clone())).collect());
        }
    }
    DerivationTree::open(symbol.clone())
}

/// Realize `alternative` as a fresh node of `old.symbol()`: the inserted tree
/// takes the first insert-symbol slot, `old` the first parent-symbol slot still
/// free; a further insert-symbol slot gets one copy of `sibling`.
pub fn build_parent_node(
    grammar: &GrammarIndex,
    alternative: &Alternative,
    old: &DerivationTree,
    insert: &DerivationTree,
    sibling: Option<&DerivationTree>,
    expand_trivial: bool,
) -> DerivationTree {
    let mut insert_placed = false;
    let mut old_placed = false;
    let mut sibling = sibling;
    let mut children = Vec::with_capacity(alternative.len());
    for sym in alternative {
        if !insert_placed && sym == insert.symbol() {
            children.push(insert.clone());
            insert_placed = true;
        } else if !old_placed && sym == old.symbol() {
            children.push(old.clone());
            old_placed = true;
        } else if sym == insert.symbol() && sibling.is_some() {
            // копия с новыми id: исходный sibling уже живёт внутри old
            if let Some(s) = sibling.take() { children.push(s.duplicate()); }
        } else {
            children.push(filler(grammar, sym, expand_trivial));
        }
    }
    DerivationTree::new(old.symbol().clone(), children)
}

/// Wrap `insert` in a node of `parent`, using the shortest alternative of
/// `parent` that has a slot for it. Other nonterminal slots stay open.
pub fn wrap(grammar: &GrammarIndex, parent: &Symbol, insert: &DerivationTree) -> GraftResult<DerivationTree> {
    let alt = grammar
        .alternatives(parent)
        .iter()
        .filter(|alt| alt.contains(insert.symbol()))
        .min_by_key(|alt| alt.len())
        .ok_or_else(|| GraftError::NoProduction { parent: parent.to_string(), child: insert.symbol().to_string() })?;
    let mut placed = false;
    let children = alt
        .iter()
        .map(|sym| {
            if !placed && sym == insert.symbol() {
                placed = true;
                insert.clone()
            } else if sym.is_terminal() {
                DerivationTree::leaf(sym.clone())
            } else {
                DerivationTree::open(sym.clone())
            }
        })
        .collect();
    Ok(DerivationTree::new(parent.clone(), children))
}
