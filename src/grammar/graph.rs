//! Grammar reachability graph.
//!
//! Ребро `A -> B` означает, что `B` встречается в одной из альтернатив `A`.
//! Кратчайшие пути ищутся обходом в ширину; соседи перебираются в порядке
//! объявления, чтобы результат был детерминированным.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

use super::GrammarIndex;
use crate::tree::Symbol;

/// Capability the insertion engine needs from a reachability structure.
pub trait ProductionPaths {
    /// Shortest chain `from = s0, s1, ..., sk = to` with `k >= 1`, each step one
    /// production. `None` if `to` is unreachable from `from`.
    fn shortest_production_path(&self, from: &Symbol, to: &Symbol) -> Option<Vec<Symbol>>;
}

#[derive(Debug, Clone)]
pub struct GrammarGraph {
    graph: DiGraph<Symbol, ()>,
    node_map: HashMap<Symbol, NodeIndex>,
}

impl GrammarGraph {
    pub fn from_grammar(grammar: &GrammarIndex) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map: HashMap<Symbol, NodeIndex> = HashMap::new();
        let mut index_of = |graph: &mut DiGraph<Symbol, ()>, sym: &Symbol| -> NodeIndex {
            *node_map.entry(sym.clone()).or_insert_with(|| graph.add_node(sym.clone()))
        };
        for lhs in grammar.nonterminals() {
            let from = index_of(&mut graph, lhs);
            for alt in grammar.alternatives(lhs) {
                for sym in alt {
                    let to = index_of(&mut graph, sym);
                    if graph.find_edge(from, to).is_none() { graph.add_edge(from, to, ()); }
                }
            }
        }
        debug!("Grammar graph: {} symbols, {} edges", graph.node_count(), graph.edge_count());
        Self { graph, node_map }
    }

    /// Successors in edge-insertion (declaration) order.
    fn successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<_> = self.graph.neighbors_directed(node, Direction::Outgoing).collect();
        // petgraph отдаёт соседей в обратном порядке добавления
        out.reverse();
        out
    }

    pub fn node_count(&self) -> usize { self.graph.node_count() }
    pub fn edge_count(&self) -> usize { self.graph.edge_count() }

    /// `to` reachable from `from` in one or more steps.
    pub fn reachable(&self, from: &Symbol, to: &Symbol) -> bool {
        self.shortest_production_path(from, to).is_some()
    }
}

impl ProductionPaths for GrammarGraph {
    fn shortest_production_path(&self, from: &Symbol, to: &Symbol) -> Option<Vec<Symbol>> {
        let &start = self.node_map.get(from)?;
        let &goal = self.node_map.get(to)?;
        // BFS начинается с прямых потомков, поэтому путь всегда нетривиальный
        let mut pred: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::new();
        for next in self.successors(start) {
            if let std::collections::hash_map::Entry::Vacant(e) = pred.entry(next) {
                e.insert(start);
                queue.push_back(next);
            }
        }
        while let Some(cur) = queue.pop_front() {
            if cur == goal {
                let mut path = vec![self.graph[cur].clone()];
                let mut node = cur;
                loop {
                    let p = pred[&node];
                    path.push(self.graph[p].clone());
                    if p == start { break; }
                    node = p;
                }
                path.reverse();
                return Some(path);
            }
            for next in self.successors(cur) {
                if let std::collections::hash_map::Entry::Vacant(e) = pred.entry(next) {
                    e.insert(cur);
                    queue.push_back(next);
                }
            }
        }
        None
    }
}
