/*!
# Insertion Engine

Grammar-directed grafting of one derivation tree into another.

Given a complete target tree and a (possibly partial) tree to insert, the
engine lazily yields new trees in which the inserted tree sits at a
grammar-legal position and every leaf of the target survives.

```text
SEEK  ── frontier empty ──▶ EXTEND ── wrapper queued ──▶ SEEK
  │                           │
  └── bound reached ──▶ DONE ◀┘ no untried parent
```

Результаты не ранжируются: порядок выдачи совпадает с порядком обхода
(в ширину по дереву-цели, затем по слоям обёрток).
*/

use crate::core::config::{GraftConfig, InsertionSettings};
use crate::grammar::{GrammarIndex, ProductionPaths};
use crate::tree::DerivationTree;

pub mod engine;
pub mod oracle;
pub mod rules;

pub use engine::{EngineState, EngineStep, InsertionEngine, InsertionStats};
pub use oracle::{OrderingPredicate, Rejection, Relation, ValidityOracle};

/// Builder for one insertion call.
pub struct InsertionRequest<'g> {
    grammar: &'g GrammarIndex,
    insert_tree: DerivationTree,
    target_tree: DerivationTree,
    graph: Option<&'g dyn ProductionPaths>,
    predicate: Option<OrderingPredicate>,
    settings: InsertionSettings,
}

impl<'g> InsertionRequest<'g> {
    pub fn new(grammar: &'g GrammarIndex, insert_tree: DerivationTree, target_tree: DerivationTree) -> Self {
        Self {
            grammar,
            insert_tree,
            target_tree,
            graph: None,
            predicate: None,
            settings: InsertionSettings::default(),
        }
    }

    /// Use an existing reachability structure instead of building one.
    pub fn with_graph(mut self, graph: &'g dyn ProductionPaths) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn with_predicate(mut self, predicate: OrderingPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_max_solutions(mut self, max: usize) -> Self {
        self.settings.max_solutions = Some(max);
        self
    }

    pub fn with_settings(mut self, settings: InsertionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_config(self, config: &GraftConfig) -> Self {
        self.with_settings(config.insertion.clone())
    }

    pub fn run(self) -> InsertionEngine<'g> {
        InsertionEngine::new(
            self.grammar,
            self.insert_tree,
            self.target_tree,
            self.graph,
            self.predicate,
            self.settings,
        )
    }
}

/// Lazy sequence of trees with `insert_tree` grafted into `target_tree`.
pub fn insert<'g>(
    grammar: &'g GrammarIndex,
    insert_tree: &DerivationTree,
    target_tree: &DerivationTree,
    graph: Option<&'g dyn ProductionPaths>,
    predicate: Option<OrderingPredicate>,
    max_solutions: Option<usize>,
) -> InsertionEngine<'g> {
    let settings = InsertionSettings { max_solutions, ..InsertionSettings::default() };
    InsertionEngine::new(grammar, insert_tree.clone(), target_tree.clone(), graph, predicate, settings)
}
