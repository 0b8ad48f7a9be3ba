//! SEEK / EXTEND state machine.
//!
//! Each call to [`InsertionEngine::step`] does one unit of work: examines one
//! frontier candidate (SEEK) or performs one wrapping of the inserted tree
//! (EXTEND). The `Iterator` impl drives `step` until a result is accepted or
//! the engine is done, so consumers pull results lazily.

use once_cell::unsync::OnceCell;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace, warn};

use super::oracle::{OrderingPredicate, Rejection, ValidityOracle};
use super::rules;
use crate::core::config::InsertionSettings;
use crate::core::errors::{GraftError, GraftResult};
use crate::grammar::{GrammarGraph, GrammarIndex, ProductionPaths};
use crate::tree::{DerivationTree, NodeId, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Scanning frontier candidates in the target tree.
    Seek,
    /// Frontier exhausted; wrap the inserted tree in a parent symbol.
    Extend,
    Done,
}

/// Outcome of a single step.
#[derive(Debug, Clone)]
pub enum EngineStep {
    /// Accepted result.
    Emit(DerivationTree),
    /// Work done, nothing to surface yet.
    Continue,
    /// Sequence exhausted or bound reached.
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertionStats {
    pub candidates: usize,
    pub discarded: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub extensions: usize,
    pub emitted: usize,
}

/// Reachability source: caller-supplied or built from the grammar on first use.
enum GraphSource<'g> {
    Supplied(&'g dyn ProductionPaths),
    Lazy(OnceCell<GrammarGraph>),
}

pub struct InsertionEngine<'g> {
    grammar: &'g GrammarIndex,
    graph: GraphSource<'g>,
    target: DerivationTree,
    /// Current (possibly wrapped) tree being inserted and its root symbol.
    insert: DerivationTree,
    insert_symbol: Symbol,
    oracle: ValidityOracle,
    predicate: Option<OrderingPredicate>,
    settings: InsertionSettings,
    state: EngineState,
    frontier: VecDeque<DerivationTree>,
    visited: HashSet<NodeId>,
    pending_wrappers: VecDeque<DerivationTree>,
    /// (insert symbol, parent symbol) pairs already used for wrapping.
    tried_parents: HashSet<(Symbol, Symbol)>,
    seen: HashSet<u64>,
    stats: InsertionStats,
}

impl<'g> InsertionEngine<'g> {
    pub fn new(
        grammar: &'g GrammarIndex,
        insert: DerivationTree,
        target: DerivationTree,
        graph: Option<&'g dyn ProductionPaths>,
        predicate: Option<OrderingPredicate>,
        settings: InsertionSettings,
    ) -> Self {
        let oracle = ValidityOracle::new(&target, &insert);
        let graph = match graph {
            Some(g) => GraphSource::Supplied(g),
            None => GraphSource::Lazy(OnceCell::new()),
        };
        let mut frontier = VecDeque::new();
        frontier.push_back(target.clone());
        debug!("Insertion of {} into {} started", insert.symbol(), target.symbol());
        Self {
            grammar,
            graph,
            insert_symbol: insert.symbol().clone(),
            insert,
            target,
            oracle,
            predicate,
            settings,
            state: EngineState::Seek,
            frontier,
            visited: HashSet::new(),
            pending_wrappers: VecDeque::new(),
            tried_parents: HashSet::new(),
            seen: HashSet::new(),
            stats: InsertionStats::default(),
        }
    }

    pub fn state(&self) -> EngineState { self.state }
    pub fn stats(&self) -> InsertionStats { self.stats }

    fn paths(&self) -> &dyn ProductionPaths {
        match &self.graph {
            GraphSource::Supplied(g) => *g,
            GraphSource::Lazy(cell) => {
                let graph: &GrammarGraph = cell.get_or_init(|| GrammarGraph::from_grammar(self.grammar));
                graph
            }
        }
    }

    fn limit_reached(&self) -> bool {
        self.settings.max_solutions.map_or(false, |max| self.stats.emitted >= max)
    }

    /// One unit of work.
    pub fn step(&mut self) -> EngineStep {
        if self.state != EngineState::Done && self.limit_reached() {
            debug!("Solution bound reached after {} results", self.stats.emitted);
            self.state = EngineState::Done;
        }
        match self.state {
            EngineState::Done => EngineStep::Done,
            EngineState::Seek => match self.frontier.pop_front() {
                Some(candidate) => self.examine(candidate),
                None => {
                    self.state = EngineState::Extend;
                    EngineStep::Continue
                }
            },
            EngineState::Extend => self.extend(),
        }
    }

    fn examine(&mut self, candidate: DerivationTree) -> EngineStep {
        if !self.visited.insert(candidate.id()) {
            return EngineStep::Continue;
        }
        self.stats.candidates += 1;
        let produced = if candidate.is_open() && *candidate.symbol() == self.insert_symbol {
            self.substitute_open(&candidate).map(Some)
        } else {
            self.attach(&candidate)
        };
        match produced {
            Ok(Some(tree)) => self.accept(tree),
            Ok(None) => {
                self.stats.discarded += 1;
                EngineStep::Continue
            }
            Err(e) if e.is_recoverable() => {
                trace!("Candidate {} ({}) skipped: {}", candidate.id(), candidate.symbol(), e);
                self.stats.discarded += 1;
                EngineStep::Continue
            }
            Err(e) => {
                warn!("Candidate {} ({}) failed: {}", candidate.id(), candidate.symbol(), e);
                self.stats.discarded += 1;
                EngineStep::Continue
            }
        }
    }

    /// Open node with the insert symbol: replace it outright.
    fn substitute_open(&self, candidate: &DerivationTree) -> GraftResult<DerivationTree> {
        let path = self.target.find(candidate.id()).ok_or(GraftError::UnknownNode(candidate.id()))?;
        self.target.replace_at(&path, self.insert.clone())
    }

    fn attach(&mut self, candidate: &DerivationTree) -> GraftResult<Option<DerivationTree>> {
        let Some(path) = self.paths().shortest_production_path(candidate.symbol(), &self.insert_symbol) else {
            trace!("No production path from {} to {}", candidate.symbol(), self.insert_symbol);
            return Ok(None);
        };
        let walk = rules::walk_path(candidate, &path, &self.insert_symbol, &mut self.frontier)?;
        let alternative = rules::shortest_matching_alternative(self.grammar, walk.parent.symbol(), &self.insert_symbol)?;
        let node = rules::build_parent_node(
            self.grammar,
            alternative,
            &walk.parent,
            &self.insert,
            walk.sibling.as_ref(),
            self.settings.expand_trivial,
        );
        let located = self.target.find(walk.parent.id()).ok_or(GraftError::UnknownNode(walk.parent.id()))?;
        Ok(Some(self.target.replace_at(&located, node)?))
    }

    fn accept(&mut self, tree: DerivationTree) -> EngineStep {
        let mut verdict = if self.settings.check_validity { self.oracle.check(&tree) } else { Ok(()) };
        if verdict.is_ok() {
            if let Some(p) = &self.predicate {
                if !p.holds(&tree, self.oracle.insert_text()) { verdict = Err(Rejection::Ordering); }
            }
        }
        if let Err(reason) = verdict {
            trace!("Candidate {:?} rejected: {}", tree.to_string(), reason);
            self.stats.rejected += 1;
            return EngineStep::Continue;
        }
        if !self.seen.insert(tree.fingerprint()) {
            self.stats.duplicates += 1;
            return EngineStep::Continue;
        }
        self.stats.emitted += 1;
        debug!("Result #{}: {:?}", self.stats.emitted, tree.to_string());
        EngineStep::Emit(tree)
    }

    fn extend(&mut self) -> EngineStep {
        let grammar = self.grammar;
        // дальше корневого символа цели оборачивать бессмысленно
        if self.insert_symbol != *self.target.symbol() {
            for parent in grammar.possible_parents(&self.insert_symbol) {
                if !self.tried_parents.insert((self.insert_symbol.clone(), parent.clone())) {
                    continue;
                }
                match rules::wrap(grammar, parent, &self.insert) {
                    Ok(wrapper) => self.pending_wrappers.push_back(wrapper),
                    Err(e) => trace!("Cannot wrap {} in {}: {}", self.insert_symbol, parent, e),
                }
            }
        }
        if let Some(max) = self.settings.max_extensions {
            if self.stats.extensions >= max {
                debug!("Extension cap {} reached", max);
                self.state = EngineState::Done;
                return EngineStep::Done;
            }
        }
        match self.pending_wrappers.pop_front() {
            Some(wrapper) => {
                debug!("Extending {} to {}", self.insert_symbol, wrapper.symbol());
                self.insert_symbol = wrapper.symbol().clone();
                self.insert = wrapper;
                self.frontier.clear();
                self.frontier.push_back(self.target.clone());
                self.visited.clear();
                self.stats.extensions += 1;
                self.state = EngineState::Seek;
                EngineStep::Continue
            }
            None => {
                debug!("Insertion exhausted: {:?}", self.stats);
                self.state = EngineState::Done;
                EngineStep::Done
            }
        }
    }
}

impl<'g> Iterator for InsertionEngine<'g> {
    type Item = DerivationTree;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.step() {
                EngineStep::Emit(tree) => return Some(tree),
                EngineStep::Continue => continue,
                EngineStep::Done => return None,
            }
        }
    }
}
