/*!
# Grammar Index

Canonical, flattened view of a context-free grammar: every nonterminal maps to
its ordered production alternatives, every alternative is an ordered symbol
sequence. The reverse index (`possible_parents`) answers "which symbols could
directly contain this one", which is what the insertion engine uses to wrap a
tree that has no attachment point yet.

Built once per grammar and read-only afterwards.
*/

use std::collections::HashMap;

use crate::core::errors::{GraftError, GraftResult};
use crate::tree::{Symbol, SymbolTable};

pub mod graph;
pub mod loader;

pub use graph::{GrammarGraph, ProductionPaths};
pub use loader::split_expansion;

/// One production alternative.
pub type Alternative = Vec<Symbol>;

#[derive(Debug, Clone, Default)]
pub struct GrammarIndex {
    symbols: SymbolTable,
    /// Nonterminals in declaration order.
    order: Vec<Symbol>,
    rules: HashMap<Symbol, Vec<Alternative>>,
    parents: HashMap<Symbol, Vec<Symbol>>,
}

impl GrammarIndex {
    /// Build from `(nonterminal, alternatives)` pairs in declaration order.
    pub fn from_rules<I, S, A>(rules: I) -> GraftResult<Self>
    where
        I: IntoIterator<Item = (S, Vec<A>)>,
        S: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        let mut index = GrammarIndex::default();
        for (lhs, alternatives) in rules {
            let lhs = index.symbols.intern(lhs.as_ref());
            if !lhs.is_nonterminal() {
                return Err(GraftError::Grammar(format!("rule head {:?} is not a nonterminal", lhs.as_str())));
            }
            if index.rules.contains_key(&lhs) {
                return Err(GraftError::Grammar(format!("duplicate rule for {}", lhs)));
            }
            let alts: Vec<Alternative> = alternatives
                .into_iter()
                .map(|alt| alt.into_iter().map(|s| index.symbols.intern(s.as_ref())).collect())
                .collect();
            index.order.push(lhs.clone());
            index.rules.insert(lhs, alts);
        }
        index.check_defined()?;
        index.build_parents();
        Ok(index)
    }

    fn check_defined(&self) -> GraftResult<()> {
        for lhs in &self.order {
            for alt in &self.rules[lhs] {
                if let Some(undefined) = alt.iter().find(|s| s.is_nonterminal() && !self.rules.contains_key(*s)) {
                    return Err(GraftError::Grammar(format!("{} refers to undefined nonterminal {}", lhs, undefined)));
                }
            }
        }
        Ok(())
    }

    /// Инвертируем отношение "альтернатива содержит символ".
    fn build_parents(&mut self) {
        let mut parents: HashMap<Symbol, Vec<Symbol>> = HashMap::new();
        for lhs in &self.order {
            for alt in &self.rules[lhs] {
                for child in alt {
                    let entry = parents.entry(child.clone()).or_default();
                    if !entry.contains(lhs) { entry.push(lhs.clone()); }
                }
            }
        }
        self.parents = parents;
    }

    /// All productions of a nonterminal; empty for terminals and unknown symbols.
    pub fn alternatives(&self, symbol: &Symbol) -> &[Alternative] {
        self.rules.get(symbol).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Symbols with at least one alternative directly containing `symbol`, in declaration order.
    pub fn possible_parents(&self, symbol: &Symbol) -> &[Symbol] {
        self.parents.get(symbol).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// The single all-terminal alternative of `symbol`, if that is its only one.
    pub fn trivial_expansion(&self, symbol: &Symbol) -> Option<&Alternative> {
        match self.alternatives(symbol) {
            [only] if only.iter().all(|s| s.is_terminal()) => Some(only),
            _ => None,
        }
    }

    /// First declared nonterminal.
    pub fn start_symbol(&self) -> Option<&Symbol> { self.order.first() }
    pub fn nonterminals(&self) -> impl Iterator<Item = &Symbol> { self.order.iter() }
    pub fn is_defined(&self, symbol: &Symbol) -> bool { self.rules.contains_key(symbol) }
    pub fn len(&self) -> usize { self.order.len() }
    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    /// Interned handle for `text` (shares the grammar's allocation when known).
    pub fn symbol(&self, text: &str) -> Symbol {
        self.symbols.get(text).cloned().unwrap_or_else(|| Symbol::new(text))
    }

    /// Total number of alternatives over all nonterminals.
    pub fn production_count(&self) -> usize { self.rules.values().map(|v| v.len()).sum() }
}
