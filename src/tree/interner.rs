//! Grammar symbol interning.
//! Symbols are shared `Rc<str>` handles; the table deduplicates them so every
//! occurrence of `<stmt>` in a grammar points at the same allocation.
use std::borrow::Borrow;
use std::collections::HashSet;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;

/// Nonterminals are angle-bracket-delimited names without spaces.
pub static RE_NONTERMINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<[^<> ]*>$").expect("valid regex"));

/// Terminal or nonterminal grammar symbol. The kind is decided once, at construction.
#[derive(Debug, Clone)]
pub struct Symbol {
    text: Rc<str>,
    nonterminal: bool,
}

impl Symbol {
    pub fn new(text: &str) -> Self { Self::from_rc(Rc::from(text)) }

    fn from_rc(text: Rc<str>) -> Self {
        let nonterminal = RE_NONTERMINAL.is_match(&text);
        Symbol { text, nonterminal }
    }

    pub fn as_str(&self) -> &str { &self.text }
    pub fn is_nonterminal(&self) -> bool { self.nonterminal }
    pub fn is_terminal(&self) -> bool { !self.nonterminal }
}

// Hash/Eq/Ord только по тексту: согласовано с `Borrow<str>`
impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.text, &other.text) || self.text == other.text }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) { self.text.hash(state) }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering { self.text.cmp(&other.text) }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str { &self.text }
}

impl From<&str> for Symbol {
    fn from(text: &str) -> Self { Symbol::new(text) }
}

impl From<String> for Symbol {
    fn from(text: String) -> Self { Symbol::from_rc(Rc::from(text)) }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool { &*self.text == other }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool { &*self.text == *other }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.text) }
}

#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    symbols: HashSet<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self { Self::default() }
    pub fn intern<S: AsRef<str>>(&mut self, s: S) -> Symbol {
        let st = s.as_ref();
        if let Some(sym) = self.symbols.get(st) { return sym.clone(); }
        let sym = Symbol::new(st);
        self.symbols.insert(sym.clone());
        sym
    }
    pub fn get(&self, s: &str) -> Option<&Symbol> { self.symbols.get(s) }
    pub fn len(&self) -> usize { self.symbols.len() }
    pub fn is_empty(&self) -> bool { self.symbols.is_empty() }
}
