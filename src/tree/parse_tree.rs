//! Parse-tree interchange format.
//!
//! Nested JSON arrays `["<sym>", [children...]]`: `null` children mark an open
//! node, `[]` a closed leaf.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;

use super::{Children, DerivationTree, NodeId, Symbol};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseTree(pub String, pub Option<Vec<ParseTree>>);

impl ParseTree {
    pub fn load_from_file<P: AsRef<FsPath>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read parse tree from {}", path.as_ref().display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON tree from {}", path.as_ref().display()))
    }
}

impl DerivationTree {
    /// Fresh ids are assigned to every node.
    pub fn from_parse_tree(tree: &ParseTree) -> DerivationTree {
        let ParseTree(symbol, children) = tree;
        let children = match children {
            None => Children::Unexpanded,
            Some(v) if v.is_empty() => Children::Terminal,
            Some(v) => Children::Expanded(v.iter().map(DerivationTree::from_parse_tree).collect()),
        };
        DerivationTree::with_id(NodeId::fresh(), Symbol::new(symbol), children)
    }

    pub fn to_parse_tree(&self) -> ParseTree {
        let children = match &self.node().children {
            Children::Unexpanded => None,
            Children::Terminal => Some(Vec::new()),
            Children::Expanded(v) => Some(v.iter().map(|c| c.to_parse_tree()).collect()),
        };
        ParseTree(self.symbol().to_string(), children)
    }
}
