//! Validity oracle and ordering predicate.
//!
//! Both checks work on terminal projections only. They are heuristics: a
//! structurally valid merge can be rejected and a wrong one accepted.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::GraftError;
use crate::tree::{DerivationTree, NodeId};

/// Why a candidate was turned down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// A token of the original target is missing.
    MissingToken(String),
    /// Result shorter than target plus insert.
    TooShort { actual: usize, required: usize },
    /// Insert text does not occur verbatim.
    InsertNotFound,
    /// Ordering predicate failed.
    Ordering,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingToken(t) => write!(f, "token {:?} lost", t),
            Rejection::TooShort { actual, required } => write!(f, "length {} < {}", actual, required),
            Rejection::InsertNotFound => write!(f, "inserted text not found"),
            Rejection::Ordering => write!(f, "ordering predicate failed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidityOracle {
    target_tokens: HashSet<String>,
    target_len: usize,
    insert_text: String,
}

impl ValidityOracle {
    pub fn new(target: &DerivationTree, insert: &DerivationTree) -> Self {
        let target_text = target.to_string();
        Self {
            target_tokens: target_text.split_whitespace().map(str::to_string).collect(),
            target_len: target_text.len(),
            insert_text: insert.to_string(),
        }
    }

    pub fn insert_text(&self) -> &str { &self.insert_text }

    pub fn check(&self, candidate: &DerivationTree) -> Result<(), Rejection> {
        self.check_text(&candidate.to_string())
    }

    pub fn check_text(&self, text: &str) -> Result<(), Rejection> {
        let tokens: HashSet<&str> = text.split_whitespace().collect();
        if let Some(missing) = self.target_tokens.iter().find(|t| !tokens.contains(t.as_str())) {
            return Err(Rejection::MissingToken(missing.clone()));
        }
        let required = self.target_len + self.insert_text.len();
        if text.len() < required {
            return Err(Rejection::TooShort { actual: text.len(), required });
        }
        if !text.contains(&self.insert_text) {
            return Err(Rejection::InsertNotFound);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Before,
    After,
}

impl FromStr for Relation {
    type Err = GraftError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "before" => Ok(Relation::Before),
            "after" => Ok(Relation::After),
            other => Err(GraftError::Grammar(format!("unknown ordering relation {:?}", other))),
        }
    }
}

/// Inserted text must lie before/after the text of `reference` in the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingPredicate {
    pub relation: Relation,
    pub reference: NodeId,
}

impl OrderingPredicate {
    pub fn new(relation: Relation, reference: NodeId) -> Self { Self { relation, reference } }

    /// String-partition check: split the result at the first occurrence of the
    /// reference text and look for the insert text on the requested side.
    pub fn holds(&self, candidate: &DerivationTree, insert_text: &str) -> bool {
        let Some(reference) = candidate.get(self.reference) else { return false };
        let reference_text = reference.to_string();
        let text = candidate.to_string();
        match text.split_once(reference_text.as_str()) {
            None => false,
            Some((head, tail)) => match self.relation {
                Relation::Before => head.contains(insert_text),
                Relation::After => tail.contains(insert_text),
            },
        }
    }
}
