//! Grammar loading from JSON.
//!
//! Two shapes are accepted, keyed by nonterminal in declaration order:
//! - compact: `{"<stmt>": ["<assgn>", "<assgn> ; <stmt>"]}`, expansion strings
//!   are split at nonterminal boundaries;
//! - canonical: `{"<stmt>": [["<assgn>"], ["<assgn>", " ; ", "<stmt>"]]}`.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::path::Path;

use super::GrammarIndex;

static RE_NONTERMINAL_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<> ]*>").expect("valid regex"));

/// Split an expansion string into symbols; terminal runs between nonterminals stay whole.
pub fn split_expansion(expansion: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in RE_NONTERMINAL_SPLIT.find_iter(expansion) {
        if m.start() > last { out.push(expansion[last..m.start()].to_string()); }
        out.push(m.as_str().to_string());
        last = m.end();
    }
    if last < expansion.len() { out.push(expansion[last..].to_string()); }
    out
}

impl GrammarIndex {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).context("Grammar is not valid JSON")?;
        let object = value.as_object().context("Grammar must be a JSON object")?;
        let mut rules: Vec<(String, Vec<Vec<String>>)> = Vec::with_capacity(object.len());
        for (lhs, alternatives) in object {
            let list = alternatives
                .as_array()
                .with_context(|| format!("Alternatives of {} must be an array", lhs))?;
            let mut alts = Vec::with_capacity(list.len());
            for alt in list {
                match alt {
                    Value::String(s) => alts.push(split_expansion(s)),
                    Value::Array(symbols) => {
                        let symbols = symbols
                            .iter()
                            .map(|s| s.as_str().map(str::to_string))
                            .collect::<Option<Vec<_>>>()
                            .with_context(|| format!("Canonical alternative of {} must contain only strings", lhs))?;
                        alts.push(symbols);
                    }
                    other => anyhow::bail!("Unsupported alternative for {}: {}", lhs, other),
                }
            }
            rules.push((lhs.clone(), alts));
        }
        Ok(GrammarIndex::from_rules(rules)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read grammar from {}", path.as_ref().display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to load grammar from {}", path.as_ref().display()))
    }
}
