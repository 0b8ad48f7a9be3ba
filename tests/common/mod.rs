//! Общие грамматики и построители деревьев для интеграционных тестов

#![allow(dead_code)]

use tree_grafter::grammar::GrammarIndex;
use tree_grafter::tree::DerivationTree;

/// Последовательности присваиваний: `x := 1 ; y := z`
pub const LANG_GRAMMAR: &str = r#"{
    "<start>": ["<stmt>"],
    "<stmt>": ["<assgn>", "<assgn> ; <stmt>"],
    "<assgn>": ["<var> := <rhs>"],
    "<rhs>": ["<var>", "<digit>"],
    "<var>": ["x", "y", "z"],
    "<digit>": ["0", "1", "2"]
}"#;

/// Объекты из строковых ключей: `{ "T" : { "I" : true } }`
pub const JSON_GRAMMAR: &str = r##"{
    "<start>": ["<value>"],
    "<value>": ["<object>", "<string>", "true", "false", "null"],
    "<object>": ["{ <members> }"],
    "<members>": ["<member>", "<member> , <members>"],
    "<member>": ["<string> : <value>"],
    "<string>": ["\"<chars>\""],
    "<chars>": ["<char>", "<char><chars>"],
    "<char>": ["T", "I", "k", "e", "y"]
}"##;

pub fn lang_grammar() -> GrammarIndex {
    GrammarIndex::from_json_str(LANG_GRAMMAR).unwrap()
}

pub fn json_grammar() -> GrammarIndex {
    GrammarIndex::from_json_str(JSON_GRAMMAR).unwrap()
}

fn wrap1(symbol: &str, child: DerivationTree) -> DerivationTree {
    DerivationTree::new(symbol, vec![child])
}

/// `<assgn>` for `var := rhs`; `rhs` is a variable or a digit.
pub fn assgn(var: &str, rhs: &str) -> DerivationTree {
    let rhs_child = if rhs.chars().all(|c| c.is_ascii_digit()) {
        wrap1("<digit>", DerivationTree::leaf(rhs))
    } else {
        wrap1("<var>", DerivationTree::leaf(rhs))
    };
    DerivationTree::new("<assgn>", vec![
        wrap1("<var>", DerivationTree::leaf(var)),
        DerivationTree::leaf(" := "),
        wrap1("<rhs>", rhs_child),
    ])
}

/// `<assgn>` whose right-hand side is still open: `var := <rhs>`.
pub fn partial_assgn(var: &str) -> DerivationTree {
    DerivationTree::new("<assgn>", vec![
        wrap1("<var>", DerivationTree::leaf(var)),
        DerivationTree::leaf(" := "),
        DerivationTree::open("<rhs>"),
    ])
}

/// Right-nested `<stmt>` chain under `<start>`.
pub fn program(assignments: &[(&str, &str)]) -> DerivationTree {
    let mut stmt: Option<DerivationTree> = None;
    for (var, rhs) in assignments.iter().rev() {
        stmt = Some(match stmt {
            None => wrap1("<stmt>", assgn(var, rhs)),
            Some(rest) => DerivationTree::new("<stmt>", vec![assgn(var, rhs), DerivationTree::leaf(" ; "), rest]),
        });
    }
    wrap1("<start>", stmt.expect("at least one assignment"))
}

fn chars(text: &str) -> DerivationTree {
    let mut letters = text.chars().rev();
    let last = letters.next().expect("non-empty key");
    let mut node = wrap1("<chars>", wrap1("<char>", DerivationTree::leaf(last.to_string())));
    for c in letters {
        node = DerivationTree::new("<chars>", vec![wrap1("<char>", DerivationTree::leaf(c.to_string())), node]);
    }
    node
}

pub fn string(text: &str) -> DerivationTree {
    DerivationTree::new("<string>", vec![DerivationTree::leaf("\""), chars(text), DerivationTree::leaf("\"")])
}

pub fn literal(word: &str) -> DerivationTree {
    wrap1("<value>", DerivationTree::leaf(word))
}

pub fn member(key: &str, value: DerivationTree) -> DerivationTree {
    DerivationTree::new("<member>", vec![string(key), DerivationTree::leaf(" : "), value])
}

/// `<value>` holding an object with the given members.
pub fn object(members: Vec<DerivationTree>) -> DerivationTree {
    let mut list: Option<DerivationTree> = None;
    for m in members.into_iter().rev() {
        list = Some(match list {
            None => wrap1("<members>", m),
            Some(rest) => DerivationTree::new("<members>", vec![m, DerivationTree::leaf(" , "), rest]),
        });
    }
    let members = list.expect("at least one member");
    wrap1("<value>", DerivationTree::new("<object>", vec![
        DerivationTree::leaf("{ "),
        members,
        DerivationTree::leaf(" }"),
    ]))
}

pub fn document(value: DerivationTree) -> DerivationTree {
    wrap1("<start>", value)
}

/// Every expanded node derives its children by some alternative of its symbol.
pub fn conforms(grammar: &GrammarIndex, tree: &DerivationTree) -> bool {
    tree.preorder().all(|node| {
        if node.is_leaf() {
            return true;
        }
        let symbols: Vec<&str> = node.children().iter().map(|c| c.symbol().as_str()).collect();
        grammar
            .alternatives(node.symbol())
            .iter()
            .any(|alt| alt.iter().map(|s| s.as_str()).eq(symbols.iter().copied()))
    })
}
