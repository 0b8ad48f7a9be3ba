//! Properties that must hold for every accepted insertion result.

mod common;

use common::*;
use tree_grafter::core::config::InsertionSettings;
use tree_grafter::insertion::{insert, InsertionRequest};
use tree_grafter::tree::DerivationTree;
use tree_grafter::{GrammarIndex, InsertionEngine};

fn cases() -> Vec<(GrammarIndex, DerivationTree, DerivationTree)> {
    vec![
        (lang_grammar(), program(&[("x", "1"), ("y", "z")]), assgn("y", "0")),
        (lang_grammar(), program(&[("x", "1"), ("y", "2"), ("y", "z")]), assgn("z", "1")),
        (
            json_grammar(),
            document(object(vec![member("T", object(vec![member("I", literal("true"))]))])),
            member("key", literal("null")),
        ),
        (lang_grammar(), program(&[("x", "1"), ("y", "z")]), partial_assgn("y")),
    ]
}

fn run_all(check: impl Fn(&GrammarIndex, &DerivationTree, &DerivationTree, &DerivationTree)) {
    for (grammar, target, fragment) in cases() {
        let results: Vec<DerivationTree> = insert(&grammar, &fragment, &target, None, None, Some(20)).collect();
        assert!(!results.is_empty(), "no results for {}", target);
        for result in &results {
            check(&grammar, &target, &fragment, result);
        }
    }
}

#[test]
fn content_preservation() {
    run_all(|_, target, _, result| {
        let text = result.to_string();
        for token in target.to_string().split_whitespace() {
            assert!(text.split_whitespace().any(|t| t == token), "{:?} lost in {:?}", token, text);
        }
    });
}

#[test]
fn insertion_presence() {
    run_all(|_, _, fragment, result| {
        assert!(result.contains_id(fragment.id()), "inserted tree missing from {}", result);
        assert!(result.to_string().contains(&fragment.to_string()));
    });
}

#[test]
fn original_survival() {
    run_all(|_, target, _, result| {
        for id in target.node_ids() {
            assert!(result.contains_id(id), "node {} of the target dropped from {}", id, result);
        }
    });
}

#[test]
fn results_are_grammar_conformant() {
    run_all(|grammar, _, _, result| {
        assert!(conforms(grammar, result), "non-conformant result {}", result);
        assert_eq!(result.symbol(), &grammar.symbol("<start>"));
    });
}

#[test]
fn idempotent_addressing() {
    run_all(|_, _, _, result| {
        for id in result.node_ids() {
            let path = result.find(id).expect("id reachable");
            assert_eq!(result.subtree_at(&path).unwrap().id(), id);
        }
    });
}

#[test]
fn results_are_distinct() {
    for (grammar, target, fragment) in cases() {
        let results: Vec<DerivationTree> = insert(&grammar, &fragment, &target, None, None, None).collect();
        for (i, a) in results.iter().enumerate() {
            for b in &results[i + 1..] {
                assert_ne!(a.fingerprint(), b.fingerprint(), "duplicate result {}", a);
            }
        }
    }
}

#[test]
fn boundedness() {
    for k in 0..3 {
        for (grammar, target, fragment) in cases() {
            let mut engine: InsertionEngine = InsertionRequest::new(&grammar, fragment, target)
                .with_max_solutions(k)
                .run();
            let produced = engine.by_ref().count();
            assert!(produced <= k);
            assert!(engine.next().is_none());
        }
    }
}

#[test]
fn inputs_are_not_mutated() {
    let grammar = lang_grammar();
    let target = program(&[("x", "1"), ("y", "z")]);
    let fragment = assgn("y", "0");
    let before = (target.to_string(), target.node_ids(), fragment.node_ids());
    let _: Vec<_> = insert(&grammar, &fragment, &target, None, None, None).collect();
    assert_eq!(before, (target.to_string(), target.node_ids(), fragment.node_ids()));
}

/// Shared checks for results whose target had no open node of the insert symbol.
fn assert_core_properties(grammar: &GrammarIndex, target: &DerivationTree, fragment: &DerivationTree, result: &DerivationTree) {
    let text = result.to_string();
    for token in target.to_string().split_whitespace() {
        assert!(text.split_whitespace().any(|t| t == token), "{:?} lost in {:?}", token, text);
    }
    assert!(result.contains_id(fragment.id()), "inserted tree missing from {}", result);
    assert!(conforms(grammar, result), "non-conformant result {}", result);
}

#[test]
fn partial_insert_keeps_its_open_nodes() {
    let grammar = lang_grammar();
    let target = program(&[("x", "1"), ("y", "z")]);
    let fragment = partial_assgn("y");
    let hole = fragment.children()[2].id();

    let results: Vec<DerivationTree> = insert(&grammar, &fragment, &target, None, None, None).collect();
    assert_eq!(
        results.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
        vec!["y :=  ; x := 1 ; y := z".to_string(), "x := 1 ; y :=  ; y := z".to_string()]
    );
    for result in &results {
        assert_core_properties(&grammar, &target, &fragment, result);
        let path = result.find(hole).expect("open node of the inserted tree survives");
        assert!(result.subtree_at(&path).unwrap().is_open());
        assert!(!result.is_complete());
    }
}

#[test]
fn open_target_slot_is_filled() {
    let grammar = lang_grammar();
    // x := 1 ; <assgn>
    let hole = DerivationTree::open("<assgn>");
    let target = DerivationTree::new("<start>", vec![DerivationTree::new("<stmt>", vec![
        assgn("x", "1"),
        DerivationTree::leaf(" ; "),
        DerivationTree::new("<stmt>", vec![hole.clone()]),
    ])]);
    let fragment = assgn("y", "0");

    let results: Vec<DerivationTree> = insert(&grammar, &fragment, &target, None, None, None).collect();
    let texts: Vec<String> = results.iter().map(|t| t.to_string()).collect();
    assert!(texts.contains(&"x := 1 ; y := 0".to_string()), "results: {:?}", texts);

    for result in &results {
        assert_core_properties(&grammar, &target, &fragment, result);
        let substituted = !result.contains_id(hole.id());
        for id in target.node_ids() {
            if id == hole.id() {
                continue;
            }
            assert!(result.contains_id(id), "node {} of the target dropped from {}", id, result);
        }
        // открытый узел пропадает ровно тогда, когда его заменили вставкой
        assert_eq!(substituted, result.to_string() == "x := 1 ; y := 0");
    }

    let filled = &results[texts.iter().position(|t| t == "x := 1 ; y := 0").unwrap()];
    assert!(!filled.contains_id(hole.id()));
    assert!(filled.is_complete());
    let path = filled.find(fragment.id()).unwrap();
    assert_eq!(path, target.find(hole.id()).unwrap());
}

#[test]
fn unvalidated_candidates_are_surfaced() {
    // без пробелов вокруг "," токены цели теряются в тексте результата
    let grammar = GrammarIndex::from_json_str(
        r#"{"<start>": ["<list>"], "<list>": ["<item>", "<item>,<list>"], "<item>": ["a", "b"]}"#,
    )
    .unwrap();
    let item = |x: &str| DerivationTree::new("<item>", vec![DerivationTree::leaf(x)]);
    let target = DerivationTree::new("<start>", vec![DerivationTree::new("<list>", vec![item("a")])]);
    let fragment = item("b");

    let mut checked = InsertionRequest::new(&grammar, fragment.clone(), target.clone()).run();
    assert_eq!(checked.by_ref().count(), 0);
    assert_eq!(checked.stats().rejected, 1);

    let settings = InsertionSettings { check_validity: false, ..InsertionSettings::default() };
    let results: Vec<DerivationTree> =
        InsertionRequest::new(&grammar, fragment.clone(), target.clone()).with_settings(settings).run().collect();
    assert_eq!(results.iter().map(|t| t.to_string()).collect::<Vec<_>>(), vec!["b,a".to_string()]);
    for result in &results {
        assert!(result.contains_id(fragment.id()));
        assert!(target.node_ids().into_iter().all(|id| result.contains_id(id)));
        assert!(conforms(&grammar, result));
    }
}

#[test]
fn trivial_fillers_follow_settings() {
    let grammar = GrammarIndex::from_json_str(
        r#"{
            "<start>": ["<stmt>"],
            "<stmt>": ["<assgn>", "<assgn><sep><stmt>"],
            "<sep>": [" ; "],
            "<assgn>": [" <var> := <digit> "],
            "<var>": ["x", "y"],
            "<digit>": ["0", "1"]
        }"#,
    )
    .unwrap();
    let assignment = |var: &str, digit: &str| {
        DerivationTree::new("<assgn>", vec![
            DerivationTree::leaf(" "),
            DerivationTree::new("<var>", vec![DerivationTree::leaf(var)]),
            DerivationTree::leaf(" := "),
            DerivationTree::new("<digit>", vec![DerivationTree::leaf(digit)]),
            DerivationTree::leaf(" "),
        ])
    };
    let target = DerivationTree::new("<start>", vec![DerivationTree::new("<stmt>", vec![assignment("x", "1")])]);
    let fragment = assignment("y", "0");

    let expanded = InsertionRequest::new(&grammar, fragment.clone(), target.clone())
        .with_max_solutions(1)
        .run()
        .next()
        .expect("insertion with expanded separator");
    assert_eq!(expanded.to_string(), " y := 0  ;  x := 1 ");
    assert!(expanded.is_complete());
    assert_core_properties(&grammar, &target, &fragment, &expanded);

    let settings = InsertionSettings { expand_trivial: false, max_solutions: Some(1), ..InsertionSettings::default() };
    let open = InsertionRequest::new(&grammar, fragment.clone(), target.clone())
        .with_settings(settings)
        .run()
        .next()
        .expect("insertion with open separator");
    assert_eq!(open.render(true), " y := 0 <sep> x := 1 ");
    let open_paths = open.open_leaves();
    assert_eq!(open_paths.len(), 1);
    assert_eq!(open.subtree_at(&open_paths[0]).unwrap().symbol().as_str(), "<sep>");
    assert_core_properties(&grammar, &target, &fragment, &open);
}
