/*!
# Insertion Scenarios

End-to-end runs of the engine over the statement-list grammar and the
object/member grammar.
*/

mod common;

use common::*;
use pretty_assertions::assert_eq;
use tree_grafter::insertion::{insert, InsertionRequest, OrderingPredicate, Relation};
use tree_grafter::tree::Path;

fn texts<I: Iterator<Item = tree_grafter::DerivationTree>>(results: I) -> Vec<String> {
    results.map(|t| t.to_string()).collect()
}

#[test]
fn test_assignment_inserted_before_and_between() {
    let grammar = lang_grammar();
    let target = program(&[("x", "1"), ("y", "z")]);
    assert_eq!(target.to_string(), "x := 1 ; y := z");

    let results = texts(insert(&grammar, &assgn("y", "0"), &target, None, None, None));
    assert_eq!(
        results,
        vec!["y := 0 ; x := 1 ; y := z".to_string(), "x := 1 ; y := 0 ; y := z".to_string()]
    );
}

#[test]
fn test_fresh_call_yields_same_sequence() {
    let grammar = lang_grammar();
    let target = program(&[("x", "1"), ("y", "z")]);
    let fragment = assgn("y", "0");
    let first = texts(insert(&grammar, &fragment, &target, None, None, Some(1)));
    let second = texts(insert(&grammar, &fragment, &target, None, None, None));
    assert_eq!(first, vec!["y := 0 ; x := 1 ; y := z".to_string()]);
    assert!(second.contains(&"x := 1 ; y := 0 ; y := z".to_string()));
}

#[test]
fn test_three_statement_target() {
    let grammar = lang_grammar();
    let target = program(&[("x", "1"), ("y", "2"), ("y", "z")]);
    let results = texts(insert(&grammar, &assgn("y", "0"), &target, None, None, None));
    assert!(
        results.contains(&"x := 1 ; y := 2 ; y := 0 ; y := z".to_string()),
        "results: {:?}",
        results
    );
    assert_eq!(results.len(), 3);
}

#[test]
fn test_member_inserted_into_object() {
    let grammar = json_grammar();
    let target = document(object(vec![member("T", object(vec![member("I", literal("true"))]))]));
    assert_eq!(target.to_string(), r#"{ "T" : { "I" : true } }"#);

    let fragment = member("key", object(vec![member("key", literal("null"))]));
    assert_eq!(fragment.to_string(), r#""key" : { "key" : null }"#);

    let results = texts(insert(&grammar, &fragment, &target, None, None, Some(10)));
    assert_eq!(
        results.first().map(String::as_str),
        Some(r#"{ "key" : { "key" : null } , "T" : { "I" : true } }"#)
    );
    assert!(results.contains(&r#"{ "T" : { "key" : { "key" : null } , "I" : true } }"#.to_string()));
}

#[test]
fn test_ordering_predicate_filters_results() {
    let grammar = lang_grammar();
    let target = program(&[("x", "1"), ("y", "z")]);
    let first_assignment = target.subtree_at(&Path::from(vec![0, 0])).unwrap();

    let after = OrderingPredicate::new(Relation::After, first_assignment.id());
    let mut engine = InsertionRequest::new(&grammar, assgn("y", "0"), target.clone()).with_predicate(after).run();
    let results = texts(engine.by_ref());
    assert_eq!(results, vec!["x := 1 ; y := 0 ; y := z".to_string()]);
    assert_eq!(engine.stats().rejected, 1);

    let before = OrderingPredicate::new(Relation::Before, first_assignment.id());
    let results = texts(insert(&grammar, &assgn("y", "0"), &target, None, Some(before), None));
    assert_eq!(results, vec!["y := 0 ; x := 1 ; y := z".to_string()]);
}

#[test]
fn test_insert_needing_extension() {
    // <var> не помещается ни в один существующий узел: нужна обёртка <assgn>
    let grammar = lang_grammar();
    let target = program(&[("x", "1")]);
    let fragment = tree_grafter::DerivationTree::new("<var>", vec![tree_grafter::DerivationTree::leaf("y")]);
    let mut engine = insert(&grammar, &fragment, &target, None, None, Some(3));
    let results = texts(engine.by_ref());
    assert_eq!(results.first().map(String::as_str), Some("y :=  ; x := 1"));
    assert!(engine.stats().extensions > 0);
    assert!(results.len() <= 3);
}

#[test]
fn test_subtree_off_the_shortest_path_is_searched() {
    // кратчайший путь <start> -> <member> идёт через <object>, а корень держит <array>
    let grammar = tree_grafter::GrammarIndex::from_json_str(
        r#"{
            "<start>": ["<value>"],
            "<value>": ["<object>", "<array>", "1"],
            "<object>": ["{ <members> }"],
            "<array>": ["[ <value> ]"],
            "<members>": ["<member>", "<member> , <members>"],
            "<member>": ["k : <value>"]
        }"#,
    )
    .unwrap();
    let json = |tree: serde_json::Value| {
        tree_grafter::DerivationTree::from_parse_tree(&serde_json::from_value(tree).unwrap())
    };
    let member = serde_json::json!(["<member>", [["k : ", []], ["<value>", [["1", []]]]]]);
    let target = json(serde_json::json!(
        ["<start>", [["<value>", [["<array>", [
            ["[ ", []],
            ["<value>", [["<object>", [["{ ", []], ["<members>", [member.clone()]], [" }", []]]]]],
            [" ]", []]
        ]]]]]]
    ));
    assert_eq!(target.to_string(), "[ { k : 1 } ]");
    let fragment = json(member);

    let results = texts(insert(&grammar, &fragment, &target, None, None, Some(20)));
    assert!(results.contains(&"[ { k : 1 , k : 1 } ]".to_string()), "results: {:?}", results);
}
