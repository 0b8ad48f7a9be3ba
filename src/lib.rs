/*!
# Tree Grafter

Grammar-directed insertion of derivation subtrees. Given a context-free
grammar, a complete derivation tree (the *target*) and a possibly partial
tree to insert, the library lazily produces new derivation trees of the same
grammar in which the inserted tree appears at a grammar-legal position and
everything the target derived is preserved.

Used as the mutation step of grammar-based test input generation: grow an
existing valid input by grafting a required fragment into it.

## Architecture

```text
Tree Grafter
├── Core        - Error taxonomy, TOML/YAML configuration
├── Tree        - Persistent derivation trees, paths, symbols, JSON interchange
├── Grammar     - Grammar index, parent relation, production-path graph
├── Insertion   - SEEK/EXTEND engine, rule matching, validity oracle
└── CLI common  - Logging and output for the `grafter` binary
```

## Usage

```rust,no_run
use tree_grafter::grammar::GrammarIndex;
use tree_grafter::insertion::insert;
use tree_grafter::tree::{DerivationTree, ParseTree};

# fn main() -> anyhow::Result<()> {
let grammar = GrammarIndex::load_from_file("lang.json")?;
let target = DerivationTree::from_parse_tree(&ParseTree::load_from_file("target.json")?);
let fragment = DerivationTree::from_parse_tree(&ParseTree::load_from_file("assgn.json")?);

for tree in insert(&grammar, &fragment, &target, None, None, Some(5)) {
    println!("{}", tree);
}
# Ok(())
# }
```

Trees are immutable and share untouched subtrees through `Rc`; the engine is
single-threaded and owned by one consumer.
*/

pub mod cli_common;
pub mod core;
pub mod grammar;
pub mod insertion;
pub mod tree;

pub use crate::core::{GraftConfig, GraftError, GraftResult};
pub use grammar::{GrammarGraph, GrammarIndex, ProductionPaths};
pub use insertion::{insert, InsertionEngine, InsertionRequest, OrderingPredicate, Relation};
pub use tree::{DerivationTree, NodeId, ParseTree, Path, Symbol};
